//! # Controller Interface
//!
//! The driver's handheld controller: four analogue axes and twelve buttons.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// Callback fired when a button is pressed.
pub type PressCallback = Box<dyn Fn() + Send + Sync + 'static>;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Input surface of the driver's controller.
pub trait InputSurface: Send + Sync {
    /// Position of an axis, in the range [-100, 100].
    fn axis_position(&self, axis: Axis) -> f64;

    /// True while the button is held down.
    fn pressing(&self, button: Button) -> bool;

    /// Register a callback fired on the rising edge of `button`.
    ///
    /// Callbacks run on a thread owned by the controller, not on the caller's
    /// thread. Registering a callback for a button replaces any previous
    /// callback for that button, so registration is idempotent.
    fn on_press(&self, button: Button, callback: PressCallback);
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Analogue axes of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Right stick, horizontal
    A1,
    /// Right stick, vertical
    A2,
    /// Left stick, vertical
    A3,
    /// Left stick, horizontal
    A4,
}

/// Buttons of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    L1,
    L2,
    R1,
    R2,
    Up,
    Down,
    Left,
    Right,
    X,
    B,
    Y,
    A,
}
