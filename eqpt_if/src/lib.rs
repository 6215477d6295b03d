//! # Equipment interface crate.
//!
//! Provides the interfaces through which the robot software drives and reads
//! its equipment: motors, sensors, pneumatics, the driver's controller and the
//! clock. Hardware drivers and simulations implement these traits, the
//! behaviour core only ever sees the traits.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Monotonic clock and blocking sleep
pub mod clock;

/// Equipment capability traits (actuators, sensors, pneumatics, controller)
pub mod eqpt;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use clock::{Clock, SystemClock};
pub use eqpt::*;
