//! # Equipment Interface
//!
//! This module defines the capabilities the robot software requires from each
//! kind of equipment.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod controller;
pub mod inertial;
pub mod motor;
pub mod optical;
pub mod pneumatic;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use controller::{Axis, Button, InputSurface, PressCallback};
pub use inertial::HeadingSensor;
pub use motor::{Actuator, ActuatorGroup, BrakeMode, Direction, RotationUnits, VelocityUnits};
pub use optical::OpticalSensor;
pub use pneumatic::Solenoid;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A fault reported by a piece of equipment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EqptError {
    #[error("Device {0} is disconnected")]
    Disconnected(String),

    #[error("Device {0} reported a fault: {1}")]
    Fault(String, String),
}
