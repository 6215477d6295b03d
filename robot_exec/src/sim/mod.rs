//! # Simulated equipment
//!
//! Implementations of every equipment interface which need no hardware. They
//! record the commands they receive and let the caller script what the
//! sensors report, so the behaviour core can be run on a host and tested.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod clock;
mod controller;
mod motor;
mod pneumatic;
mod robot;
mod sensors;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use clock::SimClock;
pub use controller::SimController;
pub use motor::{MotorCall, SimMotor, CALL_LOG_CAPACITY};
pub use pneumatic::SimSolenoid;
pub use robot::SimRobot;
pub use sensors::{SimInertial, SimOptical, AMBIENT_HUE};
