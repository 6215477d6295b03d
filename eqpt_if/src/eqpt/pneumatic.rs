//! # Pneumatics Interface

use super::EqptError;

/// A two position pneumatic solenoid.
pub trait Solenoid: Send + Sync {
    fn open(&self) -> Result<(), EqptError>;

    fn close(&self) -> Result<(), EqptError>;

    /// True when the solenoid is open.
    fn value(&self) -> bool;
}
