//! # Inertial Sensor Interface

use super::EqptError;

/// A sensor providing the robot's heading.
pub trait HeadingSensor: Send + Sync {
    /// Heading in degrees, in the range [0, 360), increasing clockwise.
    fn heading(&self) -> f64;

    /// Calibrate the sensor. Blocks until calibration is complete, and must
    /// only be performed once at startup while the robot is stationary.
    fn calibrate(&self) -> Result<(), EqptError>;
}
