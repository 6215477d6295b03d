//! # Optical Sensor Interface

use super::EqptError;

/// A colour and proximity sensor with its own illumination.
pub trait OpticalSensor: Send + Sync {
    /// Detected hue, in the range [0, 255].
    fn hue(&self) -> f64;

    /// True if an object is within the detection threshold.
    fn is_near_object(&self) -> bool;

    /// Turn the illumination on or off.
    fn set_light(&self, on: bool) -> Result<(), EqptError>;

    /// Set the illumination power in percent.
    fn set_light_power(&self, pct: f64) -> Result<(), EqptError>;

    /// Set the distance below which an object counts as near.
    fn set_object_detect_threshold(&self, mm: f64) -> Result<(), EqptError>;
}
