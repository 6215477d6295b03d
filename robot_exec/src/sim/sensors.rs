//! Simulated inertial and optical sensors

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::{Arc, Mutex, MutexGuard};

use eqpt_if::{EqptError, HeadingSensor, OpticalSensor};
use util::maths::wrap_360;

use super::SimMotor;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Hue seen by an optical sensor with no block in front of it, outside both
/// block colour bands.
pub const AMBIENT_HUE: f64 = 60.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A heading sensor.
///
/// The heading is either set directly, or follows a drive motor: each read
/// moves the heading by a fixed step in the direction the motor is spinning,
/// forward turning clockwise.
pub struct SimInertial {
    inner: Mutex<InertialInner>,
    follow: Option<Arc<SimMotor>>,
}

struct InertialInner {
    heading_deg: f64,
    deg_per_read: f64,
    calibrations: u32,
    frozen: bool,
}

/// A colour and proximity sensor whose readings are set by the caller.
pub struct SimOptical {
    inner: Mutex<OpticalInner>,
}

struct OpticalInner {
    hue: f64,
    near: bool,
    light_on: bool,
    light_power_pct: f64,
    detect_threshold_mm: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimInertial {
    /// A sensor which only changes heading through `set_heading`.
    pub fn new(heading_deg: f64) -> Self {
        Self {
            inner: Mutex::new(InertialInner {
                heading_deg: wrap_360(heading_deg),
                deg_per_read: 0.0,
                calibrations: 0,
                frozen: false,
            }),
            follow: None,
        }
    }

    /// A sensor which turns with `motor`, by `deg_per_read` each read.
    pub fn following(motor: Arc<SimMotor>, deg_per_read: f64) -> Self {
        let mut sensor = Self::new(0.0);
        sensor.follow = Some(motor);
        sensor.lock().deg_per_read = deg_per_read;
        sensor
    }

    pub fn set_heading(&self, heading_deg: f64) {
        self.lock().heading_deg = wrap_360(heading_deg);
    }

    /// Stop the heading following the motor, as if the robot was stuck.
    pub fn set_frozen(&self, frozen: bool) {
        self.lock().frozen = frozen;
    }

    pub fn calibrations(&self) -> u32 {
        self.lock().calibrations
    }

    fn lock(&self) -> MutexGuard<'_, InertialInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl HeadingSensor for SimInertial {
    fn heading(&self) -> f64 {
        let speed = self.follow.as_ref().map_or(0.0, |m| m.signed_speed());
        let mut inner = self.lock();

        if !inner.frozen && speed != 0.0 {
            inner.heading_deg = wrap_360(inner.heading_deg + inner.deg_per_read * speed.signum());
        }

        inner.heading_deg
    }

    fn calibrate(&self) -> Result<(), EqptError> {
        self.lock().calibrations += 1;
        Ok(())
    }
}

impl SimOptical {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(OpticalInner {
                hue: AMBIENT_HUE,
                near: false,
                light_on: false,
                light_power_pct: 0.0,
                detect_threshold_mm: 0.0,
            }),
        }
    }

    /// Set what the sensor sees.
    pub fn set_reading(&self, hue: f64, near: bool) {
        let mut inner = self.lock();
        inner.hue = hue;
        inner.near = near;
    }

    /// Nothing in front of the sensor.
    pub fn clear(&self) {
        self.set_reading(AMBIENT_HUE, false);
    }

    pub fn light_on(&self) -> bool {
        self.lock().light_on
    }

    pub fn light_power(&self) -> f64 {
        self.lock().light_power_pct
    }

    pub fn detect_threshold(&self) -> f64 {
        self.lock().detect_threshold_mm
    }

    fn lock(&self) -> MutexGuard<'_, OpticalInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SimOptical {
    fn default() -> Self {
        Self::new()
    }
}

impl OpticalSensor for SimOptical {
    fn hue(&self) -> f64 {
        self.lock().hue
    }

    fn is_near_object(&self) -> bool {
        self.lock().near
    }

    fn set_light(&self, on: bool) -> Result<(), EqptError> {
        self.lock().light_on = on;
        Ok(())
    }

    fn set_light_power(&self, pct: f64) -> Result<(), EqptError> {
        self.lock().light_power_pct = pct;
        Ok(())
    }

    fn set_object_detect_threshold(&self, mm: f64) -> Result<(), EqptError> {
        self.lock().detect_threshold_mm = mm;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use eqpt_if::{Actuator, Direction, VelocityUnits};

    #[test]
    fn test_heading_follows_motor() {
        let motor = Arc::new(SimMotor::new("left"));
        let inertial = SimInertial::following(motor.clone(), 2.0);

        assert_eq!(inertial.heading(), 0.0);

        motor.spin(Direction::Reverse, 30.0, VelocityUnits::Percent).unwrap();
        assert_eq!(inertial.heading(), 358.0);

        motor.spin(Direction::Forward, 30.0, VelocityUnits::Percent).unwrap();
        assert_eq!(inertial.heading(), 0.0);
        assert_eq!(inertial.heading(), 2.0);

        inertial.set_frozen(true);
        assert_eq!(inertial.heading(), 2.0);
    }
}
