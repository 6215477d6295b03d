//! Blind move calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use std::f64::consts::PI;

// Internal
use super::{Drivetrain, DrivetrainError, NUM_DRV_WHEELS};
use eqpt_if::{BrakeMode, Direction, RotationUnits, VelocityUnits};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a distance travelled by a wheel into the wheel rotation needed.
///
/// Units: millimeters in, degrees out
pub fn mm_to_wheel_deg(distance_mm: f64, wheel_diameter_mm: f64) -> f64 {
    distance_mm / (PI * wheel_diameter_mm) * 360.0
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Drivetrain {

    /// Move a fixed distance without sensor feedback. Blocks until the wheels
    /// finish or the blind move timeout elapses.
    ///
    /// The left and right wheels both travel `forward_mm`, the strafe wheel
    /// travels `right_mm`. Manual drive is suppressed for the duration. The
    /// braking mode and each wheel's velocity are restored afterwards.
    ///
    /// A timeout is not an error, the move simply ends. Actuator faults are
    /// returned after the restore has been attempted. Fails with
    /// `MoveInProgress` without touching the wheels if another blocking move
    /// owns them.
    pub fn drive_for_blind(
        &self,
        forward_mm: f64,
        right_mm: f64,
        speed_pct: f64,
        brake_mode: BrakeMode,
    ) -> Result<(), DrivetrainError> {
        let _override = self.override_guard().ok_or(DrivetrainError::MoveInProgress)?;

        debug!(
            "Blind move: forward {:.0} mm, right {:.0} mm at {:.0}%",
            forward_mm, right_mm, speed_pct
        );

        let prior_mode = self.robot_state.braking_mode();
        self.stop(prior_mode)?;

        let prior_velocities = self
            .wheels()
            .map(|w| w.velocity(VelocityUnits::Percent));

        let result = self.blind_move(forward_mm, right_mm, speed_pct, brake_mode);

        // Restore even if the move failed part way
        let restore = self.set_stopping_mode(prior_mode).and_then(|_| {
            for (w, v) in self.wheels().iter().zip(prior_velocities.iter()) {
                w.set_velocity(*v, VelocityUnits::Percent)?;
            }
            Ok(())
        });

        result.and(restore)
    }

    fn blind_move(
        &self,
        forward_mm: f64,
        right_mm: f64,
        speed_pct: f64,
        brake_mode: BrakeMode,
    ) -> Result<(), DrivetrainError> {
        let d = self.params.wheel_diameter_mm;
        let wheel_deg: [f64; NUM_DRV_WHEELS] = [
            mm_to_wheel_deg(forward_mm, d),
            mm_to_wheel_deg(forward_mm, d),
            mm_to_wheel_deg(right_mm, d),
        ];

        self.set_stopping_mode(brake_mode)?;
        self.set_velocity(speed_pct, VelocityUnits::Percent)?;

        for (w, deg) in self.wheels().iter().zip(wheel_deg.iter()) {
            w.spin_for(Direction::Forward, *deg, RotationUnits::Deg, false)?;
        }

        if !self.wait_for_wheels(self.params.blind_timeout_ms) {
            warn!(
                "Blind move did not complete within {} ms, stopping",
                self.params.blind_timeout_ms
            );
            self.stop(brake_mode)?;
        }

        Ok(())
    }
}
