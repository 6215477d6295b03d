//! Heading feedback turn calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};

// Internal
use super::{Drivetrain, DrivetrainError};
use eqpt_if::{BrakeMode, Direction, VelocityUnits};
use util::maths::{wrap_180, wrap_360};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Heading reached by turning `angle_deg` clockwise from `initial_deg`, in
/// [0, 360).
pub fn target_heading_deg(initial_deg: f64, angle_deg: f64) -> f64 {
    wrap_360(initial_deg + angle_deg)
}

/// Signed shortest path from `current_deg` to `target_deg`, in [-180, 180].
///
/// Positive means the target is reached turning clockwise.
pub fn heading_error_deg(target_deg: f64, current_deg: f64) -> f64 {
    wrap_180(target_deg - current_deg)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Drivetrain {

    /// Turn by `angle_deg` using the heading sensor, with the default turn
    /// timeout.
    pub fn turn_for(&self, angle_deg: f64, speed_pct: f64) -> Result<(), DrivetrainError> {
        self.turn_for_with_timeout(angle_deg, speed_pct, self.params.turn_timeout_ms)
    }

    /// Turn by `angle_deg` using the heading sensor. Blocks until the heading
    /// is within tolerance of the target or `timeout_ms` has elapsed.
    ///
    /// The turn takes the shortest path. The spin direction is chosen once at
    /// the start, only the stop condition is re-evaluated while turning. The
    /// wheels brake for the duration, and on every exit path the motors are
    /// stopped, the braking mode restored and manual drive released. Fails
    /// with `MoveInProgress` if another blocking move owns the wheels.
    pub fn turn_for_with_timeout(
        &self,
        angle_deg: f64,
        speed_pct: f64,
        timeout_ms: u64,
    ) -> Result<(), DrivetrainError> {
        let _override = self.override_guard().ok_or(DrivetrainError::MoveInProgress)?;

        let prior_mode = self.robot_state.braking_mode();

        let result = self.stop(prior_mode)
            .and_then(|_| self.set_stopping_mode(BrakeMode::Brake))
            .and_then(|_| self.turn(angle_deg, speed_pct, timeout_ms));

        let cleanup = self.stop(BrakeMode::Brake)
            .and_then(|_| self.set_stopping_mode(prior_mode));

        result.and(cleanup)
    }

    fn turn(&self, angle_deg: f64, speed_pct: f64, timeout_ms: u64) -> Result<(), DrivetrainError> {
        let initial_deg = self.inertial.heading();
        let target_deg = target_heading_deg(initial_deg, angle_deg);
        let initial_error_deg = heading_error_deg(target_deg, initial_deg);

        debug!(
            "Turn: {:.1} deg from {:.1} to {:.1} (shortest path {:.1})",
            angle_deg, initial_deg, target_deg, initial_error_deg
        );

        // Clockwise is left forward, right reverse
        let left_dir = match initial_error_deg >= 0.0 {
            true => Direction::Forward,
            false => Direction::Reverse,
        };
        let right_dir = left_dir.invert();

        self.left.spin(left_dir, speed_pct, VelocityUnits::Percent)?;
        self.right.spin(right_dir, speed_pct, VelocityUnits::Percent)?;

        let start_ms = self.clock.now_ms();

        loop {
            let error_deg = heading_error_deg(target_deg, self.inertial.heading());
            if error_deg.abs() < self.params.turn_tolerance_deg {
                debug!("Turn complete, heading error {:.2} deg", error_deg);
                return Ok(());
            }

            if util::time::elapsed_ms(start_ms, self.clock.now_ms()) >= timeout_ms {
                warn!(
                    "Turn did not reach {:.1} deg within {} ms (error {:.1} deg), stopping",
                    target_deg, timeout_ms, error_deg
                );
                return Ok(());
            }

            self.clock.sleep_ms(self.params.poll_period_ms);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_turn_takes_shortest_path() {
        let target = target_heading_deg(0.0, 270.0);
        assert_eq!(target, 270.0);
        assert_eq!(heading_error_deg(target, 0.0), -90.0);

        let target = target_heading_deg(350.0, 20.0);
        assert_eq!(target, 10.0);
        assert_eq!(heading_error_deg(target, 350.0), 20.0);

        assert_eq!(heading_error_deg(target_heading_deg(90.0, -450.0), 90.0), -90.0);
    }

    #[test]
    fn test_heading_error_always_in_range() {
        for initial in (0..360).step_by(7) {
            for angle in (-1080..1080).step_by(13) {
                let initial = initial as f64;
                let target = target_heading_deg(initial, angle as f64);
                assert!(target >= 0.0 && target < 360.0);

                let error = heading_error_deg(target, initial);
                assert!(error >= -180.0 && error <= 180.0, "error {} out of range", error);
            }
        }
    }
}
