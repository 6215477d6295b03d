//! Implementations for the Drivetrain state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Internal
use super::{DrivetrainError, DrivetrainParams, DrvCmd, WheelSpeeds, NUM_DRV_WHEELS};
use crate::robot_state::RobotState;
use eqpt_if::{Actuator, BrakeMode, Clock, Direction, EqptError, HeadingSensor, VelocityUnits};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drivetrain controller
///
/// Shared between the main tick and background actions through an `Arc`,
/// every operation takes `&self`.
pub struct Drivetrain {
    pub(crate) params: DrivetrainParams,

    pub(crate) left: Arc<dyn Actuator>,
    pub(crate) right: Arc<dyn Actuator>,
    pub(crate) strafe: Arc<dyn Actuator>,

    pub(crate) inertial: Arc<dyn HeadingSensor>,
    pub(crate) clock: Arc<dyn Clock>,

    /// Source of the braking mode to restore after a blocking primitive
    pub(crate) robot_state: Arc<RobotState>,

    /// Set while a blocking primitive owns the wheels. Manual drive must not
    /// command the wheels while it is set.
    movement_override: AtomicBool,
}

/// Holds the movement override for the duration of a blocking primitive,
/// releasing it on drop whichever way the primitive exits.
pub(crate) struct OverrideGuard<'a> {
    flag: &'a AtomicBool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Drivetrain {
    pub fn new(
        params: DrivetrainParams,
        left: Arc<dyn Actuator>,
        right: Arc<dyn Actuator>,
        strafe: Arc<dyn Actuator>,
        inertial: Arc<dyn HeadingSensor>,
        clock: Arc<dyn Clock>,
        robot_state: Arc<RobotState>,
    ) -> Self {
        Self {
            params,
            left,
            right,
            strafe,
            inertial,
            clock,
            robot_state,
            movement_override: AtomicBool::new(false),
        }
    }

    pub fn params(&self) -> &DrivetrainParams {
        &self.params
    }

    /// True while a blocking primitive is executing.
    pub fn movement_override(&self) -> bool {
        self.movement_override.load(Ordering::SeqCst)
    }

    /// Drive with arcade mixing.
    ///
    /// Issues a non-blocking spin to each wheel. Safe to call every tick, the
    /// command replaces the previous one. All three wheels are commanded even
    /// if one of them faults.
    pub fn drive(&self, forward: f64, strafe: f64, turn: f64) -> Result<WheelSpeeds, DrivetrainError> {
        let speeds = DrvCmd::new(forward, strafe, turn).mix();

        trace!(
            "Drive: left {:.1}%, right {:.1}%, strafe {:.1}%",
            speeds.left, speeds.right, speeds.strafe
        );

        let results = [
            self.left.spin(Direction::Forward, speeds.left, VelocityUnits::Percent),
            self.right.spin(Direction::Forward, speeds.right, VelocityUnits::Percent),
            self.strafe.spin(Direction::Forward, speeds.strafe, VelocityUnits::Percent),
        ];
        first_error(results)?;

        Ok(speeds)
    }

    /// Stop every wheel with the given brake behaviour.
    pub fn stop(&self, mode: BrakeMode) -> Result<(), DrivetrainError> {
        first_error(self.wheels().map(|w| w.stop(mode)))?;
        Ok(())
    }

    /// Set the stopping behaviour of every wheel.
    pub fn set_stopping_mode(&self, mode: BrakeMode) -> Result<(), DrivetrainError> {
        first_error(self.wheels().map(|w| w.set_stopping(mode)))?;
        Ok(())
    }

    /// Set the default velocity of every wheel.
    pub fn set_velocity(&self, value: f64, units: VelocityUnits) -> Result<(), DrivetrainError> {
        first_error(self.wheels().map(|w| w.set_velocity(value, units)))?;
        Ok(())
    }

    /// The wheels in (left, right, strafe) order.
    pub(crate) fn wheels(&self) -> [&Arc<dyn Actuator>; NUM_DRV_WHEELS] {
        [&self.left, &self.right, &self.strafe]
    }

    /// Take the movement override, or `None` if a blocking primitive already
    /// holds it.
    pub(crate) fn override_guard(&self) -> Option<OverrideGuard<'_>> {
        self.movement_override
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| OverrideGuard {
                flag: &self.movement_override,
            })
    }

    /// Poll the wheels until none of them is spinning or `timeout_ms` has
    /// elapsed.
    ///
    /// Returns `false` if the timeout elapsed first.
    pub(crate) fn wait_for_wheels(&self, timeout_ms: u64) -> bool {
        let start_ms = self.clock.now_ms();

        loop {
            if !self.wheels().iter().any(|w| w.is_spinning()) {
                return true;
            }
            if util::time::elapsed_ms(start_ms, self.clock.now_ms()) >= timeout_ms {
                return false;
            }
            self.clock.sleep_ms(self.params.poll_period_ms);
        }
    }
}

impl<'a> Drop for OverrideGuard<'a> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Collapse per-wheel results into the first error, if any.
fn first_error<I>(results: I) -> Result<(), EqptError>
where
    I: IntoIterator<Item = Result<(), EqptError>>,
{
    results.into_iter().find_map(|r| r.err()).map_or(Ok(()), Err)
}
