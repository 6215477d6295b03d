//! A complete simulated robot

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::Arc;

use eqpt_if::{Actuator, ActuatorGroup, Clock};

use super::{SimClock, SimController, SimInertial, SimMotor, SimOptical, SimSolenoid};
use crate::eqpt::RobotEqpt;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Heading change per inertial read while the drivetrain turns.
///
/// Units: degrees
const TURN_DEG_PER_READ: f64 = 1.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Simulated equipment for every slot of [`RobotEqpt`], keeping the concrete
/// handles so they can be scripted and inspected.
///
/// Each side of the drivetrain is a front and rear motor driven as one group.
/// The front motors are the ones to inspect, the rear ones receive identical
/// commands.
pub struct SimRobot {
    pub left_drv: Arc<SimMotor>,
    pub left_drv_rear: Arc<SimMotor>,
    pub right_drv: Arc<SimMotor>,
    pub right_drv_rear: Arc<SimMotor>,
    pub strafe_drv: Arc<SimMotor>,
    pub inertial: Arc<SimInertial>,

    pub bottom_intake: Arc<SimMotor>,
    pub top_intake: Arc<SimMotor>,
    pub unloader: Arc<SimMotor>,
    pub optical: [Arc<SimOptical>; 2],
    pub intake_gate: Arc<SimSolenoid>,

    pub descorer: Arc<SimSolenoid>,
    pub match_loader: Arc<SimSolenoid>,

    pub controller: Arc<SimController>,
    pub clock: Arc<dyn Clock>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimRobot {
    /// A robot running on a virtual [`SimClock`].
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SimClock::new()))
    }

    /// A robot running on the given clock. The heading follows the left
    /// drive motor.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let left_drv = Arc::new(SimMotor::new("left_drv"));
        let inertial = Arc::new(SimInertial::following(left_drv.clone(), TURN_DEG_PER_READ));

        Self {
            left_drv,
            left_drv_rear: Arc::new(SimMotor::new("left_drv_rear")),
            right_drv: Arc::new(SimMotor::new("right_drv")),
            right_drv_rear: Arc::new(SimMotor::new("right_drv_rear")),
            strafe_drv: Arc::new(SimMotor::new("strafe_drv")),
            inertial,
            bottom_intake: Arc::new(SimMotor::new("bottom_intake")),
            top_intake: Arc::new(SimMotor::new("top_intake")),
            unloader: Arc::new(SimMotor::new("unloader")),
            optical: [Arc::new(SimOptical::new()), Arc::new(SimOptical::new())],
            intake_gate: Arc::new(SimSolenoid::new()),
            descorer: Arc::new(SimSolenoid::new()),
            match_loader: Arc::new(SimSolenoid::new()),
            controller: Arc::new(SimController::new()),
            clock,
        }
    }

    /// The equipment bundle seen by the behaviour core.
    pub fn eqpt(&self) -> RobotEqpt {
        RobotEqpt {
            left_drv: side_group(&self.left_drv, &self.left_drv_rear),
            right_drv: side_group(&self.right_drv, &self.right_drv_rear),
            strafe_drv: self.strafe_drv.clone(),
            inertial: self.inertial.clone(),
            bottom_intake: self.bottom_intake.clone(),
            top_intake: self.top_intake.clone(),
            unloader: self.unloader.clone(),
            optical: [self.optical[0].clone(), self.optical[1].clone()],
            intake_gate: self.intake_gate.clone(),
            descorer: self.descorer.clone(),
            match_loader: self.match_loader.clone(),
            controller: self.controller.clone(),
            clock: self.clock.clone(),
        }
    }

    /// The front drive motors in (left, right, strafe) order.
    pub fn drv_motors(&self) -> [&Arc<SimMotor>; 3] {
        [&self.left_drv, &self.right_drv, &self.strafe_drv]
    }

    /// Total commands received by the drive motors.
    pub fn num_drv_calls(&self) -> usize {
        self.drv_motors().iter().map(|m| m.num_calls()).sum()
    }

    pub fn clear_drv_calls(&self) {
        for m in self.drv_motors().iter() {
            m.clear_calls();
        }
    }

    /// Current signed speeds of the manipulation motors, (bottom, top,
    /// unloader).
    pub fn mnpl_speeds(&self) -> (f64, f64, f64) {
        (
            self.bottom_intake.signed_speed(),
            self.top_intake.signed_speed(),
            self.unloader.signed_speed(),
        )
    }
}

impl Default for SimRobot {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn side_group(front: &Arc<SimMotor>, rear: &Arc<SimMotor>) -> Arc<dyn Actuator> {
    Arc::new(ActuatorGroup::new(vec![
        front.clone() as Arc<dyn Actuator>,
        rear.clone() as Arc<dyn Actuator>,
    ]))
}
