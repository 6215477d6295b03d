//! # Robot Equipment
//!
//! All the equipment of the robot, gathered so it can be passed explicitly to
//! the components which use it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::Arc;

use eqpt_if::{Actuator, Clock, HeadingSensor, InputSurface, OpticalSensor, Solenoid};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Handles to every piece of equipment on the robot.
#[derive(Clone)]
pub struct RobotEqpt {
    // ---- DRIVETRAIN ----
    pub left_drv: Arc<dyn Actuator>,
    pub right_drv: Arc<dyn Actuator>,
    pub strafe_drv: Arc<dyn Actuator>,
    pub inertial: Arc<dyn HeadingSensor>,

    // ---- BLOCK MANIPULATION ----
    pub bottom_intake: Arc<dyn Actuator>,
    pub top_intake: Arc<dyn Actuator>,
    pub unloader: Arc<dyn Actuator>,

    /// The two intake colour sensors
    pub optical: [Arc<dyn OpticalSensor>; 2],

    pub intake_gate: Arc<dyn Solenoid>,

    // ---- ACCESSORIES ----
    pub descorer: Arc<dyn Solenoid>,
    pub match_loader: Arc<dyn Solenoid>,

    // ---- DRIVER AND PLATFORM ----
    pub controller: Arc<dyn InputSurface>,
    pub clock: Arc<dyn Clock>,
}
