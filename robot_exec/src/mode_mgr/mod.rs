//! # Mode manager module
//!
//! Owns the top level modes of the robot and ties the drivetrain and block
//! manipulation together:
//!
//! - Driver control: a fixed period tick reading the controller, run under a
//!   supervisor which restarts it from the top after a fault.
//! - Autonomous: a hardcoded script per starting side, run once.
//! - Button actions: one-shot actions fired by controller presses on their
//!   own threads.
//!
//! Which mode runs is chosen by the caller (the competition harness, or the
//! command line on a host), never by the mode manager itself.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod auton;
mod button_actions;
mod driver_ctrl;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::sync::Arc;

// Internal
pub use auton::*;
pub use button_actions::*;
pub use params::*;

use crate::block_mnpl::{BlockMnpl, BlockMnplError, BlockMnplParams};
use crate::drivetrain::{Drivetrain, DrivetrainError, DrivetrainParams};
use crate::eqpt::RobotEqpt;
use crate::robot_state::RobotState;
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Mode manager
pub struct ModeMgr {
    pub(crate) params: ModeMgrParams,

    pub(crate) eqpt: RobotEqpt,
    pub(crate) robot_state: Arc<RobotState>,

    /// Shared with the button actions, which run blocking moves on their own
    /// threads.
    pub(crate) drivetrain: Arc<Drivetrain>,

    pub(crate) block_mnpl: BlockMnpl,

    mode: Mode,

    /// Number of supervised restarts of driver control
    restarts: u32,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Top level modes of the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    NotStarted,
    Autonomous,
    DriverControl,
}

/// Possible errors that can occur in a mode.
#[derive(Debug, thiserror::Error)]
pub enum ModeError {
    #[error("Drivetrain error: {0}")]
    Drivetrain(#[from] DrivetrainError),

    #[error("Block manipulation error: {0}")]
    BlockMnpl(#[from] BlockMnplError),

    #[error("Invalid button assignment: {0}")]
    Buttons(#[from] ButtonMapError),

    #[error("Panic: {0}")]
    Panic(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ModeMgr {
    /// Build the robot's components on its equipment.
    ///
    /// The button assignment is checked and the block manipulation parameters
    /// are applied to the colour sensors here, before any mode runs.
    pub fn new(
        eqpt: RobotEqpt,
        robot_state: Arc<RobotState>,
        drv_params: DrivetrainParams,
        mnpl_params: BlockMnplParams,
        params: ModeMgrParams,
    ) -> Result<Self, ModeError> {
        params.check()?;

        let drivetrain = Arc::new(Drivetrain::new(
            drv_params,
            eqpt.left_drv.clone(),
            eqpt.right_drv.clone(),
            eqpt.strafe_drv.clone(),
            eqpt.inertial.clone(),
            eqpt.clock.clone(),
            robot_state.clone(),
        ));

        let mut block_mnpl = BlockMnpl::new(&eqpt, robot_state.clone());
        block_mnpl.init(mnpl_params)?;

        Ok(Self {
            params,
            eqpt,
            robot_state,
            drivetrain,
            block_mnpl,
            mode: Mode::NotStarted,
            restarts: 0,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    pub fn params(&self) -> &ModeMgrParams {
        &self.params
    }

    pub fn drivetrain(&self) -> &Arc<Drivetrain> {
        &self.drivetrain
    }

    pub fn block_mnpl(&self) -> &BlockMnpl {
        &self.block_mnpl
    }

    pub fn robot_state(&self) -> &Arc<RobotState> {
        &self.robot_state
    }
}
