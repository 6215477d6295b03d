//! Main robot-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session and logging
//!     - Load parameters and the initial robot state
//!     - Calibrate the inertial sensor
//!     - Initialise all modules
//!     - Run the selected mode:
//!         - Autonomous: run the script of the starting side once
//!         - Driver control: supervised loop, restarted after any fault
//!
//! On a host the equipment is simulated and the competition harness is
//! replaced by the command line, which selects the mode and bounds the
//! driver control loop.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{info, warn};
use std::sync::Arc;
use structopt::StructOpt;

// Internal
use eqpt_if::{BrakeMode, SystemClock};
use robot_lib::{
    block_mnpl::BlockMnplParams,
    drivetrain::DrivetrainParams,
    mode_mgr::{ModeMgr, ModeMgrParams},
    params::RobotExecParams,
    robot_state::{AllianceColor, RobotState, StartingSide},
    sim::SimRobot,
};
use util::{
    logger::{level_from_str, logger_init},
    session::Session,
};

// ---------------------------------------------------------------------------
// STRUCTURES
// ---------------------------------------------------------------------------

/// Robot control executable.
#[derive(Debug, StructOpt)]
#[structopt(name = "robot_exec")]
struct Args {
    #[structopt(subcommand)]
    mode: ModeArg,
}

/// The mode to run.
#[derive(Debug, StructOpt)]
enum ModeArg {
    /// Run the autonomous script of the configured starting side.
    #[structopt(name = "auton")]
    Auton,

    /// Run driver control.
    #[structopt(name = "driver")]
    Driver {
        /// Return after this many cycles of the loop.
        #[structopt(long)]
        cycles: Option<u64>,

        /// Give up after this many restarts.
        #[structopt(long)]
        restarts: Option<u32>,
    },
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let args = Args::from_args();

    // ---- EARLY INITIALISATION ----

    let exec_params: RobotExecParams = util::params::load("robot_exec.toml")
        .wrap_err("Could not load exec params")?;

    // Initialise session
    let session = Session::new("robot_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    let min_level = level_from_str(&exec_params.log_level)
        .ok_or_else(|| eyre!("Invalid log level \"{}\"", exec_params.log_level))?;
    logger_init(min_level, &session).wrap_err("Failed to initialise logging")?;

    info!("Robot Executable\n");
    info!("Session directory: {:?}", session.session_root);

    match session.prune(exec_params.max_sessions) {
        Ok(0) => (),
        Ok(n) => info!("Removed {} old sessions", n),
        Err(e) => warn!("Could not remove old sessions: {}", e),
    }

    // ---- LOAD PARAMETERS ----

    let drv_params: DrivetrainParams = util::params::load("drivetrain.toml")
        .wrap_err("Could not load drivetrain params")?;
    let mnpl_params: BlockMnplParams = util::params::load("block_mnpl.toml")
        .wrap_err("Could not load block manipulation params")?;
    let mode_params: ModeMgrParams = util::params::load("mode_mgr.toml")
        .wrap_err("Could not load mode manager params")?;

    info!("Parameters loaded");

    // ---- ROBOT STATE ----

    let alliance: AllianceColor = exec_params.alliance_color.parse()
        .wrap_err("Invalid initial alliance colour")?;
    let side: StartingSide = exec_params.starting_side.parse()
        .wrap_err("Invalid starting side")?;
    let braking: BrakeMode = exec_params.braking_mode.parse()
        .map_err(|e: String| eyre!(e))
        .wrap_err("Invalid initial braking mode")?;

    let robot_state = Arc::new(RobotState::new(alliance, braking, side));

    info!("Alliance {}, starting {}, braking {:?}", alliance, side, braking);

    // ---- EQUIPMENT ----

    let sim = SimRobot::with_clock(Arc::new(SystemClock::new()));
    let eqpt = sim.eqpt();

    eqpt.inertial.calibrate().wrap_err("Failed to calibrate the inertial sensor")?;
    info!("Inertial sensor calibrated");

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut mode_mgr = ModeMgr::new(eqpt, robot_state, drv_params, mnpl_params, mode_params)
        .wrap_err("Failed to initialise the mode manager")?;

    info!("Module initialisation complete\n");

    // ---- RUN ----

    match args.mode {
        ModeArg::Auton => mode_mgr.auton_entry(),
        ModeArg::Driver { cycles: None, restarts: None } => mode_mgr.driver_ctrl_entry(),
        ModeArg::Driver { cycles, restarts } => {
            mode_mgr.supervise(restarts, cycles)
                .wrap_err("Driver control failed")?;
            info!("Driver control ran for {} restarts", mode_mgr.restarts());
        }
    }

    info!("End of execution");

    Ok(())
}
