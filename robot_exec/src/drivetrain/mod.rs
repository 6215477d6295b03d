//! Drivetrain control module
//!
//! Translates drive intents into per-wheel motor commands for the three wheel
//! drivetrain (left, right, strafe), and provides the two blocking motion
//! primitives used by autonomous scripts and button actions:
//!
//! - `drive_for_blind` - open loop positional move
//! - `turn_for` - turn by an angle using heading feedback

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod params;
mod state;
mod calc_blind;
mod calc_turn;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use params::*;
pub use state::*;
pub use calc_blind::mm_to_wheel_deg;
pub use calc_turn::{heading_error_deg, target_heading_deg};

use eqpt_if::EqptError;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of drive wheels on the robot.
pub const NUM_DRV_WHEELS: usize = 3;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during Drivetrain operation.
#[derive(Debug, thiserror::Error)]
pub enum DrivetrainError {
    #[error("Drive actuator fault: {0}")]
    ActuatorFault(#[from] EqptError),

    #[error("Another blocking move already owns the wheels")]
    MoveInProgress,
}
