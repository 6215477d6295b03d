//! # Robot library.
//!
//! The behaviour core of the robot: drivetrain control, the block manipulation
//! state machine and the mode orchestration tying them together. Equipment is
//! reached only through the `eqpt_if` traits.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Block manipulation module - intake, colour rejection and scoring outputs
pub mod block_mnpl;

/// Drivetrain module - arcade mixing plus blind moves and heading turns
pub mod drivetrain;

/// Equipment bundle handed to each component
pub mod eqpt;

/// Mode manager - driver control, autonomous and button actions
pub mod mode_mgr;

/// Parameters of the executable
pub mod params;

/// Process-wide robot state
pub mod robot_state;

/// Simulated equipment, used when running on a host and in tests
pub mod sim;
