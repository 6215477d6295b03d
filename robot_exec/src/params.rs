//! # Robot Executable Parameters
//!
//! This module provides parameters for the robot executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RobotExecParams {

    /// Most verbose level of log messages, one of `trace`, `debug` or `info`
    pub log_level: String,

    /// Number of session directories kept, older ones are deleted at start up
    pub max_sessions: usize,

    /// Alliance colour at start up, `red`, `blue` or `unknown`
    pub alliance_color: String,

    /// Starting side of the field, `left` or `right`
    pub starting_side: String,

    /// Drivetrain braking mode at start up, `coast`, `brake` or `hold`
    pub braking_mode: String,
}

impl Default for RobotExecParams {
    fn default() -> Self {
        Self {
            log_level: String::from("info"),
            max_sessions: 5,
            alliance_color: String::from("red"),
            starting_side: String::from("left"),
            braking_mode: String::from("brake"),
        }
    }
}
