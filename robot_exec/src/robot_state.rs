//! # Robot State
//!
//! Small process-wide configuration shared by every component: the alliance
//! colour, the drivetrain braking mode and the starting side. The state is
//! written by button actions on their own threads and read by the main tick,
//! so each field is held in an atomic.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use eqpt_if::BrakeMode;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Shared robot state.
#[derive(Debug)]
pub struct RobotState {
    alliance_color: AtomicU8,
    braking_mode: AtomicU8,
    starting_side: AtomicU8,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Colour of the alliance the robot plays for, and the colour of a sensed block.
///
/// `Unknown` disables colour based rejection of blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllianceColor {
    Red,
    Blue,
    Unknown,
}

/// Side of the field the robot starts the match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartingSide {
    Left,
    Right,
}

/// Errors constructing robot state values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RobotStateError {
    #[error("\"{0}\" is not a valid alliance colour (expected red, blue or unknown)")]
    InvalidAllianceColor(String),

    #[error("\"{0}\" is not a valid starting side (expected left or right)")]
    InvalidStartingSide(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RobotState {
    pub fn new(alliance_color: AllianceColor, braking_mode: BrakeMode, side: StartingSide) -> Self {
        Self {
            alliance_color: AtomicU8::new(alliance_color as u8),
            braking_mode: AtomicU8::new(brake_mode_to_u8(braking_mode)),
            starting_side: AtomicU8::new(side as u8),
        }
    }

    pub fn alliance_color(&self) -> AllianceColor {
        match self.alliance_color.load(Ordering::SeqCst) {
            0 => AllianceColor::Red,
            1 => AllianceColor::Blue,
            _ => AllianceColor::Unknown,
        }
    }

    pub fn set_alliance_color(&self, color: AllianceColor) {
        self.alliance_color.store(color as u8, Ordering::SeqCst);
    }

    pub fn braking_mode(&self) -> BrakeMode {
        match self.braking_mode.load(Ordering::SeqCst) {
            0 => BrakeMode::Coast,
            1 => BrakeMode::Brake,
            _ => BrakeMode::Hold,
        }
    }

    pub fn set_braking_mode(&self, mode: BrakeMode) {
        self.braking_mode.store(brake_mode_to_u8(mode), Ordering::SeqCst);
    }

    pub fn starting_side(&self) -> StartingSide {
        match self.starting_side.load(Ordering::SeqCst) {
            0 => StartingSide::Left,
            _ => StartingSide::Right,
        }
    }

    pub fn set_starting_side(&self, side: StartingSide) {
        self.starting_side.store(side as u8, Ordering::SeqCst);
    }
}

impl Default for RobotState {
    fn default() -> Self {
        Self::new(AllianceColor::Unknown, BrakeMode::Brake, StartingSide::Left)
    }
}

impl AllianceColor {
    /// Get the colour of the opposing alliance. `Unknown` has no opposite.
    pub fn opposite(self) -> Self {
        match self {
            AllianceColor::Red => AllianceColor::Blue,
            AllianceColor::Blue => AllianceColor::Red,
            AllianceColor::Unknown => AllianceColor::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AllianceColor::Red => "RED",
            AllianceColor::Blue => "BLUE",
            AllianceColor::Unknown => "UNKNOWN",
        }
    }

    pub fn equals_ignoring_case(self, s: &str) -> bool {
        self.name().eq_ignore_ascii_case(s.trim())
    }
}

impl FromStr for AllianceColor {
    type Err = RobotStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [AllianceColor::Red, AllianceColor::Blue, AllianceColor::Unknown]
            .iter()
            .copied()
            .find(|c| c.equals_ignoring_case(s))
            .ok_or_else(|| RobotStateError::InvalidAllianceColor(s.to_string()))
    }
}

impl fmt::Display for AllianceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl StartingSide {
    pub fn name(self) -> &'static str {
        match self {
            StartingSide::Left => "LEFT",
            StartingSide::Right => "RIGHT",
        }
    }
}

impl FromStr for StartingSide {
    type Err = RobotStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(StartingSide::Left),
            "right" => Ok(StartingSide::Right),
            _ => Err(RobotStateError::InvalidStartingSide(s.to_string())),
        }
    }
}

impl fmt::Display for StartingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn brake_mode_to_u8(mode: BrakeMode) -> u8 {
    match mode {
        BrakeMode::Coast => 0,
        BrakeMode::Brake => 1,
        BrakeMode::Hold => 2,
    }
}
