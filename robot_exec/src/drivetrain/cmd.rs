//! Commands passed into the Drivetrain

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An arcade drive command.
///
/// Each channel is a signed percentage nominally in [-100, 100]. Values are
/// not clamped, speed modifiers may push them out of range and the motors
/// saturate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrvCmd {
    /// Forward (+) / backward (-) speed
    pub forward: f64,

    /// Right (+) / left (-) strafe speed
    pub strafe: f64,

    /// Clockwise (+) / anticlockwise (-) turn speed
    pub turn: f64,
}

/// Per-wheel speed demands, in percent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WheelSpeeds {
    pub left: f64,
    pub right: f64,
    pub strafe: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DrvCmd {
    pub fn new(forward: f64, strafe: f64, turn: f64) -> Self {
        Self { forward, strafe, turn }
    }

    /// Mix the command into wheel speeds.
    pub fn mix(&self) -> WheelSpeeds {
        WheelSpeeds {
            left: self.forward + self.turn,
            right: self.forward - self.turn,
            strafe: self.strafe,
        }
    }

    /// Scale each channel by its modifier.
    pub fn scaled(&self, forward_mod: f64, strafe_mod: f64, turn_mod: f64) -> Self {
        Self {
            forward: self.forward * forward_mod,
            strafe: self.strafe * strafe_mod,
            turn: self.turn * turn_mod,
        }
    }
}
