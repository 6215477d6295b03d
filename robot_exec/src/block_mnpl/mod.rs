//! # Block manipulation module
//!
//! Owns the intake/output mechanism: two intake stages (bottom and top), the
//! unloading motor, the intake gate and the two intake colour sensors.
//!
//! Exactly one [`BlockMnplState`] is active at a time. The state is set from
//! outside every tick, then `update` performs the behaviour of that state.
//! There are no transition actions, leaving a state simply means its
//! behaviour is not run on the next tick.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod intake;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use intake::*;
pub use params::*;
pub use state::*;

use eqpt_if::EqptError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Behaviours of the block manipulation mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMnplState {
    Idle,
    Intaking,
    OutputtingLow,
    OutputtingMedium,
    OutputtingHigh,
}

/// Possible errors that can occur during block manipulation.
#[derive(Debug, thiserror::Error)]
pub enum BlockMnplError {
    #[error("Block manipulation equipment fault: {0}")]
    EqptFault(#[from] EqptError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BlockMnplState {
    /// Select the state from the buttons held by the driver.
    ///
    /// Precedence is intake, then low, medium and high output. With no button
    /// held the mechanism idles.
    pub fn from_buttons(intake: bool, output_low: bool, output_medium: bool, output_high: bool) -> Self {
        if intake {
            BlockMnplState::Intaking
        } else if output_low {
            BlockMnplState::OutputtingLow
        } else if output_medium {
            BlockMnplState::OutputtingMedium
        } else if output_high {
            BlockMnplState::OutputtingHigh
        } else {
            BlockMnplState::Idle
        }
    }
}

impl Default for BlockMnplState {
    fn default() -> Self {
        BlockMnplState::Idle
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_buttons_precedence() {
        use BlockMnplState::*;

        // (intake, low, medium, high) -> state
        let table = [
            ((false, false, false, false), Idle),
            ((false, false, false, true), OutputtingHigh),
            ((false, false, true, false), OutputtingMedium),
            ((false, false, true, true), OutputtingMedium),
            ((false, true, false, false), OutputtingLow),
            ((false, true, false, true), OutputtingLow),
            ((false, true, true, false), OutputtingLow),
            ((false, true, true, true), OutputtingLow),
            ((true, false, false, false), Intaking),
            ((true, false, false, true), Intaking),
            ((true, false, true, false), Intaking),
            ((true, false, true, true), Intaking),
            ((true, true, false, false), Intaking),
            ((true, true, false, true), Intaking),
            ((true, true, true, false), Intaking),
            ((true, true, true, true), Intaking),
        ];

        for ((intake, low, medium, high), expected) in table.iter() {
            assert_eq!(
                BlockMnplState::from_buttons(*intake, *low, *medium, *high),
                *expected,
                "buttons {:?}",
                (intake, low, medium, high)
            );
        }
    }

    #[test]
    fn test_intake_beats_output() {
        assert_eq!(
            BlockMnplState::from_buttons(true, true, false, false),
            BlockMnplState::Intaking
        );
        assert_eq!(BlockMnplState::default(), BlockMnplState::Idle);
    }
}
