//! Intake colour rejection
//!
//! While intaking, blocks of the opposing alliance's colour are ejected by
//! reversing the top intake stage. A rejection is held for a debounce window
//! after the block was last seen, long enough for it to physically leave the
//! sensing zone, and then released so that the intake accepts by default.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;

use super::BlockMnplParams;
use crate::robot_state::AllianceColor;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One reading of an intake colour sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Colour classified from the sensed hue
    pub colour: AllianceColor,

    /// True if a block is in front of the sensor
    pub near: bool,
}

/// Decision to reject the block currently in the intake.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntakeRejectionTracker {
    reject_current_block: bool,

    /// Time of the last detection which set the decision.
    ///
    /// Units: milliseconds
    last_trigger_ms: u64,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Classify a sensed hue into a block colour using the configured bands.
///
/// Hues in neither band are `Unknown`.
pub fn classify_hue(hue: f64, params: &BlockMnplParams) -> AllianceColor {
    if params.red_hue.contains(hue) {
        AllianceColor::Red
    } else if params.blue_hue.contains(hue) {
        AllianceColor::Blue
    } else {
        AllianceColor::Unknown
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl IntakeRejectionTracker {
    pub fn reject_current_block(&self) -> bool {
        self.reject_current_block
    }

    pub fn last_trigger_ms(&self) -> u64 {
        self.last_trigger_ms
    }

    /// Update the decision from the current sensor readings.
    ///
    /// - With an `Unknown` alliance rejection is disabled.
    /// - When either sensor sees a block, red takes priority over blue, and
    ///   the block is rejected if it is not the alliance's colour. A block of
    ///   unknown colour leaves the decision unchanged.
    /// - With no block seen, a rejection is cleared once more than
    ///   `debounce_ms` has passed since the last detection.
    pub fn check(
        &mut self,
        alliance: AllianceColor,
        readings: &[SensorReading],
        now_ms: u64,
        debounce_ms: u64,
    ) -> bool {
        if alliance == AllianceColor::Unknown {
            self.reject_current_block = false;
            return false;
        }

        if readings.iter().any(|r| r.near) {
            let seen = |c: AllianceColor| readings.iter().any(|r| r.colour == c);

            let block = if seen(AllianceColor::Red) {
                Some(AllianceColor::Red)
            } else if seen(AllianceColor::Blue) {
                Some(AllianceColor::Blue)
            } else {
                None
            };

            if let Some(block) = block {
                let reject = block == alliance.opposite();
                if reject != self.reject_current_block {
                    debug!("{} block detected, reject: {}", block, reject);
                }
                self.reject_current_block = reject;
                self.last_trigger_ms = now_ms;
            }
        } else if self.reject_current_block
            && util::time::elapsed_ms(self.last_trigger_ms, now_ms) > debounce_ms
        {
            debug!("Rejected block cleared");
            self.reject_current_block = false;
        }

        self.reject_current_block
    }
}
