//! Autonomous scripts
//!
//! Each starting side has a fixed script of blind moves, block manipulation
//! phases and a heading turn. The manipulation phases run for fixed
//! durations rather than waiting on sensors. Colour rejection is disabled for
//! the whole script so every block is scored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, error, info};
use std::sync::Arc;

// Internal
use super::{Mode, ModeError, ModeMgr};
use crate::block_mnpl::BlockMnplState;
use crate::robot_state::{AllianceColor, RobotState, StartingSide};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Script for a start on the left of the field.
pub const LEFT_SCRIPT: &[AutonStep] = &[
    AutonStep::Blind { forward_mm: 600.0, right_mm: 0.0, speed_pct: 50.0 },
    AutonStep::Mnpl { state: BlockMnplState::Intaking, duration_ms: 1500 },
    AutonStep::Mnpl { state: BlockMnplState::Idle, duration_ms: 0 },
    AutonStep::Turn { angle_deg: 90.0, speed_pct: 30.0 },
    AutonStep::Blind { forward_mm: 300.0, right_mm: 0.0, speed_pct: 40.0 },
    AutonStep::Mnpl { state: BlockMnplState::OutputtingHigh, duration_ms: 2000 },
    AutonStep::Mnpl { state: BlockMnplState::Idle, duration_ms: 0 },
    AutonStep::Blind { forward_mm: -200.0, right_mm: 0.0, speed_pct: 50.0 },
];

/// Script for a start on the right of the field, the mirror of the left.
pub const RIGHT_SCRIPT: &[AutonStep] = &[
    AutonStep::Blind { forward_mm: 600.0, right_mm: 0.0, speed_pct: 50.0 },
    AutonStep::Mnpl { state: BlockMnplState::Intaking, duration_ms: 1500 },
    AutonStep::Mnpl { state: BlockMnplState::Idle, duration_ms: 0 },
    AutonStep::Turn { angle_deg: -90.0, speed_pct: 30.0 },
    AutonStep::Blind { forward_mm: 300.0, right_mm: 0.0, speed_pct: 40.0 },
    AutonStep::Mnpl { state: BlockMnplState::OutputtingHigh, duration_ms: 2000 },
    AutonStep::Mnpl { state: BlockMnplState::Idle, duration_ms: 0 },
    AutonStep::Blind { forward_mm: -200.0, right_mm: 0.0, speed_pct: 50.0 },
];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One step of an autonomous script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutonStep {
    /// Blind move with the current braking mode
    Blind {
        forward_mm: f64,
        right_mm: f64,
        speed_pct: f64,
    },

    /// Heading feedback turn, positive clockwise
    Turn { angle_deg: f64, speed_pct: f64 },

    /// Put block manipulation in `state` and leave it there for
    /// `duration_ms`
    Mnpl {
        state: BlockMnplState,
        duration_ms: u64,
    },
}

/// Overrides the alliance colour while held, restoring the previous colour
/// when dropped.
pub struct AllianceOverride {
    robot_state: Arc<RobotState>,
    saved: AllianceColor,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// The script run from `side`.
pub fn script(side: StartingSide) -> &'static [AutonStep] {
    match side {
        StartingSide::Left => LEFT_SCRIPT,
        StartingSide::Right => RIGHT_SCRIPT,
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ModeMgr {
    /// Entry point of autonomous. Runs the script of the starting side once.
    ///
    /// A fault ends the script early. It is logged and not returned, the
    /// last move has already stopped the wheels. The alliance colour is
    /// restored however the script ends.
    pub fn auton_entry(&mut self) {
        self.mode = Mode::Autonomous;

        let side = self.robot_state.starting_side();
        info!("Running autonomous from the {} side", side);

        let _alliance = AllianceOverride::new(self.robot_state.clone(), AllianceColor::Unknown);

        match self.run_script(script(side)) {
            Ok(()) => info!("Autonomous complete"),
            Err(e) => {
                error!("Autonomous fault: {}", e);
                error!("Emergency stop, autonomous ended early");
            }
        }
    }

    /// Execute the steps of a script in order, stopping at the first fault.
    ///
    /// Block manipulation is left idle at the end.
    pub fn run_script(&mut self, steps: &[AutonStep]) -> Result<(), ModeError> {
        for (i, step) in steps.iter().enumerate() {
            debug!("Autonomous step {}: {:?}", i, step);

            match *step {
                AutonStep::Blind { forward_mm, right_mm, speed_pct } => {
                    self.drivetrain.drive_for_blind(
                        forward_mm,
                        right_mm,
                        speed_pct,
                        self.robot_state.braking_mode(),
                    )?;
                }
                AutonStep::Turn { angle_deg, speed_pct } => {
                    self.drivetrain.turn_for(angle_deg, speed_pct)?;
                }
                AutonStep::Mnpl { state, duration_ms } => {
                    self.block_mnpl.set_state(state);
                    self.block_mnpl.update()?;
                    self.eqpt.clock.sleep_ms(duration_ms);
                }
            }
        }

        self.block_mnpl.set_state(BlockMnplState::Idle);
        self.block_mnpl.update()?;

        Ok(())
    }
}

impl AllianceOverride {
    pub fn new(robot_state: Arc<RobotState>, colour: AllianceColor) -> Self {
        let saved = robot_state.alliance_color();
        robot_state.set_alliance_color(colour);
        debug!("Alliance colour overridden to {} (was {})", colour, saved);

        Self { robot_state, saved }
    }
}

impl Drop for AllianceOverride {
    fn drop(&mut self) {
        self.robot_state.set_alliance_color(self.saved);
        debug!("Alliance colour restored to {}", self.saved);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_scripts_mirror_each_other() {
        assert_eq!(LEFT_SCRIPT.len(), RIGHT_SCRIPT.len());

        let turns = |s: &[AutonStep]| {
            s.iter()
                .filter_map(|step| match step {
                    AutonStep::Turn { angle_deg, .. } => Some(*angle_deg),
                    _ => None,
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(turns(LEFT_SCRIPT), vec![90.0]);
        assert_eq!(turns(RIGHT_SCRIPT), vec![-90.0]);

        assert_eq!(script(StartingSide::Left), LEFT_SCRIPT);
        assert_eq!(script(StartingSide::Right), RIGHT_SCRIPT);
    }

    #[test]
    fn test_alliance_override_restores() {
        let robot_state = Arc::new(RobotState::default());
        robot_state.set_alliance_color(AllianceColor::Blue);

        {
            let _guard = AllianceOverride::new(robot_state.clone(), AllianceColor::Unknown);
            assert_eq!(robot_state.alliance_color(), AllianceColor::Unknown);
        }
        assert_eq!(robot_state.alliance_color(), AllianceColor::Blue);
    }
}
