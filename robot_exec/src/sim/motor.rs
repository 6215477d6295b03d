//! Simulated motor

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::VecDeque;
use std::sync::Mutex;

use eqpt_if::{Actuator, BrakeMode, Direction, EqptError, RotationUnits, VelocityUnits};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of `is_spinning` polls a non-zero position move lasts by default.
const DEFAULT_POLLS_PER_MOVE: u32 = 3;

/// Number of most recent commands kept by each motor.
pub const CALL_LOG_CAPACITY: usize = 1024;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command received by a [`SimMotor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorCall {
    Spin(Direction, f64),
    Stop(BrakeMode),
    SetVelocity(f64),
    SetStopping(BrakeMode),
    /// Position move, amount in degrees
    SpinFor(Direction, f64),
}

/// A motor which records its most recent commands.
///
/// A position move reports spinning for a fixed number of polls of
/// `is_spinning`, or forever while `hold_spinning` is set.
pub struct SimMotor {
    name: String,
    inner: Mutex<Inner>,
}

struct Inner {
    calls: VecDeque<MotorCall>,

    /// Default velocity used by position moves, percent
    velocity_pct: f64,
    stopping: BrakeMode,

    /// Signed speed of the last continuous spin, percent
    signed_speed_pct: f64,

    remaining_polls: u32,
    polls_per_move: u32,
    hold_spinning: bool,

    fault: Option<EqptError>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimMotor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inner: Mutex::new(Inner {
                calls: VecDeque::with_capacity(CALL_LOG_CAPACITY),
                velocity_pct: 50.0,
                stopping: BrakeMode::Coast,
                signed_speed_pct: 0.0,
                remaining_polls: 0,
                polls_per_move: DEFAULT_POLLS_PER_MOVE,
                hold_spinning: false,
                fault: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last [`CALL_LOG_CAPACITY`] commands received, oldest first.
    pub fn calls(&self) -> Vec<MotorCall> {
        self.lock().calls.iter().copied().collect()
    }

    pub fn num_calls(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn last_call(&self) -> Option<MotorCall> {
        self.lock().calls.back().copied()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Signed speed of the current continuous spin, zero once stopped.
    pub fn signed_speed(&self) -> f64 {
        self.lock().signed_speed_pct
    }

    pub fn stopping(&self) -> BrakeMode {
        self.lock().stopping
    }

    /// Keep reporting spinning after a position move until cleared.
    pub fn set_hold_spinning(&self, hold: bool) {
        self.lock().hold_spinning = hold;
    }

    pub fn set_polls_per_move(&self, polls: u32) {
        self.lock().polls_per_move = polls;
    }

    /// Make every subsequent command fail with `fault`, or succeed again
    /// with `None`.
    pub fn set_fault(&self, fault: Option<EqptError>) {
        self.lock().fault = fault;
    }

    /// Make every subsequent command fail as if the motor was unplugged.
    pub fn disconnect(&self) {
        self.set_fault(Some(EqptError::Disconnected(self.name.clone())));
    }

    /// Record a command and report the configured fault, if any.
    fn command<F>(&self, call: MotorCall, apply: F) -> Result<(), EqptError>
    where
        F: FnOnce(&mut Inner),
    {
        let mut inner = self.lock();
        if inner.calls.len() == CALL_LOG_CAPACITY {
            inner.calls.pop_front();
        }
        inner.calls.push_back(call);
        match inner.fault.clone() {
            Some(e) => Err(e),
            None => {
                apply(&mut inner);
                Ok(())
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A test which panicked while holding the lock leaves valid data
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Actuator for SimMotor {
    fn spin(&self, direction: Direction, speed: f64, _units: VelocityUnits)
        -> Result<(), EqptError>
    {
        self.command(MotorCall::Spin(direction, speed), |m| {
            m.signed_speed_pct = match direction {
                Direction::Forward => speed,
                Direction::Reverse => -speed,
            };
        })
    }

    fn stop(&self, mode: BrakeMode) -> Result<(), EqptError> {
        self.command(MotorCall::Stop(mode), |m| {
            m.signed_speed_pct = 0.0;
            m.remaining_polls = 0;
        })
    }

    fn set_velocity(&self, value: f64, _units: VelocityUnits) -> Result<(), EqptError> {
        self.command(MotorCall::SetVelocity(value), |m| m.velocity_pct = value)
    }

    fn set_stopping(&self, mode: BrakeMode) -> Result<(), EqptError> {
        self.command(MotorCall::SetStopping(mode), |m| m.stopping = mode)
    }

    fn spin_for(
        &self,
        direction: Direction,
        amount: f64,
        units: RotationUnits,
        _wait: bool,
    ) -> Result<(), EqptError> {
        let deg = match units {
            RotationUnits::Deg => amount,
            RotationUnits::Rev => amount * 360.0,
        };

        self.command(MotorCall::SpinFor(direction, deg), |m| {
            m.remaining_polls = match deg == 0.0 {
                true => 0,
                false => m.polls_per_move,
            };
        })
    }

    fn is_spinning(&self) -> bool {
        let mut inner = self.lock();
        if inner.hold_spinning {
            return true;
        }
        match inner.remaining_polls {
            0 => false,
            _ => {
                inner.remaining_polls -= 1;
                true
            }
        }
    }

    fn velocity(&self, _units: VelocityUnits) -> f64 {
        self.lock().velocity_pct
    }
}
