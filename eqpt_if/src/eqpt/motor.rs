//! # Motor Interface
//!
//! A motor, or a group of motors commanded as one.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::EqptError;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Default longest time a group waits for a position move to finish.
pub const GROUP_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Interval between polls of the members while a group waits.
const GROUP_WAIT_POLL: Duration = Duration::from_millis(5);

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Capabilities of a single motor or of a group of motors.
///
/// Commands are non-blocking unless stated otherwise. Handles are shared
/// between the main tick and background actions, so every method takes
/// `&self`.
pub trait Actuator: Send + Sync {
    /// Spin continuously in `direction` at `speed`.
    fn spin(&self, direction: Direction, speed: f64, units: VelocityUnits)
        -> Result<(), EqptError>;

    /// Stop using the given brake behaviour.
    fn stop(&self, mode: BrakeMode) -> Result<(), EqptError>;

    /// Set the default velocity used by position moves.
    fn set_velocity(&self, value: f64, units: VelocityUnits) -> Result<(), EqptError>;

    /// Set the brake behaviour applied when the motor stops on its own.
    fn set_stopping(&self, mode: BrakeMode) -> Result<(), EqptError>;

    /// Rotate by `amount` at the default velocity. When `wait` is false the
    /// call returns immediately and [`Actuator::is_spinning`] reports
    /// progress.
    fn spin_for(
        &self,
        direction: Direction,
        amount: f64,
        units: RotationUnits,
        wait: bool,
    ) -> Result<(), EqptError>;

    /// True while the motor is executing a move.
    fn is_spinning(&self) -> bool;

    /// The current velocity.
    fn velocity(&self, units: VelocityUnits) -> f64;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A group of actuators which receive identical commands.
#[derive(Clone)]
pub struct ActuatorGroup {
    members: Vec<Arc<dyn Actuator>>,

    /// Longest time a waiting `spin_for` blocks for
    wait_timeout: Duration,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Spin direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Reverse,
}

/// Behaviour of a motor when it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrakeMode {
    /// Free-wheel to a stop
    Coast,
    /// Short the windings to stop quickly
    Brake,
    /// Actively hold the stopped position
    Hold,
}

/// Units of a velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityUnits {
    Percent,
    Rpm,
}

/// Units of a rotation amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationUnits {
    Deg,
    Rev,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Direction {
    /// Get the opposite direction.
    pub fn invert(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

impl std::str::FromStr for BrakeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coast" => Ok(BrakeMode::Coast),
            "brake" => Ok(BrakeMode::Brake),
            "hold" => Ok(BrakeMode::Hold),
            _ => Err(format!("{} is not a recognised brake mode", s)),
        }
    }
}

impl ActuatorGroup {
    /// Create a new group from its members.
    pub fn new(members: Vec<Arc<dyn Actuator>>) -> Self {
        Self {
            members,
            wait_timeout: GROUP_WAIT_TIMEOUT,
        }
    }

    /// Replace the time after which a waiting `spin_for` gives up.
    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    /// Number of actuators in the group.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Apply a command to every member. All members are commanded even if
    /// one fails, the first error is returned.
    fn fan_out<F>(&self, cmd: F) -> Result<(), EqptError>
    where
        F: Fn(&dyn Actuator) -> Result<(), EqptError>,
    {
        let mut result = Ok(());
        for (i, m) in self.members.iter().enumerate() {
            if let Err(e) = cmd(m.as_ref()) {
                debug!("Actuator group member {} failed: {}", i, e);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

impl Actuator for ActuatorGroup {
    fn spin(&self, direction: Direction, speed: f64, units: VelocityUnits)
        -> Result<(), EqptError>
    {
        self.fan_out(|m| m.spin(direction, speed, units))
    }

    fn stop(&self, mode: BrakeMode) -> Result<(), EqptError> {
        self.fan_out(|m| m.stop(mode))
    }

    fn set_velocity(&self, value: f64, units: VelocityUnits) -> Result<(), EqptError> {
        self.fan_out(|m| m.set_velocity(value, units))
    }

    fn set_stopping(&self, mode: BrakeMode) -> Result<(), EqptError> {
        self.fan_out(|m| m.set_stopping(mode))
    }

    fn spin_for(
        &self,
        direction: Direction,
        amount: f64,
        units: RotationUnits,
        wait: bool,
    ) -> Result<(), EqptError> {
        // Waiting per member would serialise the moves, so start them all
        // and then wait on the group.
        self.fan_out(|m| m.spin_for(direction, amount, units, false))?;
        if !wait {
            return Ok(());
        }

        let start = Instant::now();
        while self.is_spinning() {
            if start.elapsed() >= self.wait_timeout {
                warn!(
                    "Actuator group move did not finish within {} ms",
                    self.wait_timeout.as_millis()
                );
                break;
            }
            thread::sleep(GROUP_WAIT_POLL);
        }
        Ok(())
    }

    fn is_spinning(&self) -> bool {
        self.members.iter().any(|m| m.is_spinning())
    }

    fn velocity(&self, units: VelocityUnits) -> f64 {
        self.members
            .first()
            .map(|m| m.velocity(units))
            .unwrap_or(0.0)
    }
}
