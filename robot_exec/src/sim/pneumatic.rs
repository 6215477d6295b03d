//! Simulated solenoid

use std::sync::Mutex;

use eqpt_if::{EqptError, Solenoid};

/// A solenoid which records every position it is commanded to.
#[derive(Default)]
pub struct SimSolenoid {
    /// Commanded positions in order, `true` for open
    history: Mutex<Vec<bool>>,
}

impl SimSolenoid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<bool> {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn push(&self, open: bool) {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).push(open);
    }
}

impl Solenoid for SimSolenoid {
    fn open(&self) -> Result<(), EqptError> {
        self.push(true);
        Ok(())
    }

    fn close(&self) -> Result<(), EqptError> {
        self.push(false);
        Ok(())
    }

    fn value(&self) -> bool {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .copied()
            .unwrap_or(false)
    }
}
