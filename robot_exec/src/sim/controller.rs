//! Simulated driver controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use eqpt_if::{Axis, Button, InputSurface, PressCallback};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

type SharedCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// A controller whose sticks and buttons are set by the caller.
#[derive(Default)]
pub struct SimController {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    axes: HashMap<Axis, f64>,
    held: HashSet<Button>,
    callbacks: HashMap<Button, SharedCallback>,
    registrations: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_axis(&self, axis: Axis, position: f64) {
        self.lock().axes.insert(axis, position);
    }

    /// Hold a button without firing its callback.
    pub fn hold(&self, button: Button) {
        self.lock().held.insert(button);
    }

    /// Press a button: hold it and fire its callback on a new thread.
    ///
    /// Returns the callback's thread, or `None` if nothing is registered.
    pub fn press(&self, button: Button) -> Option<JoinHandle<()>> {
        let callback = {
            let mut inner = self.lock();
            inner.held.insert(button);
            inner.callbacks.get(&button).cloned()
        };

        callback.map(|cb| thread::spawn(move || (*cb)()))
    }

    pub fn release(&self, button: Button) {
        self.lock().held.remove(&button);
    }

    pub fn release_all(&self) {
        self.lock().held.clear();
    }

    pub fn is_registered(&self, button: Button) -> bool {
        self.lock().callbacks.contains_key(&button)
    }

    /// Number of buttons with a callback.
    pub fn num_callbacks(&self) -> usize {
        self.lock().callbacks.len()
    }

    /// Total number of `on_press` calls received.
    pub fn num_registrations(&self) -> usize {
        self.lock().registrations
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl InputSurface for SimController {
    fn axis_position(&self, axis: Axis) -> f64 {
        self.lock().axes.get(&axis).copied().unwrap_or(0.0)
    }

    fn pressing(&self, button: Button) -> bool {
        self.lock().held.contains(&button)
    }

    fn on_press(&self, button: Button, callback: PressCallback) {
        let mut inner = self.lock();
        inner.registrations += 1;
        inner.callbacks.insert(button, Arc::from(callback));
    }
}
