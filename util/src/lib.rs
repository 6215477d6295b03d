//! Utility library for the robot control software

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod host;
#[macro_use]
pub mod logger;
pub mod maths;
pub mod module;
pub mod params;
pub mod session;
pub mod time;

// ---------------------------------------------------------------------------
// REEXPORTS
// ---------------------------------------------------------------------------

pub use log;

// ---------------------------------------------------------------------------
// MACROS
// ---------------------------------------------------------------------------

/// Log a message at the critical level.
///
/// `log` has no level above error, so critical records are error records sent
/// to the [`logger::CRITICAL_TARGET`] target, which the formatter tags `CRT`.
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => ({
        $crate::log::error!(target: $crate::logger::CRITICAL_TARGET, $($arg)+);
    });
}
