//! Parameters structure for the Drivetrain

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the Drivetrain.
#[derive(Debug, Clone, Deserialize)]
pub struct DrivetrainParams {

    // ---- GEOMETRY ----

    /// Diameter of the drive wheels.
    ///
    /// Units: millimeters
    pub wheel_diameter_mm: f64,

    // ---- MOTION PRIMITIVES ----

    /// Period at which blocking primitives poll for completion.
    ///
    /// Units: milliseconds
    pub poll_period_ms: u64,

    /// Time after which a blind move gives up waiting for the wheels.
    ///
    /// Units: milliseconds
    pub blind_timeout_ms: u64,

    /// Default time after which a turn gives up.
    ///
    /// Units: milliseconds
    pub turn_timeout_ms: u64,

    /// A turn is complete once the heading is closer than this to the target.
    ///
    /// Units: degrees
    pub turn_tolerance_deg: f64,
}

impl Default for DrivetrainParams {
    fn default() -> Self {
        Self {
            wheel_diameter_mm: 101.6,
            poll_period_ms: 10,
            blind_timeout_ms: 5000,
            turn_timeout_ms: 5000,
            turn_tolerance_deg: 1.0,
        }
    }
}
