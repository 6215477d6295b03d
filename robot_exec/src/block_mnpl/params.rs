//! Parameters structure for block manipulation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for block manipulation.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockMnplParams {

    // ---- MOTORS ----

    /// Speed of every manipulation motor when running.
    ///
    /// Units: percent
    pub motor_speed_pct: f64,

    // ---- COLOUR SENSING ----

    /// Hue band classified as a red block.
    pub red_hue: HueBand,

    /// Hue band classified as a blue block.
    pub blue_hue: HueBand,

    /// How long a rejection is held after the last detection of a block.
    ///
    /// Units: milliseconds
    pub debounce_ms: u64,

    /// Illumination power of the colour sensors.
    ///
    /// Units: percent
    pub light_power_pct: f64,

    /// Distance under which the colour sensors report a block.
    ///
    /// Units: millimeters
    pub object_detect_threshold_mm: f64,

    // ---- OUTPUT PROFILES ----

    pub output_low: OutputProfile,
    pub output_medium: OutputProfile,
    pub output_high: OutputProfile,
}

/// An inclusive band of hue values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HueBand {
    pub min: f64,
    pub max: f64,
}

/// Motor demands of an output state.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct OutputProfile {
    pub bottom: MotorDemand,
    pub top: MotorDemand,
    pub unloader: MotorDemand,

    /// Close the intake gate while outputting
    #[serde(default)]
    pub close_gate: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Demand on a single manipulation motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotorDemand {
    Forward,
    Reverse,
    /// Stop with brake
    Stop,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HueBand {
    pub fn contains(&self, hue: f64) -> bool {
        hue >= self.min && hue <= self.max
    }
}

impl Default for BlockMnplParams {
    fn default() -> Self {
        Self {
            motor_speed_pct: 100.0,
            red_hue: HueBand { min: 0.0, max: 10.0 },
            blue_hue: HueBand { min: 120.0, max: 255.0 },
            debounce_ms: 1000,
            light_power_pct: 100.0,
            object_detect_threshold_mm: 100.0,
            output_low: OutputProfile {
                bottom: MotorDemand::Reverse,
                top: MotorDemand::Stop,
                unloader: MotorDemand::Reverse,
                close_gate: false,
            },
            output_medium: OutputProfile {
                bottom: MotorDemand::Forward,
                top: MotorDemand::Reverse,
                unloader: MotorDemand::Reverse,
                close_gate: false,
            },
            output_high: OutputProfile {
                bottom: MotorDemand::Forward,
                top: MotorDemand::Forward,
                unloader: MotorDemand::Reverse,
                close_gate: true,
            },
        }
    }
}
