//! Parameters structure for the mode manager

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use eqpt_if::{Axis, Button};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the mode manager.
#[derive(Debug, Clone, Deserialize)]
pub struct ModeMgrParams {

    // ---- DRIVER CONTROL LOOP ----

    /// Target period of one driver control cycle.
    ///
    /// Units: milliseconds
    pub cycle_period_ms: u64,

    // ---- STICKS ----

    /// Stick positions with a magnitude below this are treated as zero.
    ///
    /// Units: percent
    pub deadzone: f64,

    pub forward_axis: Axis,
    pub turn_axis: Axis,
    pub strafe_input: StrafeInput,

    pub forward_modifier: f64,
    pub strafe_modifier: f64,
    pub turn_modifier: f64,

    // ---- BUTTONS ----

    pub buttons: ButtonMap,

    /// Hold time after which the colour switch disables colour rejection.
    ///
    /// Units: milliseconds
    pub long_press_ms: u64,

    /// Sampling period while measuring a long press.
    ///
    /// Units: milliseconds
    pub long_press_poll_ms: u64,

    /// How long the descorer stays open when triggered.
    ///
    /// Units: milliseconds
    pub descorer_pulse_ms: u64,

    // ---- NUDGE ----

    /// Distance of a nudge.
    ///
    /// Units: millimeters
    pub nudge_mm: f64,

    /// Units: percent
    pub nudge_speed_pct: f64,
}

/// Assignment of controller buttons to robot functions.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ButtonMap {
    // Held
    pub intake: Button,
    pub output_low: Button,
    pub output_medium: Button,
    pub output_high: Button,

    // Pressed
    pub colour_switch: Button,
    pub braking_switch: Button,
    pub descorer: Button,
    pub match_loader: Button,
    pub nudge_forward: Button,
    pub nudge_back: Button,
    pub nudge_left: Button,
    pub nudge_right: Button,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Problems with the assignment of buttons to functions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ButtonMapError {
    #[error("{0:?} is assigned to both {1} and {2}")]
    Duplicate(Button, &'static str, &'static str),
}

/// Source of the strafe demand.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrafeInput {
    /// An analogue axis
    Axis { axis: Axis },

    /// A pair of buttons each strafing at a fixed speed
    Buttons {
        left: Button,
        right: Button,
        speed_pct: f64,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ModeMgrParams {
    fn default() -> Self {
        Self {
            cycle_period_ms: 20,
            deadzone: 5.0,
            forward_axis: Axis::A2,
            turn_axis: Axis::A4,
            strafe_input: StrafeInput::Axis { axis: Axis::A1 },
            forward_modifier: 1.0,
            strafe_modifier: 1.0,
            turn_modifier: 1.0,
            buttons: ButtonMap::default(),
            long_press_ms: 1000,
            long_press_poll_ms: 10,
            descorer_pulse_ms: 500,
            nudge_mm: 50.0,
            nudge_speed_pct: 30.0,
        }
    }
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self {
            intake: Button::R1,
            output_low: Button::R2,
            output_medium: Button::L2,
            output_high: Button::L1,
            colour_switch: Button::X,
            braking_switch: Button::B,
            descorer: Button::Y,
            match_loader: Button::A,
            nudge_forward: Button::Up,
            nudge_back: Button::Down,
            nudge_left: Button::Left,
            nudge_right: Button::Right,
        }
    }
}

impl ModeMgrParams {
    /// Check the button assignment.
    ///
    /// No button may serve two functions of the button map. Strafe buttons
    /// may not share a button with the mechanism, which reads its buttons
    /// every cycle. They may share the D-pad with the side nudges.
    pub fn check(&self) -> Result<(), ButtonMapError> {
        self.buttons.check()?;

        if let StrafeInput::Buttons { left, right, .. } = self.strafe_input {
            if left == right {
                return Err(ButtonMapError::Duplicate(left, "strafe_left", "strafe_right"));
            }

            let strafe = [("strafe_left", left), ("strafe_right", right)];
            for &(name, button) in self.buttons.held().iter() {
                if let Some(&(strafe_name, _)) = strafe.iter().find(|&&(_, b)| b == button) {
                    return Err(ButtonMapError::Duplicate(button, name, strafe_name));
                }
            }
        }

        Ok(())
    }
}

impl ButtonMap {
    /// Check that no button is assigned to more than one function.
    pub fn check(&self) -> Result<(), ButtonMapError> {
        let assignments = self.assignments();

        for (i, &(name, button)) in assignments.iter().enumerate() {
            if let Some(&(other, _)) = assignments[..i].iter().find(|&&(_, b)| b == button) {
                return Err(ButtonMapError::Duplicate(button, other, name));
            }
        }

        Ok(())
    }

    /// The buttons held to select the mechanism state, by function.
    pub fn held(&self) -> [(&'static str, Button); 4] {
        [
            ("intake", self.intake),
            ("output_low", self.output_low),
            ("output_medium", self.output_medium),
            ("output_high", self.output_high),
        ]
    }

    /// Every assignment, by function.
    pub fn assignments(&self) -> [(&'static str, Button); 12] {
        let [intake, low, medium, high] = self.held();
        [
            intake,
            low,
            medium,
            high,
            ("colour_switch", self.colour_switch),
            ("braking_switch", self.braking_switch),
            ("descorer", self.descorer),
            ("match_loader", self.match_loader),
            ("nudge_forward", self.nudge_forward),
            ("nudge_back", self.nudge_back),
            ("nudge_left", self.nudge_left),
            ("nudge_right", self.nudge_right),
        ]
    }

    /// The buttons with a press action.
    pub fn pressed(&self) -> [Button; 8] {
        [
            self.colour_switch,
            self.braking_switch,
            self.descorer,
            self.match_loader,
            self.nudge_forward,
            self.nudge_back,
            self.nudge_left,
            self.nudge_right,
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_buttons_are_distinct() {
        assert_eq!(ModeMgrParams::default().check(), Ok(()));
    }

    #[test]
    fn test_duplicate_button_rejected() {
        let buttons = ButtonMap {
            descorer: Button::R1,
            ..ButtonMap::default()
        };

        assert_eq!(
            buttons.check(),
            Err(ButtonMapError::Duplicate(Button::R1, "intake", "descorer"))
        );
    }

    #[test]
    fn test_strafe_buttons_checked() {
        let strafe_on = |left, right| ModeMgrParams {
            strafe_input: StrafeInput::Buttons { left, right, speed_pct: 50.0 },
            ..ModeMgrParams::default()
        };

        assert_eq!(
            strafe_on(Button::L1, Button::R2).check(),
            Err(ButtonMapError::Duplicate(Button::L1, "output_high", "strafe_left"))
        );
        assert_eq!(
            strafe_on(Button::Up, Button::Up).check(),
            Err(ButtonMapError::Duplicate(Button::Up, "strafe_left", "strafe_right"))
        );
        assert_eq!(strafe_on(Button::Left, Button::Right).check(), Ok(()));
    }
}
