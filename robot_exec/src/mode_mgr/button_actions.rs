//! One-shot actions fired by controller button presses
//!
//! Each action runs on a thread owned by the controller, concurrently with
//! the driver control tick. The actions only touch the robot state, the
//! pneumatics, or the drivetrain through its blocking moves, which hold the
//! movement override so manual drive stands aside.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, error, info};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

// Internal
use super::ModeMgr;
use crate::drivetrain::{Drivetrain, DrivetrainError};
use crate::robot_state::{AllianceColor, RobotState};
use eqpt_if::{BrakeMode, Button, Clock, EqptError, InputSurface, Solenoid};
use util::time::elapsed_ms;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ModeMgr {
    /// Register every button action with the controller.
    ///
    /// Registration replaces any previous callback of each button, so it is
    /// safe to repeat on every entry to driver control.
    pub fn register_button_actions(&self) {
        let p = &self.params;
        let buttons = p.buttons;
        let controller = &self.eqpt.controller;

        // ---- COLOUR SWITCH ----

        {
            let robot_state = self.robot_state.clone();
            let clock = self.eqpt.clock.clone();
            // Weak, the controller owns its callbacks
            let input = Arc::downgrade(controller);
            let (long_press_ms, poll_ms) = (p.long_press_ms, p.long_press_poll_ms);

            controller.on_press(
                buttons.colour_switch,
                Box::new(move || {
                    if let Some(input) = input.upgrade() {
                        switch_alliance_colour(
                            &robot_state,
                            input.as_ref(),
                            buttons.colour_switch,
                            clock.as_ref(),
                            long_press_ms,
                            poll_ms,
                        );
                    }
                }),
            );
        }

        // ---- BRAKING SWITCH ----

        {
            let robot_state = self.robot_state.clone();
            let drivetrain = self.drivetrain.clone();

            controller.on_press(
                buttons.braking_switch,
                Box::new(move || {
                    if let Err(e) = switch_braking_mode(&robot_state, &drivetrain) {
                        error!("Could not apply braking mode: {}", e);
                    }
                }),
            );
        }

        // ---- NUDGES ----

        let nudges = [
            (buttons.nudge_forward, p.nudge_mm, 0.0),
            (buttons.nudge_back, -p.nudge_mm, 0.0),
            (buttons.nudge_left, 0.0, -p.nudge_mm),
            (buttons.nudge_right, 0.0, p.nudge_mm),
        ];

        for (button, forward_mm, right_mm) in nudges.iter().copied() {
            let robot_state = self.robot_state.clone();
            let drivetrain = self.drivetrain.clone();
            let speed_pct = p.nudge_speed_pct;

            controller.on_press(
                button,
                Box::new(move || {
                    if let Err(e) = nudge(&drivetrain, &robot_state, forward_mm, right_mm, speed_pct) {
                        error!("Nudge failed: {}", e);
                    }
                }),
            );
        }

        // ---- DESCORER ----

        {
            let descorer = self.eqpt.descorer.clone();
            let clock = self.eqpt.clock.clone();
            let pulse_ms = p.descorer_pulse_ms;

            controller.on_press(
                buttons.descorer,
                Box::new(move || {
                    if let Err(e) = pulse_descorer(descorer.clone(), clock.clone(), pulse_ms) {
                        error!("Could not start the descorer pulse: {}", e);
                    }
                }),
            );
        }

        // ---- MATCH LOADER ----

        {
            let match_loader = self.eqpt.match_loader.clone();

            controller.on_press(
                buttons.match_loader,
                Box::new(move || {
                    if let Err(e) = toggle_match_loader(match_loader.as_ref()) {
                        error!("Could not toggle the match loader: {}", e);
                    }
                }),
            );
        }

        debug!("Button actions registered");
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Switch the alliance colour after `button` was pressed.
///
/// Holding the button for `long_press_ms` sets the colour to `Unknown`,
/// disabling colour rejection, as soon as the threshold is reached. A shorter
/// press toggles between red and blue, or selects red from `Unknown`.
///
/// Returns the new colour.
pub fn switch_alliance_colour(
    robot_state: &RobotState,
    input: &dyn InputSurface,
    button: Button,
    clock: &dyn Clock,
    long_press_ms: u64,
    poll_ms: u64,
) -> AllianceColor {
    let start_ms = clock.now_ms();

    while input.pressing(button) {
        if elapsed_ms(start_ms, clock.now_ms()) >= long_press_ms {
            robot_state.set_alliance_color(AllianceColor::Unknown);
            info!("Alliance colour: UNKNOWN, colour rejection disabled");
            return AllianceColor::Unknown;
        }
        clock.sleep_ms(poll_ms);
    }

    let colour = match robot_state.alliance_color() {
        AllianceColor::Red => AllianceColor::Blue,
        AllianceColor::Blue | AllianceColor::Unknown => AllianceColor::Red,
    };
    robot_state.set_alliance_color(colour);
    info!("Alliance colour: {}", colour);

    colour
}

/// Toggle the braking mode between brake and coast, applying it to the
/// drivetrain straight away. Any other mode switches to brake.
pub fn switch_braking_mode(
    robot_state: &RobotState,
    drivetrain: &Drivetrain,
) -> Result<BrakeMode, DrivetrainError> {
    let mode = match robot_state.braking_mode() {
        BrakeMode::Brake => BrakeMode::Coast,
        _ => BrakeMode::Brake,
    };

    robot_state.set_braking_mode(mode);
    info!("Braking mode: {:?}", mode);

    drivetrain.set_stopping_mode(mode)?;
    Ok(mode)
}

/// Make a small blind move.
///
/// Ignored while another blocking move is in progress.
pub fn nudge(
    drivetrain: &Drivetrain,
    robot_state: &RobotState,
    forward_mm: f64,
    right_mm: f64,
    speed_pct: f64,
) -> Result<(), DrivetrainError> {
    match drivetrain.drive_for_blind(forward_mm, right_mm, speed_pct, robot_state.braking_mode()) {
        Err(DrivetrainError::MoveInProgress) => {
            debug!("Nudge ignored, a move is already in progress");
            Ok(())
        }
        result => result,
    }
}

/// Open the descorer for `pulse_ms` then close it, on a thread of its own.
pub fn pulse_descorer(
    descorer: Arc<dyn Solenoid>,
    clock: Arc<dyn Clock>,
    pulse_ms: u64,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("descorer".into())
        .spawn(move || {
            let pulse = descorer.open().map(|_| clock.sleep_ms(pulse_ms));

            // Always try to close, even if opening reported a fault
            let result = pulse.and(descorer.close());
            if let Err(e) = result {
                error!("Descorer fault: {}", e);
            }
        })
}

/// Open the match loader if it is closed, close it if it is open.
///
/// Returns true if the match loader is now open.
pub fn toggle_match_loader(match_loader: &dyn Solenoid) -> Result<bool, EqptError> {
    let open = !match_loader.value();

    match open {
        true => match_loader.open()?,
        false => match_loader.close()?,
    }
    debug!("Match loader {}", if open { "opened" } else { "closed" });

    Ok(open)
}
