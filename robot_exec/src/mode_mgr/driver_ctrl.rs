//! Driver control loop and its supervisor

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, error, info, warn};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

// Internal
use super::{Mode, ModeError, ModeMgr, StrafeInput};
use crate::block_mnpl::{BlockMnplState, StatusReport};
use crate::drivetrain::DrvCmd;
use eqpt_if::Axis;
use util::{critical, maths::apply_deadzone, time::elapsed_ms};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ModeMgr {
    /// Entry point of driver control. Never returns.
    pub fn driver_ctrl_entry(&mut self) -> ! {
        loop {
            // Without limits supervision only ends if the loop itself does
            if let Err(e) = self.supervise(None, None) {
                critical!("Driver control supervision ended: {}", e);
            }
        }
    }

    /// Run driver control, restarting it from the top after every fault.
    ///
    /// A fault is an error or a panic escaping the loop. Each fault is logged
    /// as critical. Each restart waits one cycle period, then re-applies the
    /// braking mode and re-registers the button actions.
    ///
    /// # Inputs
    /// - `restart_limit`: maximum number of restarts, `None` for no limit
    /// - `cycle_limit`: cycles after which a run of the loop returns, `None`
    ///   for no limit
    ///
    /// # Outputs
    /// - `Ok(())` once a run completes `cycle_limit` cycles.
    /// - The last fault once `restart_limit` restarts have been used.
    pub fn supervise(
        &mut self,
        restart_limit: Option<u32>,
        cycle_limit: Option<u64>,
    ) -> Result<(), ModeError> {
        loop {
            let run = panic::catch_unwind(AssertUnwindSafe(|| self.run_driver_ctrl(cycle_limit)));

            let fault = match run {
                Ok(Ok(())) => return Ok(()),
                Ok(Err(e)) => e,
                Err(payload) => ModeError::Panic(panic_message(payload.as_ref())),
            };

            critical!("Fault in driver control: {}", fault);

            if restart_limit.map_or(false, |limit| self.restarts >= limit) {
                error!("Driver control restart limit of {} reached", self.restarts);
                return Err(fault);
            }

            // Repeating faults must not restart faster than the loop runs
            self.eqpt.clock.sleep_ms(self.params.cycle_period_ms);

            self.restarts += 1;
            info!("Restarting driver control (restart {})", self.restarts);
        }
    }

    /// Enter driver control and run the loop, returning after `cycle_limit`
    /// cycles if given.
    pub fn run_driver_ctrl(&mut self, cycle_limit: Option<u64>) -> Result<(), ModeError> {
        self.mode = Mode::DriverControl;
        info!("Entering driver control");

        // A faulty wheel only degrades motion, the mechanism must still run
        if let Err(e) = self.drivetrain.set_stopping_mode(self.robot_state.braking_mode()) {
            error!("Could not apply the braking mode on entry: {}", e);
        }
        self.register_button_actions();

        let clock = self.eqpt.clock.clone();
        let period_ms = self.params.cycle_period_ms;
        let mut num_cycles: u64 = 0;

        while cycle_limit.map_or(true, |limit| num_cycles < limit) {
            let cycle_start_ms = clock.now_ms();

            self.driver_ctrl_tick()?;

            // ---- CYCLE MANAGEMENT ----

            let cycle_ms = elapsed_ms(cycle_start_ms, clock.now_ms());

            match period_ms.checked_sub(cycle_ms) {
                Some(d) => clock.sleep_ms(d),
                None => warn!("Cycle overran by {} ms", cycle_ms - period_ms),
            }

            num_cycles += 1;
        }

        debug!("Driver control ended after {} cycles", num_cycles);

        Ok(())
    }

    /// One driver control cycle: manual drive then block manipulation.
    ///
    /// Manual drive is skipped while a blocking move owns the wheels. A fault
    /// commanding the wheels is logged and the cycle continues.
    pub fn driver_ctrl_tick(&mut self) -> Result<StatusReport, ModeError> {
        if !self.drivetrain.movement_override() {
            let cmd = self.manual_drv_cmd();

            if let Err(e) = self.drivetrain.drive(cmd.forward, cmd.strafe, cmd.turn) {
                error!("Manual drive failed: {}", e);
            }
        }

        let controller = &self.eqpt.controller;
        let buttons = &self.params.buttons;
        let state = BlockMnplState::from_buttons(
            controller.pressing(buttons.intake),
            controller.pressing(buttons.output_low),
            controller.pressing(buttons.output_medium),
            controller.pressing(buttons.output_high),
        );

        self.block_mnpl.set_state(state);
        Ok(self.block_mnpl.update()?)
    }

    /// Read the manual drive command from the controller.
    pub fn manual_drv_cmd(&self) -> DrvCmd {
        let controller = &self.eqpt.controller;
        let p = &self.params;
        let stick = |axis: Axis| apply_deadzone(controller.axis_position(axis), p.deadzone);

        let strafe = match p.strafe_input {
            StrafeInput::Axis { axis } => stick(axis),
            StrafeInput::Buttons { left, right, speed_pct } => {
                match (controller.pressing(left), controller.pressing(right)) {
                    (false, true) => speed_pct,
                    (true, false) => -speed_pct,
                    _ => 0.0,
                }
            }
        };

        DrvCmd::new(stick(p.forward_axis), strafe, stick(p.turn_axis))
            .scaled(p.forward_modifier, p.strafe_modifier, p.turn_modifier)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("unknown panic")
    }
}
