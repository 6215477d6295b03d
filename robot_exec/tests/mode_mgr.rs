//! Mode manager behaviour on simulated equipment

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use eqpt_if::{
    Axis, BrakeMode, Button, Clock, Direction, HeadingSensor, InputSurface, PressCallback,
    Solenoid, SystemClock,
};
use robot_lib::{
    block_mnpl::{BlockMnplParams, BlockMnplState},
    drivetrain::{mm_to_wheel_deg, DrivetrainParams},
    mode_mgr::{
        nudge, pulse_descorer, switch_alliance_colour, Mode, ModeError, ModeMgr, ModeMgrParams,
        StrafeInput,
    },
    robot_state::{AllianceColor, RobotState, StartingSide},
    sim::{MotorCall, SimClock, SimRobot, CALL_LOG_CAPACITY},
};

const BLUE_HUE: f64 = 200.0;

// ---------------------------------------------------------------------------
// FIXTURES
// ---------------------------------------------------------------------------

struct Fixture {
    sim: SimRobot,
    clock: Arc<SimClock>,
    mode_mgr: ModeMgr,
}

fn setup_with(params: ModeMgrParams) -> Fixture {
    let clock = Arc::new(SimClock::new());
    let sim = SimRobot::with_clock(clock.clone());

    let robot_state = Arc::new(RobotState::new(
        AllianceColor::Red,
        BrakeMode::Brake,
        StartingSide::Left,
    ));

    let mode_mgr = ModeMgr::new(
        sim.eqpt(),
        robot_state,
        DrivetrainParams::default(),
        BlockMnplParams::default(),
        params,
    )
    .unwrap();

    Fixture { sim, clock, mode_mgr }
}

fn setup() -> Fixture {
    setup_with(ModeMgrParams::default())
}

/// A controller whose sticks cannot be read.
struct PanickingController;

impl InputSurface for PanickingController {
    fn axis_position(&self, _: Axis) -> f64 {
        panic!("controller unplugged")
    }
    fn pressing(&self, _: Button) -> bool {
        false
    }
    fn on_press(&self, _: Button, _: PressCallback) {}
}

#[test]
fn test_duplicate_buttons_rejected_on_build() {
    let sim = SimRobot::new();
    let mut params = ModeMgrParams::default();
    params.buttons.match_loader = params.buttons.output_low;

    let result = ModeMgr::new(
        sim.eqpt(),
        Arc::new(RobotState::default()),
        DrivetrainParams::default(),
        BlockMnplParams::default(),
        params,
    );

    assert!(matches!(result, Err(ModeError::Buttons(_))));
}

// ---------------------------------------------------------------------------
// DRIVER CONTROL
// ---------------------------------------------------------------------------

#[test]
fn test_tick_applies_deadzone_and_modifiers() {
    let mut f = setup_with(ModeMgrParams {
        forward_modifier: 0.5,
        turn_modifier: 0.5,
        strafe_modifier: 2.0,
        ..ModeMgrParams::default()
    });

    f.sim.controller.set_axis(Axis::A2, 4.0);
    f.sim.controller.set_axis(Axis::A4, 50.0);
    f.sim.controller.set_axis(Axis::A1, -20.0);

    f.mode_mgr.driver_ctrl_tick().unwrap();

    assert_eq!(f.sim.left_drv.signed_speed(), 25.0);
    assert_eq!(f.sim.right_drv.signed_speed(), -25.0);
    assert_eq!(f.sim.strafe_drv.signed_speed(), -40.0);
}

#[test]
fn test_tick_strafe_from_buttons() {
    let mut f = setup_with(ModeMgrParams {
        strafe_input: StrafeInput::Buttons {
            left: Button::Left,
            right: Button::Right,
            speed_pct: 60.0,
        },
        ..ModeMgrParams::default()
    });

    f.sim.controller.hold(Button::Right);
    f.mode_mgr.driver_ctrl_tick().unwrap();
    assert_eq!(f.sim.strafe_drv.signed_speed(), 60.0);

    f.sim.controller.hold(Button::Left);
    f.mode_mgr.driver_ctrl_tick().unwrap();
    assert_eq!(f.sim.strafe_drv.signed_speed(), 0.0);

    f.sim.controller.release(Button::Right);
    f.mode_mgr.driver_ctrl_tick().unwrap();
    assert_eq!(f.sim.strafe_drv.signed_speed(), -60.0);
}

#[test]
fn test_tick_button_precedence() {
    let mut f = setup();
    let buttons = f.mode_mgr.params().buttons;

    f.sim.controller.hold(buttons.output_low);
    f.sim.controller.hold(buttons.intake);
    let report = f.mode_mgr.driver_ctrl_tick().unwrap();
    assert_eq!(report.state, BlockMnplState::Intaking);

    f.sim.controller.release(buttons.intake);
    assert_eq!(
        f.mode_mgr.driver_ctrl_tick().unwrap().state,
        BlockMnplState::OutputtingLow
    );

    f.sim.controller.release_all();
    assert_eq!(f.mode_mgr.driver_ctrl_tick().unwrap().state, BlockMnplState::Idle);
}

#[test]
fn test_tick_survives_drive_fault() {
    let mut f = setup();
    f.sim.left_drv.disconnect();
    f.sim.controller.set_axis(Axis::A2, 80.0);

    assert!(f.mode_mgr.driver_ctrl_tick().is_ok());
    assert_eq!(f.sim.right_drv.signed_speed(), 80.0);
}

#[test]
fn test_tick_rejects_wrong_colour() {
    let mut f = setup();
    let intake = f.mode_mgr.params().buttons.intake;

    f.sim.controller.hold(intake);
    f.sim.optical[0].set_reading(BLUE_HUE, true);

    assert!(f.mode_mgr.driver_ctrl_tick().unwrap().reject_current_block);

    f.mode_mgr.robot_state().set_alliance_color(AllianceColor::Unknown);
    assert!(!f.mode_mgr.driver_ctrl_tick().unwrap().reject_current_block);
}

#[test]
fn test_tick_skips_drive_during_blocking_move() {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let sim = SimRobot::with_clock(clock);
    let mut mode_mgr = ModeMgr::new(
        sim.eqpt(),
        Arc::new(RobotState::default()),
        DrivetrainParams { blind_timeout_ms: 2000, ..DrivetrainParams::default() },
        BlockMnplParams::default(),
        ModeMgrParams::default(),
    )
    .unwrap();

    sim.left_drv.set_hold_spinning(true);
    sim.controller.set_axis(Axis::A2, 100.0);

    let mover = {
        let drivetrain = mode_mgr.drivetrain().clone();
        thread::spawn(move || drivetrain.drive_for_blind(200.0, 0.0, 50.0, BrakeMode::Brake))
    };

    let start = Instant::now();
    while !sim
        .drv_motors()
        .iter()
        .all(|m| matches!(m.last_call(), Some(MotorCall::SpinFor(..))))
    {
        assert!(start.elapsed() < Duration::from_secs(1), "blind move never started");
        thread::sleep(Duration::from_millis(1));
    }

    sim.clear_drv_calls();
    mode_mgr.driver_ctrl_tick().unwrap();
    assert_eq!(sim.num_drv_calls(), 0);

    sim.left_drv.set_hold_spinning(false);
    mover.join().unwrap().unwrap();

    sim.clear_drv_calls();
    mode_mgr.driver_ctrl_tick().unwrap();
    assert_eq!(sim.num_drv_calls(), 3);
}

#[test]
fn test_driver_ctrl_runs_fixed_period() {
    let mut f = setup();

    f.mode_mgr.supervise(Some(0), Some(5)).unwrap();

    assert_eq!(f.mode_mgr.mode(), Mode::DriverControl);
    assert_eq!(f.mode_mgr.restarts(), 0);
    assert_eq!(f.clock.now_ms(), 5 * f.mode_mgr.params().cycle_period_ms);

    // Entry applies the braking mode
    assert!(f.sim.left_drv.calls().contains(&MotorCall::SetStopping(BrakeMode::Brake)));
}

#[test]
fn test_long_run_keeps_bounded_call_log() {
    let mut f = setup();
    let num_cycles = 2 * CALL_LOG_CAPACITY as u64;

    f.mode_mgr.supervise(Some(0), Some(num_cycles)).unwrap();

    assert_eq!(f.clock.now_ms(), num_cycles * f.mode_mgr.params().cycle_period_ms);
    for m in f.sim.drv_motors().iter() {
        assert_eq!(m.num_calls(), CALL_LOG_CAPACITY);
    }
}

#[test]
fn test_supervisor_restarts_after_fault() {
    let mut f = setup();
    f.sim.bottom_intake.disconnect();

    let result = f.mode_mgr.supervise(Some(2), Some(100));

    assert!(matches!(result, Err(ModeError::BlockMnpl(_))));
    assert_eq!(f.mode_mgr.restarts(), 2);

    // Every run failed on its first tick, only the restarts took time
    assert_eq!(f.clock.now_ms(), 2 * f.mode_mgr.params().cycle_period_ms);

    // Each of the three runs registered the actions, replacing the previous
    let num_actions = f.mode_mgr.params().buttons.pressed().len();
    assert_eq!(f.sim.controller.num_callbacks(), num_actions);
    assert_eq!(f.sim.controller.num_registrations(), 3 * num_actions);
}

#[test]
fn test_drive_fault_on_entry_keeps_mechanism_running() {
    let mut f = setup();
    f.sim.left_drv.disconnect();
    f.sim.controller.hold(f.mode_mgr.params().buttons.intake);

    f.mode_mgr.supervise(Some(0), Some(3)).unwrap();

    assert_eq!(f.mode_mgr.restarts(), 0);
    assert_eq!(f.clock.now_ms(), 3 * f.mode_mgr.params().cycle_period_ms);
    assert!(f
        .sim
        .bottom_intake
        .calls()
        .iter()
        .any(|c| matches!(c, MotorCall::Spin(Direction::Forward, _))));

    // The healthy wheels are still driven every cycle
    assert!(f.sim.right_drv.num_calls() > 3);
}

#[test]
fn test_supervisor_recovers_once_fault_clears() {
    let mut f = setup();
    f.sim.bottom_intake.disconnect();

    assert!(f.mode_mgr.supervise(Some(0), Some(10)).is_err());

    f.sim.bottom_intake.set_fault(None);
    f.mode_mgr.supervise(Some(0), Some(10)).unwrap();
}

#[test]
fn test_supervisor_catches_panics() {
    let clock = Arc::new(SimClock::new());
    let sim = SimRobot::with_clock(clock);
    let mut eqpt = sim.eqpt();
    eqpt.controller = Arc::new(PanickingController);

    let mut mode_mgr = ModeMgr::new(
        eqpt,
        Arc::new(RobotState::default()),
        DrivetrainParams::default(),
        BlockMnplParams::default(),
        ModeMgrParams::default(),
    )
    .unwrap();

    match mode_mgr.supervise(Some(1), Some(10)) {
        Err(ModeError::Panic(msg)) => assert_eq!(msg, "controller unplugged"),
        other => panic!("expected a panic fault, got {:?}", other),
    }
    assert_eq!(mode_mgr.restarts(), 1);
}

// ---------------------------------------------------------------------------
// AUTONOMOUS
// ---------------------------------------------------------------------------

#[test]
fn test_auton_runs_script_without_rejection() {
    let mut f = setup();
    f.mode_mgr.robot_state().set_alliance_color(AllianceColor::Blue);
    f.sim.optical[0].set_reading(5.0, true);

    f.mode_mgr.auton_entry();

    assert_eq!(f.mode_mgr.mode(), Mode::Autonomous);
    assert_eq!(f.mode_mgr.robot_state().alliance_color(), AllianceColor::Blue);

    // A red block was in view while intaking but never rejected
    assert!(!f
        .sim
        .top_intake
        .calls()
        .contains(&MotorCall::Spin(Direction::Reverse, 100.0)));
    assert!(!f.sim.optical[0].light_on());

    // Turned right from the left side and finished idle
    assert!((f.sim.inertial.heading() - 90.0).abs() < 1.0);
    assert_eq!(f.mode_mgr.block_mnpl().state(), BlockMnplState::Idle);
    assert_eq!(f.sim.mnpl_speeds(), (0.0, 0.0, 0.0));
}

#[test]
fn test_auton_fault_ends_early_and_restores_alliance() {
    let mut f = setup();
    f.sim.strafe_drv.disconnect();

    f.mode_mgr.auton_entry();

    assert_eq!(f.mode_mgr.robot_state().alliance_color(), AllianceColor::Red);
    assert_eq!(f.sim.bottom_intake.num_calls(), 0);
    assert!(!f.mode_mgr.drivetrain().movement_override());
}

// ---------------------------------------------------------------------------
// BUTTON ACTIONS
// ---------------------------------------------------------------------------

#[test]
fn test_colour_switch_short_press_toggles() {
    let robot_state = RobotState::default();
    let clock = SimClock::new();
    let sim = SimRobot::new();

    robot_state.set_alliance_color(AllianceColor::Red);
    let switch = || {
        switch_alliance_colour(&robot_state, sim.controller.as_ref(), Button::X, &clock, 1000, 10)
    };

    assert_eq!(switch(), AllianceColor::Blue);
    assert_eq!(switch(), AllianceColor::Red);

    robot_state.set_alliance_color(AllianceColor::Unknown);
    assert_eq!(switch(), AllianceColor::Red);
    assert_eq!(robot_state.alliance_color(), AllianceColor::Red);
}

#[test]
fn test_colour_switch_long_press_disables() {
    let robot_state = RobotState::default();
    robot_state.set_alliance_color(AllianceColor::Blue);
    let clock = SimClock::new();
    let sim = SimRobot::new();

    sim.controller.hold(Button::X);
    let colour =
        switch_alliance_colour(&robot_state, sim.controller.as_ref(), Button::X, &clock, 1000, 10);

    assert_eq!(colour, AllianceColor::Unknown);
    assert_eq!(robot_state.alliance_color(), AllianceColor::Unknown);
    // Exits as soon as the threshold is crossed
    assert_eq!(clock.now_ms(), 1000);
}

#[test]
fn test_registered_actions_fire_on_press() {
    let f = setup();
    let buttons = f.mode_mgr.params().buttons;
    f.mode_mgr.register_button_actions();

    for button in buttons.pressed().iter() {
        assert!(f.sim.controller.is_registered(*button), "{:?}", button);
    }

    // Held colour switch, on the virtual clock the hold passes the threshold
    f.sim.controller.press(buttons.colour_switch).unwrap().join().unwrap();
    assert_eq!(f.mode_mgr.robot_state().alliance_color(), AllianceColor::Unknown);
    f.sim.controller.release_all();

    f.sim.controller.press(buttons.braking_switch).unwrap().join().unwrap();
    assert_eq!(f.mode_mgr.robot_state().braking_mode(), BrakeMode::Coast);
    assert_eq!(f.sim.left_drv.last_call(), Some(MotorCall::SetStopping(BrakeMode::Coast)));

    f.sim.controller.press(buttons.braking_switch).unwrap().join().unwrap();
    assert_eq!(f.mode_mgr.robot_state().braking_mode(), BrakeMode::Brake);

    f.sim.controller.press(buttons.match_loader).unwrap().join().unwrap();
    f.sim.controller.press(buttons.match_loader).unwrap().join().unwrap();
    assert_eq!(f.sim.match_loader.history(), vec![true, false]);
}

#[test]
fn test_nudges() {
    let f = setup();
    let buttons = f.mode_mgr.params().buttons;
    let nudge_deg = mm_to_wheel_deg(
        f.mode_mgr.params().nudge_mm,
        f.mode_mgr.drivetrain().params().wheel_diameter_mm,
    );
    f.mode_mgr.register_button_actions();

    f.sim.controller.press(buttons.nudge_back).unwrap().join().unwrap();
    assert!(f.sim.left_drv.calls().contains(&MotorCall::SpinFor(Direction::Forward, -nudge_deg)));
    assert!(f.sim.strafe_drv.calls().contains(&MotorCall::SpinFor(Direction::Forward, 0.0)));

    f.sim.clear_drv_calls();
    f.sim.controller.press(buttons.nudge_right).unwrap().join().unwrap();
    assert!(f.sim.strafe_drv.calls().contains(&MotorCall::SpinFor(Direction::Forward, nudge_deg)));
    assert!(f.sim.left_drv.calls().contains(&MotorCall::SpinFor(Direction::Forward, 0.0)));
    assert!(!f.mode_mgr.drivetrain().movement_override());
}

#[test]
fn test_overlapping_nudges_make_one_move() {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let sim = SimRobot::with_clock(clock);
    let mode_mgr = ModeMgr::new(
        sim.eqpt(),
        Arc::new(RobotState::default()),
        DrivetrainParams { blind_timeout_ms: 2000, ..DrivetrainParams::default() },
        BlockMnplParams::default(),
        ModeMgrParams::default(),
    )
    .unwrap();

    sim.left_drv.set_hold_spinning(true);

    // Several D-pad buttons pressed at the same instant
    const NUM_NUDGES: usize = 4;
    let barrier = Arc::new(Barrier::new(NUM_NUDGES));
    let finished = Arc::new(AtomicUsize::new(0));

    let nudgers: Vec<_> = (0..NUM_NUDGES)
        .map(|_| {
            let drivetrain = mode_mgr.drivetrain().clone();
            let robot_state = mode_mgr.robot_state().clone();
            let barrier = barrier.clone();
            let finished = finished.clone();
            thread::spawn(move || {
                barrier.wait();
                let result = nudge(&drivetrain, &robot_state, 50.0, 0.0, 30.0);
                finished.fetch_add(1, Ordering::SeqCst);
                result
            })
        })
        .collect();

    // Every nudge but the one owning the wheels gives up straight away
    let start = Instant::now();
    while finished.load(Ordering::SeqCst) < NUM_NUDGES - 1 {
        assert!(start.elapsed() < Duration::from_secs(1), "refused nudges never returned");
        thread::sleep(Duration::from_millis(1));
    }

    let num_moves = sim
        .left_drv
        .calls()
        .iter()
        .filter(|c| matches!(c, MotorCall::SpinFor(..)))
        .count();
    assert_eq!(num_moves, 1);
    assert!(mode_mgr.drivetrain().movement_override());

    sim.left_drv.set_hold_spinning(false);
    for n in nudgers {
        n.join().unwrap().unwrap();
    }
    assert!(!mode_mgr.drivetrain().movement_override());
}

#[test]
fn test_descorer_pulse() {
    let sim = SimRobot::new();
    let clock = Arc::new(SimClock::new());

    pulse_descorer(sim.descorer.clone(), clock.clone(), 500)
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(sim.descorer.history(), vec![true, false]);
    assert!(!sim.descorer.value());
    assert_eq!(clock.now_ms(), 500);
}

#[test]
fn test_descorer_press_does_not_block() {
    let f = setup();
    f.mode_mgr.register_button_actions();

    f.sim
        .controller
        .press(f.mode_mgr.params().buttons.descorer)
        .unwrap()
        .join()
        .unwrap();

    // The pulse finishes on its own thread
    let start = Instant::now();
    while f.sim.descorer.history().len() < 2 {
        assert!(start.elapsed() < Duration::from_secs(1), "descorer never closed");
        thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(f.sim.descorer.history(), vec![true, false]);
}
