//! The shipped parameter files parse into the parameter structures and hold
//! the default values.

use eqpt_if::{Axis, BrakeMode, Button};
use robot_lib::{
    block_mnpl::{BlockMnplParams, MotorDemand},
    drivetrain::DrivetrainParams,
    mode_mgr::{ModeMgrParams, StrafeInput},
    params::RobotExecParams,
    robot_state::{AllianceColor, StartingSide},
};
use util::params::from_str;

#[test]
fn test_drivetrain_params() {
    let params: DrivetrainParams = from_str(include_str!("../../params/drivetrain.toml")).unwrap();
    let default = DrivetrainParams::default();

    assert_eq!(params.wheel_diameter_mm, default.wheel_diameter_mm);
    assert_eq!(params.poll_period_ms, 10);
    assert_eq!(params.blind_timeout_ms, 5000);
    assert_eq!(params.turn_timeout_ms, 5000);
    assert_eq!(params.turn_tolerance_deg, 1.0);
}

#[test]
fn test_block_mnpl_params() {
    let params: BlockMnplParams = from_str(include_str!("../../params/block_mnpl.toml")).unwrap();
    let default = BlockMnplParams::default();

    assert_eq!(params.red_hue, default.red_hue);
    assert_eq!(params.blue_hue, default.blue_hue);
    assert_eq!(params.debounce_ms, 1000);
    assert_eq!(params.output_low, default.output_low);
    assert_eq!(params.output_medium, default.output_medium);
    assert_eq!(params.output_high, default.output_high);

    assert_eq!(params.output_low.top, MotorDemand::Stop);
    assert!(!params.output_low.close_gate);
    assert!(params.output_high.close_gate);
}

#[test]
fn test_mode_mgr_params() {
    let params: ModeMgrParams = from_str(include_str!("../../params/mode_mgr.toml")).unwrap();
    let default = ModeMgrParams::default();

    assert_eq!(params.cycle_period_ms, 20);
    assert_eq!(params.deadzone, 5.0);
    assert_eq!(params.forward_axis, Axis::A2);
    assert_eq!(params.turn_axis, Axis::A4);
    assert_eq!(params.strafe_input, StrafeInput::Axis { axis: Axis::A1 });
    assert_eq!(params.buttons, default.buttons);
    assert_eq!(params.buttons.intake, Button::R1);
    assert_eq!(params.long_press_ms, 1000);
    assert_eq!(params.descorer_pulse_ms, 500);
    assert_eq!(params.check(), Ok(()));
}

#[test]
fn test_strafe_buttons_variant() {
    let params: StrafeInput =
        from_str("type = \"buttons\"\nleft = \"L1\"\nright = \"R1\"\nspeed_pct = 50.0\n").unwrap();

    assert_eq!(
        params,
        StrafeInput::Buttons { left: Button::L1, right: Button::R1, speed_pct: 50.0 }
    );
}

#[test]
fn test_robot_exec_params() {
    let params: RobotExecParams = from_str(include_str!("../../params/robot_exec.toml")).unwrap();

    assert_eq!(params.log_level, "info");
    assert_eq!(params.alliance_color.parse::<AllianceColor>(), Ok(AllianceColor::Red));
    assert_eq!(params.starting_side.parse::<StartingSide>(), Ok(StartingSide::Left));
    assert_eq!(params.braking_mode.parse::<BrakeMode>(), Ok(BrakeMode::Brake));
    assert!(params.max_sessions > 0);
}
