//! Implementations for the BlockMnpl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use std::sync::Arc;

// Internal
use super::{
    classify_hue, BlockMnplError, BlockMnplParams, BlockMnplState,
    IntakeRejectionTracker, MotorDemand, OutputProfile, SensorReading,
};
use crate::eqpt::RobotEqpt;
use crate::robot_state::{AllianceColor, RobotState};
use eqpt_if::{
    Actuator, BrakeMode, Clock, Direction, OpticalSensor, Solenoid, VelocityUnits,
};
use util::module::State;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of intake colour sensors.
pub const NUM_OPTICAL_SENSORS: usize = 2;

/// Readings used when the sensors were not read: nothing in front of them.
const NO_READINGS: [SensorReading; NUM_OPTICAL_SENSORS] = [SensorReading {
    colour: AllianceColor::Unknown,
    near: false,
}; NUM_OPTICAL_SENSORS];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Block manipulation module state
pub struct BlockMnpl {
    pub(crate) params: BlockMnplParams,

    bottom: Arc<dyn Actuator>,
    top: Arc<dyn Actuator>,
    unloader: Arc<dyn Actuator>,
    optical: [Arc<dyn OpticalSensor>; NUM_OPTICAL_SENSORS],
    gate: Arc<dyn Solenoid>,
    clock: Arc<dyn Clock>,

    robot_state: Arc<RobotState>,

    state: BlockMnplState,
    tracker: IntakeRejectionTracker,
}

/// Input data to block manipulation processing.
#[derive(Debug, Clone, Copy)]
pub struct InputData {
    /// The state whose behaviour is performed this tick
    pub state: BlockMnplState,

    pub alliance: AllianceColor,

    /// Colour sensor readings, `None` if the sensors were not read this tick.
    pub readings: Option<[SensorReading; NUM_OPTICAL_SENSORS]>,

    /// Units: milliseconds
    pub now_ms: u64,
}

/// Demands on the manipulation equipment for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MnplDemands {
    pub bottom: MotorDemand,
    pub top: MotorDemand,
    pub unloader: MotorDemand,

    /// `Some(true)` to open the intake gate, `Some(false)` to close it,
    /// `None` to leave it where it is.
    pub gate: Option<bool>,

    /// Turn the colour sensor lights off
    pub lights_off: bool,
}

/// Status report for block manipulation processing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusReport {
    pub state: BlockMnplState,
    pub reject_current_block: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BlockMnpl {
    /// Create the module on the robot's equipment with default parameters.
    ///
    /// `init` must be called to apply the parameters to the colour sensors.
    pub fn new(eqpt: &RobotEqpt, robot_state: Arc<RobotState>) -> Self {
        Self {
            params: BlockMnplParams::default(),
            bottom: eqpt.bottom_intake.clone(),
            top: eqpt.top_intake.clone(),
            unloader: eqpt.unloader.clone(),
            optical: eqpt.optical.clone(),
            gate: eqpt.intake_gate.clone(),
            clock: eqpt.clock.clone(),
            robot_state,
            state: BlockMnplState::Idle,
            tracker: IntakeRejectionTracker::default(),
        }
    }

    pub fn params(&self) -> &BlockMnplParams {
        &self.params
    }

    pub fn state(&self) -> BlockMnplState {
        self.state
    }

    /// Set the state whose behaviour is performed by the next `update`.
    pub fn set_state(&mut self, state: BlockMnplState) {
        if state != self.state {
            debug!("Block manipulation state {:?} -> {:?}", self.state, state);
        }
        self.state = state;
    }

    pub fn tracker(&self) -> &IntakeRejectionTracker {
        &self.tracker
    }

    /// Perform the behaviour of the current state on the equipment.
    pub fn update(&mut self) -> Result<StatusReport, BlockMnplError> {
        let alliance = self.robot_state.alliance_color();

        // The sensors are only needed to judge blocks while intaking
        let readings = match self.state == BlockMnplState::Intaking
            && alliance != AllianceColor::Unknown
        {
            true => Some(self.read_sensors()?),
            false => None,
        };

        let input = InputData {
            state: self.state,
            alliance,
            readings,
            now_ms: self.clock.now_ms(),
        };

        let (demands, report) = self.proc(&input)?;
        self.actuate(&demands)?;

        Ok(report)
    }

    /// Light both colour sensors and classify what they see.
    fn read_sensors(&self) -> Result<[SensorReading; NUM_OPTICAL_SENSORS], BlockMnplError> {
        for sensor in self.optical.iter() {
            sensor.set_light(true)?;
        }

        let read = |sensor: &Arc<dyn OpticalSensor>| SensorReading {
            colour: classify_hue(sensor.hue(), &self.params),
            near: sensor.is_near_object(),
        };

        Ok([read(&self.optical[0]), read(&self.optical[1])])
    }

    fn actuate(&self, demands: &MnplDemands) -> Result<(), BlockMnplError> {
        let speed = self.params.motor_speed_pct;

        for (motor, demand) in [
            (&self.bottom, demands.bottom),
            (&self.top, demands.top),
            (&self.unloader, demands.unloader),
        ]
        .iter()
        {
            match demand {
                MotorDemand::Forward => motor.spin(Direction::Forward, speed, VelocityUnits::Percent)?,
                MotorDemand::Reverse => motor.spin(Direction::Reverse, speed, VelocityUnits::Percent)?,
                MotorDemand::Stop => motor.stop(BrakeMode::Brake)?,
            }
        }

        match demands.gate {
            Some(true) => self.gate.open()?,
            Some(false) => self.gate.close()?,
            None => (),
        }

        if demands.lights_off {
            for sensor in self.optical.iter() {
                sensor.set_light(false)?;
            }
        }

        Ok(())
    }
}

impl State for BlockMnpl {
    type InitData = BlockMnplParams;
    type InitError = BlockMnplError;

    type InputData = InputData;
    type OutputData = MnplDemands;
    type StatusReport = StatusReport;
    type ProcError = BlockMnplError;

    /// Initialise the module with its parameters, configuring the colour
    /// sensors.
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        self.params = init_data;

        for sensor in self.optical.iter() {
            sensor.set_light_power(self.params.light_power_pct)?;
            sensor.set_object_detect_threshold(self.params.object_detect_threshold_mm)?;
        }

        Ok(())
    }

    /// Compute the equipment demands of the input state.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let demands = match input_data.state {
            BlockMnplState::Idle => MnplDemands {
                bottom: MotorDemand::Stop,
                top: MotorDemand::Stop,
                unloader: MotorDemand::Stop,
                gate: None,
                lights_off: true,
            },
            BlockMnplState::Intaking => {
                let readings = input_data.readings.unwrap_or(NO_READINGS);
                let reject = self.tracker.check(
                    input_data.alliance,
                    &readings,
                    input_data.now_ms,
                    self.params.debounce_ms,
                );

                MnplDemands {
                    bottom: MotorDemand::Forward,
                    top: match reject {
                        true => MotorDemand::Reverse,
                        false => MotorDemand::Forward,
                    },
                    unloader: MotorDemand::Stop,
                    gate: Some(true),
                    lights_off: false,
                }
            }
            BlockMnplState::OutputtingLow => output_demands(&self.params.output_low),
            BlockMnplState::OutputtingMedium => output_demands(&self.params.output_medium),
            BlockMnplState::OutputtingHigh => output_demands(&self.params.output_high),
        };

        let report = StatusReport {
            state: input_data.state,
            reject_current_block: self.tracker.reject_current_block(),
        };

        trace!("BlockMnpl demands: {:?}", demands);

        Ok((demands, report))
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn output_demands(profile: &OutputProfile) -> MnplDemands {
    MnplDemands {
        bottom: profile.bottom,
        top: profile.top,
        unloader: profile.unloader,
        gate: match profile.close_gate {
            true => Some(false),
            false => None,
        },
        lights_off: false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::{MotorCall, SimRobot};

    const BLUE_HUE: f64 = 200.0;
    const RED_HUE: f64 = 5.0;

    fn setup(alliance: AllianceColor) -> (SimRobot, BlockMnpl) {
        let sim = SimRobot::new();
        let robot_state = Arc::new(RobotState::default());
        robot_state.set_alliance_color(alliance);

        let mut mnpl = BlockMnpl::new(&sim.eqpt(), robot_state);
        mnpl.init(BlockMnplParams::default()).unwrap();

        (sim, mnpl)
    }

    #[test]
    fn test_init_configures_sensors() {
        let (sim, _) = setup(AllianceColor::Red);

        for sensor in sim.optical.iter() {
            assert_eq!(sensor.light_power(), 100.0);
            assert_eq!(sensor.detect_threshold(), 100.0);
        }
    }

    #[test]
    fn test_idle_brakes_and_lights_off() {
        let (sim, mut mnpl) = setup(AllianceColor::Red);

        mnpl.set_state(BlockMnplState::Intaking);
        mnpl.update().unwrap();
        assert!(sim.optical[0].light_on());

        mnpl.set_state(BlockMnplState::Idle);
        let report = mnpl.update().unwrap();

        assert_eq!(report.state, BlockMnplState::Idle);
        for motor in [&sim.bottom_intake, &sim.top_intake, &sim.unloader].iter() {
            assert_eq!(motor.last_call(), Some(MotorCall::Stop(BrakeMode::Brake)));
        }
        assert!(!sim.optical[0].light_on());
        assert!(!sim.optical[1].light_on());
    }

    #[test]
    fn test_intaking_accepts_own_colour() {
        let (sim, mut mnpl) = setup(AllianceColor::Red);
        sim.optical[0].set_reading(RED_HUE, true);

        mnpl.set_state(BlockMnplState::Intaking);
        let report = mnpl.update().unwrap();

        assert!(!report.reject_current_block);
        assert_eq!(sim.mnpl_speeds(), (100.0, 100.0, 0.0));
        assert_eq!(sim.intake_gate.history(), vec![true]);
        assert!(sim.optical[0].light_on() && sim.optical[1].light_on());
    }

    #[test]
    fn test_intaking_rejects_other_colour_with_top_stage() {
        let (sim, mut mnpl) = setup(AllianceColor::Red);
        sim.optical[1].set_reading(BLUE_HUE, true);

        mnpl.set_state(BlockMnplState::Intaking);
        let report = mnpl.update().unwrap();

        assert!(report.reject_current_block);
        assert_eq!(sim.mnpl_speeds(), (100.0, -100.0, 0.0));
    }

    #[test]
    fn test_unknown_alliance_skips_sensing() {
        let (sim, mut mnpl) = setup(AllianceColor::Unknown);
        sim.optical[0].set_reading(BLUE_HUE, true);

        mnpl.set_state(BlockMnplState::Intaking);
        let report = mnpl.update().unwrap();

        assert!(!report.reject_current_block);
        assert!(!sim.optical[0].light_on());
        assert_eq!(sim.mnpl_speeds(), (100.0, 100.0, 0.0));
    }

    #[test]
    fn test_output_tables() {
        let (sim, mut mnpl) = setup(AllianceColor::Blue);

        mnpl.set_state(BlockMnplState::OutputtingLow);
        mnpl.update().unwrap();
        assert_eq!(sim.mnpl_speeds(), (-100.0, 0.0, -100.0));
        assert_eq!(sim.top_intake.last_call(), Some(MotorCall::Stop(BrakeMode::Brake)));

        mnpl.set_state(BlockMnplState::OutputtingMedium);
        mnpl.update().unwrap();
        assert_eq!(sim.mnpl_speeds(), (100.0, -100.0, -100.0));
        assert!(sim.intake_gate.history().is_empty());

        mnpl.set_state(BlockMnplState::OutputtingHigh);
        let report = mnpl.update().unwrap();
        assert_eq!(report.state, BlockMnplState::OutputtingHigh);
        assert_eq!(sim.mnpl_speeds(), (100.0, 100.0, -100.0));
        assert_eq!(sim.intake_gate.history(), vec![false]);
    }

    #[test]
    fn test_motor_fault_propagates() {
        let (sim, mut mnpl) = setup(AllianceColor::Red);
        sim.bottom_intake.disconnect();

        mnpl.set_state(BlockMnplState::Intaking);
        assert!(matches!(mnpl.update(), Err(BlockMnplError::EqptFault(_))));
    }
}
