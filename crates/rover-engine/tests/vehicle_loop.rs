//! The assembled vehicle driven by raw controller events.

use std::time::Duration;

use proptest::prelude::*;
use rover_drivetrain::{ActuatorCommand, DriveMotor};
use rover_engine::prelude::*;
use rover_gearbox::GearboxMode;
use rover_input::{ControllerFamily, RawInputEvent, codes};
use rover_scheduler::{ControlHandler, ControlScheduler, ManualClock};
use rover_test_helpers::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;
type TestVehicle = Vehicle<RecordingActuators, ScriptedTelemetry, RecordingFeedback>;

#[derive(Debug, Default)]
struct RecordingFeedback {
    horns: u32,
    effects: u32,
    statuses: Vec<VehicleStatus>,
}

impl Feedback for RecordingFeedback {
    fn horn(&mut self) {
        self.horns += 1;
    }

    fn effect(&mut self) {
        self.effects += 1;
    }

    fn status_changed(&mut self, status: &VehicleStatus) {
        self.statuses.push(*status);
    }
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn vehicle(config: &RoverConfig, speed: f32) -> Result<(TestVehicle, RecordingActuators, ScriptedTelemetry), rover_errors::RoverError> {
    let recorder = RecordingActuators::new();
    let telemetry = ScriptedTelemetry::new(speed);
    let vehicle = Vehicle::new(
        config,
        recorder.clone(),
        telemetry.clone(),
        RecordingFeedback::default(),
    )?;
    Ok((vehicle, recorder, telemetry))
}

fn idle_for(vehicle: &mut TestVehicle, from_ms: u64, to_ms: u64) {
    for t in (from_ms..=to_ms).step_by(10) {
        vehicle.handle_idle(ms(t));
    }
}

fn full_throttle() -> RawInputEvent {
    stick_y(full_stick(ControllerFamily::Xbox, true))
}

#[test]
fn test_start_syncs_actuators_and_announces() -> TestResult {
    let (mut vehicle, recorder, _) = vehicle(&RoverConfig::default(), 0.0)?;
    vehicle.start();

    assert_eq!(recorder.len(), 4);
    assert_eq!(vehicle.feedback().statuses.len(), 1);
    assert_eq!(vehicle.status().gear, 1);
    assert_eq!(vehicle.status().mode, GearboxMode::Manual);
    Ok(())
}

#[test]
fn test_gear_buttons_step_within_bounds() -> TestResult {
    let (mut vehicle, recorder, _) = vehicle(&RoverConfig::default(), 0.0)?;

    for _ in 0..6 {
        vehicle.handle_event(RawInputEvent::press(codes::BTN_TR), ms(0));
        vehicle.handle_event(RawInputEvent::release(codes::BTN_TR), ms(0));
    }
    assert_eq!(vehicle.status().gear, 4);
    assert_eq!(recorder.gearbox_targets(), vec![-150.0, -300.0, -450.0]);

    vehicle.handle_event(RawInputEvent::press(codes::BTN_TL), ms(0));
    assert_eq!(vehicle.status().gear, 3);
    // One notification per actual change.
    assert_eq!(vehicle.feedback().statuses.len(), 4);
    Ok(())
}

#[test]
fn test_sticks_and_trigger_drive_motors() -> TestResult {
    let (mut vehicle, recorder, _) = vehicle(&RoverConfig::default(), 0.0)?;

    vehicle.handle_event(stick_y(49_152), ms(0));
    let half = vehicle.drive().power_pos();
    assert!(half > 40.0 && half < 50.0, "power {half}");

    vehicle.handle_event(trigger(ControllerFamily::Xbox, 1_024), ms(0));
    assert_approx_eq!(vehicle.drive().duty(), (half * 2.0).min(100.0), 1e-3);

    vehicle.handle_event(stick_x(0), ms(0));
    let steering = must_some(recorder.steering_targets().last().copied(), "steering target");
    assert_approx_eq!(steering, 270.0_f32, 1e-3);

    assert_eq!(
        recorder.duties(DriveMotor::Primary),
        recorder.duties(DriveMotor::Secondary)
    );
    Ok(())
}

#[test]
fn test_centered_stick_stops() -> TestResult {
    let (mut vehicle, recorder, _) = vehicle(&RoverConfig::default(), 0.0)?;
    vehicle.handle_event(full_throttle(), ms(0));
    vehicle.handle_event(stick_y(centered_stick(ControllerFamily::Xbox)), ms(0));

    assert_approx_eq!(vehicle.drive().duty(), 0.0_f32, f32::EPSILON);
    let last = must_some(recorder.duties(DriveMotor::Primary).last().copied(), "duty");
    assert_approx_eq!(last, 0.0_f32, f32::EPSILON);
    Ok(())
}

#[test]
fn test_horn_effect_and_motor_toggle() -> TestResult {
    let (mut vehicle, recorder, _) = vehicle(&RoverConfig::default(), 0.0)?;

    vehicle.handle_event(RawInputEvent::press(codes::BTN_X), ms(0));
    vehicle.handle_event(RawInputEvent::press(codes::BTN_Y), ms(0));
    vehicle.handle_event(RawInputEvent::press(codes::BTN_Y), ms(0));
    assert_eq!(vehicle.feedback().horns, 1);
    assert_eq!(vehicle.feedback().effects, 2);

    vehicle.handle_event(RawInputEvent::press(codes::BTN_THUMBL), ms(0));
    assert_eq!(vehicle.status().motor_count, 1);
    assert_eq!(
        recorder.last(),
        Some(ActuatorCommand::Coast {
            motor: DriveMotor::Secondary
        })
    );

    vehicle.handle_event(RawInputEvent::press(codes::BTN_THUMBL), ms(0));
    assert_eq!(vehicle.status().motor_count, 2);
    Ok(())
}

#[test]
fn test_scheduler_loop_shifts_in_auto_sport() -> TestResult {
    let (mut vehicle, _recorder, _) = vehicle(&RoverConfig::default(), 650.0)?;
    let clock = ManualClock::new();
    let mut events = ScriptedEvents::timed(
        clock.clone(),
        [
            (ms(0), RawInputEvent::press(codes::BTN_A)),
            (ms(0), full_throttle()),
            // Keeps the source alive for the whole run.
            (Duration::from_secs(60), RawInputEvent::release(codes::BTN_A)),
        ],
    );
    let mut scheduler = ControlScheduler::new(clock.clone(), ms(10));

    // Two events, then idle ticks at 0ms, 10ms, ..., 590ms.
    scheduler.run_steps(2 + 60, &mut events, &mut vehicle);
    assert_eq!(vehicle.status().mode, GearboxMode::AutoSport);
    assert_eq!(vehicle.status().gear, 1);

    scheduler.run_steps(1, &mut events, &mut vehicle);
    assert_eq!(vehicle.status().gear, 2);
    assert_eq!(rover_scheduler::Clock::now(&clock), ms(610));

    let gears: Vec<u8> = vehicle.feedback().statuses.iter().map(|s| s.gear).collect();
    assert_eq!(gears, vec![1, 2]);
    Ok(())
}

#[test]
fn test_manual_switch_lets_ramp_finish() -> TestResult {
    let (mut vehicle, _recorder, _) = vehicle(&RoverConfig::default(), 650.0)?;
    vehicle.handle_event(RawInputEvent::press(codes::BTN_B), ms(0));
    vehicle.handle_event(full_throttle(), ms(0));

    idle_for(&mut vehicle, 0, 800);
    assert_eq!(vehicle.status().gear, 2);
    assert!(vehicle.drive().ramp_active());

    vehicle.handle_event(RawInputEvent::press(codes::BTN_SELECT), ms(1_000));
    assert_eq!(vehicle.status().mode, GearboxMode::Manual);

    idle_for(&mut vehicle, 1_000, 1_790);
    assert!(vehicle.drive().ramp_active());
    idle_for(&mut vehicle, 1_800, 3_000);
    assert!(!vehicle.drive().ramp_active());
    assert_approx_eq!(vehicle.status().power_compensation, 1.0_f32, f32::EPSILON);
    assert_eq!(vehicle.status().gear, 2);
    Ok(())
}

#[test]
fn test_configured_initial_mode_and_single_motor() -> TestResult {
    let config = RoverConfig::from_yaml_str("gearbox:\n  mode: auto_sport\ndrive:\n  motor_count: 1\n")?;
    let (mut vehicle, recorder, _) = vehicle(&config, 0.0)?;
    vehicle.handle_event(full_throttle(), ms(0));

    assert_eq!(vehicle.gearbox().mode(), GearboxMode::AutoSport);
    assert!(recorder.duties(DriveMotor::Secondary).is_empty());
    Ok(())
}

#[test]
fn test_configured_initial_gear_is_synced_on_start() -> TestResult {
    let config = RoverConfig::from_yaml_str("gearbox:\n  initial_gear: 3\n")?;
    let (mut vehicle, recorder, _) = vehicle(&config, 0.0)?;
    assert!(recorder.is_empty());

    vehicle.start();
    assert_eq!(vehicle.status().gear, 3);
    assert_eq!(recorder.gearbox_targets(), vec![-300.0]);
    Ok(())
}

#[test]
fn test_initial_gear_beyond_gearbox_is_rejected() -> TestResult {
    let config = RoverConfig::from_yaml_str("gearbox:\n  initial_gear: 9\n")?;
    match vehicle(&config, 0.0) {
        Err(err) => assert_eq!(err.category(), rover_errors::ErrorCategory::Profile),
        Ok(_) => return Err("gear 9 accepted on a 4-speed gearbox".into()),
    }
    Ok(())
}

#[test]
fn test_status_serializes_for_displays() -> TestResult {
    let (mut vehicle, _, _) = vehicle(&RoverConfig::default(), 0.0)?;
    vehicle.handle_event(RawInputEvent::press(codes::BTN_TR), ms(0));
    vehicle.handle_event(RawInputEvent::press(codes::BTN_B), ms(0));

    let value = serde_json::to_value(vehicle.status())?;
    assert_eq!(value["gear"], 2);
    assert_eq!(value["top_gear"], 4);
    assert_eq!(value["mode"], "auto_comfort");
    assert_eq!(value["motor_count"], 2);
    assert_eq!(vehicle.status().to_string(), "gear 2/4 | auto_comfort | 2 motors");
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = RoverConfig::default();
    config.scheduler.idle_interval_ms = 0;
    assert!(vehicle(&config, 0.0).is_err());
}

fn raw_event() -> impl Strategy<Value = RawInputEvent> {
    prop_oneof![
        (0i32..=65_535).prop_map(stick_x),
        (0i32..=65_535).prop_map(stick_y),
        (0i32..=1_100).prop_map(|v| trigger(ControllerFamily::Xbox, v)),
        prop::sample::select(vec![
            codes::BTN_A,
            codes::BTN_B,
            codes::BTN_X,
            codes::BTN_Y,
            codes::BTN_TL,
            codes::BTN_TR,
            codes::BTN_SELECT,
            codes::BTN_THUMBL,
        ])
        .prop_map(RawInputEvent::press),
        (0u16..0x200, any::<i32>()).prop_map(|(code, value)| RawInputEvent::new(codes::EV_KEY, code, value)),
    ]
}

proptest! {
    #[test]
    fn prop_any_event_stream_keeps_state_valid(
        events in prop::collection::vec((raw_event(), 0u64..50), 0..100),
        speed in 0.0f32..1_200.0,
    ) {
        let (mut vehicle, recorder, _) = vehicle(&RoverConfig::default(), speed)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut now = 0;
        for (event, gap) in events {
            vehicle.handle_event(event, ms(now));
            now += gap * 10;
            vehicle.handle_idle(ms(now));
            let status = vehicle.status();
            prop_assert!((1..=status.top_gear).contains(&status.gear));
            prop_assert!(vehicle.drive().duty().abs() <= 100.0);
        }
        for command in recorder.commands() {
            if let ActuatorCommand::Duty { duty, .. } = command {
                prop_assert!(duty.abs() <= 100.0);
            }
        }
    }
}
