//! ev3dev backend against a fake `tacho-motor` class directory.

use std::fs;
use std::path::{Path, PathBuf};

use rover_drivetrain::{ActuatorSink, DriveMotor, TelemetrySource};
use rover_engine::backends::{Ev3devActuators, MotorPorts, OutputPort, TachoMotor};
use rover_errors::{ErrorCategory, RoverError};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Lay out `motorN` directories the way the kernel driver does.
fn fake_class(ports: &[(&str, char, i32)]) -> Result<TempDir, std::io::Error> {
    let dir = TempDir::new()?;
    for (name, port, count_per_rot) in ports {
        let motor = dir.path().join(name);
        fs::create_dir(&motor)?;
        fs::write(motor.join("address"), format!("ev3-ports:out{port}\n"))?;
        fs::write(motor.join("count_per_rot"), format!("{count_per_rot}\n"))?;
        fs::write(motor.join("speed"), "0\n")?;
    }
    Ok(dir)
}

fn reference_class() -> Result<TempDir, std::io::Error> {
    fake_class(&[
        ("motor0", 'B', 360),
        ("motor1", 'A', 360),
        ("motor2", 'C', 720),
        ("motor3", 'D', 360),
    ])
}

fn attr(dir: &Path, motor: &str, name: &str) -> Result<String, std::io::Error> {
    fs::read_to_string(dir.join(motor).join(name))
}

#[test]
fn test_find_matches_address_not_directory_order() -> TestResult {
    let class = reference_class()?;
    let motor = TachoMotor::find(class.path(), OutputPort::C)?;
    assert_eq!(motor.port(), OutputPort::C);
    assert_eq!(motor.dir(), class.path().join("motor2"));
    Ok(())
}

#[test]
fn test_duty_and_coast_commands() -> TestResult {
    let class = reference_class()?;
    let mut actuators = Ev3devActuators::open_in(class.path(), MotorPorts::default())?;

    actuators.set_duty(DriveMotor::Primary, 47.6);
    assert_eq!(attr(class.path(), "motor1", "duty_cycle_sp")?, "48");
    assert_eq!(attr(class.path(), "motor1", "command")?, "run-direct");

    actuators.set_duty(DriveMotor::Secondary, -250.0);
    assert_eq!(attr(class.path(), "motor3", "duty_cycle_sp")?, "-100");

    actuators.coast(DriveMotor::Secondary);
    assert_eq!(attr(class.path(), "motor3", "stop_action")?, "coast");
    assert_eq!(attr(class.path(), "motor3", "command")?, "stop");
    Ok(())
}

#[test]
fn test_tracking_converts_degrees_to_counts() -> TestResult {
    let class = reference_class()?;
    let mut actuators = Ev3devActuators::open_in(class.path(), MotorPorts::default())?;

    actuators.track_steering(-270.0);
    assert_eq!(attr(class.path(), "motor0", "position_sp")?, "-270");
    assert_eq!(attr(class.path(), "motor0", "stop_action")?, "hold");
    assert_eq!(attr(class.path(), "motor0", "command")?, "run-to-abs-pos");

    // Gearbox motor reports 720 counts per rotation.
    actuators.track_gearbox(-150.0);
    assert_eq!(attr(class.path(), "motor2", "position_sp")?, "-300");
    assert_eq!(attr(class.path(), "motor2", "speed_sp")?, "1000");
    Ok(())
}

#[test]
fn test_telemetry_reads_primary_speed() -> TestResult {
    let class = fake_class(&[
        ("motor0", 'A', 720),
        ("motor1", 'B', 360),
        ("motor2", 'C', 360),
        ("motor3", 'D', 360),
    ])?;
    let actuators = Ev3devActuators::open_in(class.path(), MotorPorts::default())?;
    let telemetry = actuators.telemetry();

    fs::write(class.path().join("motor0").join("speed"), "-1440\n")?;
    assert!((telemetry.drive_speed() + 720.0).abs() < f32::EPSILON);
    Ok(())
}

#[test]
fn test_unreadable_speed_reads_as_standstill() -> TestResult {
    let class = reference_class()?;
    let actuators = Ev3devActuators::open_in(class.path(), MotorPorts::default())?;
    fs::write(class.path().join("motor1").join("speed"), "fast")?;

    assert!(actuators.telemetry().drive_speed().abs() < f32::EPSILON);
    Ok(())
}

#[test]
fn test_missing_count_per_rot_uses_default() -> TestResult {
    let class = reference_class()?;
    let dir: PathBuf = class.path().join("motor1");
    fs::remove_file(dir.join("count_per_rot"))?;
    fs::write(dir.join("speed"), "180\n")?;

    let motor = TachoMotor::at(dir, OutputPort::A);
    assert!((motor.speed()? - 180.0).abs() < f32::EPSILON);
    Ok(())
}

#[test]
fn test_missing_port_is_actuator_error() -> TestResult {
    let class = fake_class(&[("motor0", 'A', 360), ("motor1", 'B', 360)])?;

    match Ev3devActuators::open_in(class.path(), MotorPorts::default()) {
        Err(err) => {
            assert_eq!(err.category(), ErrorCategory::Actuator);
            assert!(err.to_string().contains("port D"), "{err}");
        }
        Ok(_) => return Err("opened without a motor on port D".into()),
    }
    Ok(())
}

#[test]
fn test_missing_class_directory_is_io_error() {
    let result = TachoMotor::find(Path::new("/nonexistent/tacho-motor"), OutputPort::A);
    assert!(matches!(result, Err(RoverError::Io(_))));
}
