//! ev3dev `tacho-motor` sysfs backend.
//!
//! Each motor is a directory under `/sys/class/tacho-motor/` with text
//! attributes. Motors are matched to output ports through their `address`
//! attribute (`ev3-ports:outA` and similar). Angles are converted to tacho
//! counts using `count_per_rot`; speed is reported in degrees per second.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rover_drivetrain::{ActuatorSink, DriveMotor, MAX_DUTY, TelemetrySource};
use rover_errors::{RoverError, ValidationError};
use tracing::{debug, warn};

/// Default sysfs class directory.
pub const TACHO_MOTOR_CLASS: &str = "/sys/class/tacho-motor";

/// Counts per rotation assumed when the attribute is unreadable.
const DEFAULT_COUNT_PER_ROT: i32 = 360;

/// Speed used when tracking an angle, in counts per second.
const TRACKING_SPEED_SP: i32 = 1_000;

/// EV3 brick output port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputPort {
    A,
    B,
    C,
    D,
}

impl OutputPort {
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }

    /// True if a sysfs `address` value names this port.
    pub fn matches_address(self, address: &str) -> bool {
        let address = address.trim();
        address
            .rsplit_once(':')
            .map_or(address, |(_, port)| port)
            .eq_ignore_ascii_case(&format!("out{}", self.letter()))
    }
}

impl fmt::Display for OutputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for OutputPort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" | "OUTA" => Ok(Self::A),
            "B" | "OUTB" => Ok(Self::B),
            "C" | "OUTC" => Ok(Self::C),
            "D" | "OUTD" => Ok(Self::D),
            _ => Err(ValidationError::invalid_enum("port", s, "A, B, C, D")),
        }
    }
}

/// Port assignment of the four motors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorPorts {
    pub primary: OutputPort,
    pub secondary: OutputPort,
    pub steering: OutputPort,
    pub gearbox: OutputPort,
}

impl Default for MotorPorts {
    fn default() -> Self {
        Self {
            primary: OutputPort::A,
            secondary: OutputPort::D,
            steering: OutputPort::B,
            gearbox: OutputPort::C,
        }
    }
}

impl MotorPorts {
    fn all(&self) -> [OutputPort; 4] {
        [self.primary, self.secondary, self.steering, self.gearbox]
    }
}

/// Parses `primary,secondary,steering,gearbox`, e.g. `A,D,B,C`.
impl FromStr for MotorPorts {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ports = s
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<OutputPort>, _>>()?;
        let [primary, secondary, steering, gearbox] = ports.as_slice() else {
            return Err(ValidationError::constraint(format!(
                "expected four comma-separated ports, got {s:?}"
            )));
        };
        let parsed = Self {
            primary: *primary,
            secondary: *secondary,
            steering: *steering,
            gearbox: *gearbox,
        };
        let all = parsed.all();
        for (i, port) in all.iter().enumerate() {
            if all.iter().skip(i + 1).any(|other| other == port) {
                return Err(ValidationError::constraint(format!(
                    "port {port} is assigned twice"
                )));
            }
        }
        Ok(parsed)
    }
}

/// One tacho motor's sysfs directory.
#[derive(Debug, Clone)]
pub struct TachoMotor {
    dir: PathBuf,
    port: OutputPort,
    count_per_rot: i32,
}

impl TachoMotor {
    /// Find the motor attached to `port` under `class_dir`.
    pub fn find(class_dir: &Path, port: OutputPort) -> Result<Self, RoverError> {
        for entry in fs::read_dir(class_dir)? {
            let dir = entry?.path();
            let Ok(address) = fs::read_to_string(dir.join("address")) else {
                continue;
            };
            if port.matches_address(&address) {
                return Ok(Self::at(dir, port));
            }
        }
        Err(RoverError::actuator(format!(
            "no tacho motor on output port {port} under {}",
            class_dir.display()
        )))
    }

    /// Use a known motor directory.
    pub fn at(dir: PathBuf, port: OutputPort) -> Self {
        let count_per_rot = read_attr(&dir, "count_per_rot")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_COUNT_PER_ROT);
        debug!(port = %port, dir = %dir.display(), count_per_rot, "found tacho motor");
        Self {
            dir,
            port,
            count_per_rot,
        }
    }

    /// Output port the motor is attached to.
    pub fn port(&self) -> OutputPort {
        self.port
    }

    /// Sysfs directory of the motor.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, attr: &str, value: impl fmt::Display) -> io::Result<()> {
        fs::write(self.dir.join(attr), value.to_string())
    }

    /// Run unregulated at `duty` percent.
    pub fn run_direct(&self, duty: f32) -> io::Result<()> {
        let duty = duty.clamp(-MAX_DUTY, MAX_DUTY).round() as i32;
        self.write("duty_cycle_sp", duty)?;
        self.write("command", "run-direct")
    }

    /// Stop and let the motor spin freely.
    pub fn coast(&self) -> io::Result<()> {
        self.write("stop_action", "coast")?;
        self.write("command", "stop")
    }

    /// Move to an absolute angle in degrees and hold it.
    pub fn track_target(&self, angle_deg: f32) -> io::Result<()> {
        let counts = (angle_deg * self.count_per_rot as f32 / 360.0).round() as i32;
        self.write("stop_action", "hold")?;
        self.write("speed_sp", TRACKING_SPEED_SP)?;
        self.write("position_sp", counts)?;
        self.write("command", "run-to-abs-pos")
    }

    /// Current speed in degrees per second.
    pub fn speed(&self) -> io::Result<f32> {
        let counts: i32 = read_attr(&self.dir, "speed")?
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(counts as f32 * 360.0 / self.count_per_rot as f32)
    }
}

fn read_attr(dir: &Path, attr: &str) -> io::Result<String> {
    fs::read_to_string(dir.join(attr)).map(|v| v.trim().to_string())
}

/// The four drivetrain motors.
#[derive(Debug, Clone)]
pub struct Ev3devActuators {
    primary: TachoMotor,
    secondary: TachoMotor,
    steering: TachoMotor,
    gearbox: TachoMotor,
}

impl Ev3devActuators {
    /// Locate all four motors under the default sysfs class.
    pub fn open(ports: MotorPorts) -> Result<Self, RoverError> {
        Self::open_in(Path::new(TACHO_MOTOR_CLASS), ports)
    }

    /// Locate all four motors under `class_dir`.
    pub fn open_in(class_dir: &Path, ports: MotorPorts) -> Result<Self, RoverError> {
        Ok(Self {
            primary: TachoMotor::find(class_dir, ports.primary)?,
            secondary: TachoMotor::find(class_dir, ports.secondary)?,
            steering: TachoMotor::find(class_dir, ports.steering)?,
            gearbox: TachoMotor::find(class_dir, ports.gearbox)?,
        })
    }

    /// Speed telemetry from the primary propulsion motor.
    pub fn telemetry(&self) -> Ev3devTelemetry {
        Ev3devTelemetry {
            motor: self.primary.clone(),
        }
    }

    fn propulsion(&self, motor: DriveMotor) -> &TachoMotor {
        match motor {
            DriveMotor::Primary => &self.primary,
            DriveMotor::Secondary => &self.secondary,
        }
    }
}

fn log_failure(motor: &TachoMotor, action: &str, result: io::Result<()>) {
    if let Err(e) = result {
        warn!(port = %motor.port(), action, error = %e, "motor write failed");
    }
}

impl ActuatorSink for Ev3devActuators {
    fn set_duty(&mut self, motor: DriveMotor, duty: f32) {
        let motor = self.propulsion(motor);
        log_failure(motor, "run-direct", motor.run_direct(duty));
    }

    fn coast(&mut self, motor: DriveMotor) {
        let motor = self.propulsion(motor);
        log_failure(motor, "coast", motor.coast());
    }

    fn track_steering(&mut self, angle_deg: f32) {
        log_failure(&self.steering, "track", self.steering.track_target(angle_deg));
    }

    fn track_gearbox(&mut self, angle_deg: f32) {
        log_failure(&self.gearbox, "track", self.gearbox.track_target(angle_deg));
    }
}

/// Primary motor speed read from sysfs.
#[derive(Debug, Clone)]
pub struct Ev3devTelemetry {
    motor: TachoMotor,
}

impl TelemetrySource for Ev3devTelemetry {
    fn drive_speed(&self) -> f32 {
        match self.motor.speed() {
            Ok(speed) => speed,
            Err(e) => {
                warn!(port = %self.motor.port(), error = %e, "speed read failed");
                0.0
            }
        }
    }
}
