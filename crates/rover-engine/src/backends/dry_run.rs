//! Hardware-free backend.

use rover_drivetrain::{ActuatorCommand, ActuatorSink, DriveMotor, TelemetrySource};
use tracing::info;

/// Logs every actuator command instead of moving motors.
#[derive(Debug, Clone, Default)]
pub struct DryRunActuators {
    commands: u64,
    last: Option<ActuatorCommand>,
}

impl DryRunActuators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands received so far.
    pub fn command_count(&self) -> u64 {
        self.commands
    }

    /// Most recent command, if any.
    pub fn last_command(&self) -> Option<ActuatorCommand> {
        self.last
    }

    fn record(&mut self, command: ActuatorCommand) {
        self.commands = self.commands.saturating_add(1);
        self.last = Some(command);
        info!(?command, "dry-run actuator");
    }
}

impl ActuatorSink for DryRunActuators {
    fn set_duty(&mut self, motor: DriveMotor, duty: f32) {
        self.record(ActuatorCommand::Duty { motor, duty });
    }

    fn coast(&mut self, motor: DriveMotor) {
        self.record(ActuatorCommand::Coast { motor });
    }

    fn track_steering(&mut self, angle_deg: f32) {
        self.record(ActuatorCommand::Steering { angle_deg });
    }

    fn track_gearbox(&mut self, angle_deg: f32) {
        self.record(ActuatorCommand::Gearbox { angle_deg });
    }
}

/// Reports a stationary motor.
#[derive(Debug, Clone, Copy, Default)]
pub struct StillTelemetry;

impl TelemetrySource for StillTelemetry {
    fn drive_speed(&self) -> f32 {
        0.0
    }
}
