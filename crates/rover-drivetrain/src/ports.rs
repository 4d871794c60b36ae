//! Port traits separating the drive logic from motor hardware.
//!
//! The drivetrain talks to four logical actuators (two propulsion motors, a
//! steering motor and a gearbox motor) and reads one speed value back.
//! Commands are fire-and-forget: implementations surface their own write
//! failures, and the control loop never waits for physical completion.

use serde::{Deserialize, Serialize};

/// Propulsion motor selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveMotor {
    /// Always driven.
    Primary,
    /// Mirrors the primary in dual-motor mode, coasts otherwise.
    Secondary,
}

/// Actuator command sink.
pub trait ActuatorSink {
    /// Run a propulsion motor at a continuous duty in `-100.0..=100.0`.
    fn set_duty(&mut self, motor: DriveMotor, duty: f32);

    /// Let a propulsion motor spin freely.
    fn coast(&mut self, motor: DriveMotor);

    /// Move the steering motor toward an absolute angle in degrees.
    fn track_steering(&mut self, angle_deg: f32);

    /// Move the gearbox selector motor toward an absolute angle in degrees.
    fn track_gearbox(&mut self, angle_deg: f32);
}

/// Motor speed telemetry.
pub trait TelemetrySource {
    /// Measured rotational speed of the primary propulsion motor.
    ///
    /// The sign may carry direction; the gearbox controller uses the
    /// magnitude.
    fn drive_speed(&self) -> f32;
}

/// A single actuator command, for recording and logging sinks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ActuatorCommand {
    /// `set_duty`
    Duty {
        /// Target motor
        motor: DriveMotor,
        /// Duty in percent
        duty: f32,
    },
    /// `coast`
    Coast {
        /// Target motor
        motor: DriveMotor,
    },
    /// `track_steering`
    Steering {
        /// Target angle in degrees
        angle_deg: f32,
    },
    /// `track_gearbox`
    Gearbox {
        /// Target angle in degrees
        angle_deg: f32,
    },
}

impl ActuatorCommand {
    /// Deliver this command to a sink.
    pub fn send_to<A: ActuatorSink + ?Sized>(self, sink: &mut A) {
        match self {
            Self::Duty { motor, duty } => sink.set_duty(motor, duty),
            Self::Coast { motor } => sink.coast(motor),
            Self::Steering { angle_deg } => sink.track_steering(angle_deg),
            Self::Gearbox { angle_deg } => sink.track_gearbox(angle_deg),
        }
    }
}

impl<A: ActuatorSink + ?Sized> ActuatorSink for &mut A {
    fn set_duty(&mut self, motor: DriveMotor, duty: f32) {
        (**self).set_duty(motor, duty);
    }

    fn coast(&mut self, motor: DriveMotor) {
        (**self).coast(motor);
    }

    fn track_steering(&mut self, angle_deg: f32) {
        (**self).track_steering(angle_deg);
    }

    fn track_gearbox(&mut self, angle_deg: f32) {
        (**self).track_gearbox(angle_deg);
    }
}

impl<A: ActuatorSink + ?Sized> ActuatorSink for Box<A> {
    fn set_duty(&mut self, motor: DriveMotor, duty: f32) {
        (**self).set_duty(motor, duty);
    }

    fn coast(&mut self, motor: DriveMotor) {
        (**self).coast(motor);
    }

    fn track_steering(&mut self, angle_deg: f32) {
        (**self).track_steering(angle_deg);
    }

    fn track_gearbox(&mut self, angle_deg: f32) {
        (**self).track_gearbox(angle_deg);
    }
}

impl<T: TelemetrySource + ?Sized> TelemetrySource for &T {
    fn drive_speed(&self) -> f32 {
        (**self).drive_speed()
    }
}

impl<T: TelemetrySource + ?Sized> TelemetrySource for Box<T> {
    fn drive_speed(&self) -> f32 {
        (**self).drive_speed()
    }
}
