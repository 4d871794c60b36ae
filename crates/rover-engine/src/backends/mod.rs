//! Actuator and telemetry backends.

pub mod dry_run;
pub mod ev3dev;

pub use dry_run::{DryRunActuators, StillTelemetry};
pub use ev3dev::{Ev3devActuators, Ev3devTelemetry, MotorPorts, OutputPort, TachoMotor};
