//! Prelude module for convenient imports.

pub use crate::{
    auto::{AutoGearbox, TickOutcome},
    drive::{DriveGeometry, DriveState, MotorCount, PropulsionUpdate},
    ports::{ActuatorCommand, ActuatorSink, DriveMotor, TelemetrySource},
};
