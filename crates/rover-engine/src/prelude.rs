//! Prelude module for convenient imports.

pub use crate::{
    backends::{DryRunActuators, Ev3devActuators, MotorPorts, OutputPort, StillTelemetry},
    config::{ControllerConfig, DriveConfig, GearboxConfig, RoverConfig, SchedulerConfig},
    feedback::{Feedback, LogFeedback},
    router::{ButtonAction, ButtonMap, ControlEvent, InputRouter},
    status::VehicleStatus,
    vehicle::Vehicle,
};
