//! Rover vehicle assembly.
//!
//! Joins the input, drivetrain, gearbox and scheduler crates into a
//! [`Vehicle`] that the control loop drives:
//!
//! - [`config`]: YAML configuration with validation
//! - [`router`]: raw controller events to [`ControlEvent`]s
//! - [`vehicle`]: the [`rover_scheduler::ControlHandler`] owning all control state
//! - [`feedback`] and [`status`]: what the driver gets told
//! - [`backends`]: ev3dev sysfs motors and a dry-run sink
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use rover_engine::prelude::*;
//! use rover_input::{RawInputEvent, codes};
//! use rover_scheduler::ControlHandler;
//!
//! # fn main() -> Result<(), rover_errors::RoverError> {
//! let config = RoverConfig::default();
//! let mut vehicle = Vehicle::new(&config, DryRunActuators::new(), StillTelemetry, LogFeedback)?;
//! vehicle.start();
//!
//! vehicle.handle_event(RawInputEvent::press(codes::BTN_TR), Duration::ZERO);
//! assert_eq!(vehicle.status().gear, 2);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(unused_must_use)]

pub mod backends;
pub mod config;
pub mod feedback;
pub mod prelude;
pub mod router;
pub mod status;
pub mod vehicle;

pub use backends::{DryRunActuators, Ev3devActuators, MotorPorts, OutputPort, StillTelemetry};
pub use config::RoverConfig;
pub use feedback::{Feedback, LogFeedback};
pub use router::{ButtonAction, ButtonMap, ControlEvent, InputRouter};
pub use status::VehicleStatus;
pub use vehicle::Vehicle;
