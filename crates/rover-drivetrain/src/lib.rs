//! Drive state and automatic gear selection for the rover.
//!
//! [`DriveState`] owns the actuators and is the only place commands are
//! emitted; [`AutoGearbox`] decides when to shift based on motor speed
//! telemetry and the active profile table.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use rover_drivetrain::{
//!     ActuatorSink, AutoGearbox, DriveGeometry, DriveMotor, DriveState, MotorCount,
//!     PropulsionUpdate, TelemetrySource,
//! };
//! use rover_gearbox::{GearboxMode, GearboxProfiles};
//!
//! struct Quiet;
//! impl ActuatorSink for Quiet {
//!     fn set_duty(&mut self, _: DriveMotor, _: f32) {}
//!     fn coast(&mut self, _: DriveMotor) {}
//!     fn track_steering(&mut self, _: f32) {}
//!     fn track_gearbox(&mut self, _: f32) {}
//! }
//!
//! struct Cruising;
//! impl TelemetrySource for Cruising {
//!     fn drive_speed(&self) -> f32 { 650.0 }
//! }
//!
//! # fn main() -> Result<(), rover_errors::ProfileError> {
//! let auto = AutoGearbox::new(GearboxProfiles::default(), GearboxMode::AutoSport)?;
//! let mut drive = DriveState::new(Quiet, DriveGeometry::default(), auto.top_gear(), MotorCount::Dual);
//! drive.set_propulsion(PropulsionUpdate::power(80.0));
//!
//! for tick in 0..=60 {
//!     auto.tick(&mut drive, &Cruising, Duration::from_millis(tick * 10));
//! }
//! assert_eq!(drive.gear(), 2);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(unused_must_use)]

pub mod auto;
pub mod drive;
pub mod ports;
pub mod prelude;

pub use auto::{AutoGearbox, TickOutcome};
pub use drive::{DriveGeometry, DriveState, MAX_DUTY, MotorCount, PropulsionUpdate, ShiftTracking};
pub use ports::{ActuatorCommand, ActuatorSink, DriveMotor, TelemetrySource};
