//! Gear profile tables and the timing primitives of the automatic gearbox.
//!
//! This crate holds the configuration side of automatic shifting (per-gear
//! thresholds for the Sport and Comfort driving characters) together with
//! the two pieces of time-dependent state the controller keeps between
//! ticks: hold timers for the up/down conditions and the post-shift power
//! compensation ramp.
//!
//! The decision loop itself lives in `rover-drivetrain`, next to the drive
//! state it mutates.

#![deny(clippy::unwrap_used)]

pub mod hysteresis;
pub mod mode;
pub mod profile;
pub mod ramp;
pub mod table;

pub use hysteresis::{HoldTimer, HysteresisTimers};
pub use mode::{DrivingCharacter, GearboxMode};
pub use profile::{GearProfile, ShiftCompensation};
pub use ramp::{CompensationRamp, RampSample};
pub use table::{GearTable, GearboxProfiles};

/// Largest supported number of gears in a table.
pub const MAX_GEARS: usize = 8;

/// Lowest gear. Gears are numbered from 1.
pub const FIRST_GEAR: u8 = 1;

/// Resting value of the power compensation multiplier.
pub const NEUTRAL_COMPENSATION: f32 = 1.0;
