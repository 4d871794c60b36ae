//! Vehicle configuration.
//!
//! A single YAML document with one section per subsystem. Every section and
//! field is optional; omitted values take the defaults below, so an empty
//! document describes the reference vehicle.
//!
//! ```yaml
//! controller:
//!   family: playstation
//!   deadzone_percent: 5
//! drive:
//!   max_steering_angle: 270
//!   gear_angle_step: 150
//!   motor_count: 2
//! gearbox:
//!   mode: auto_comfort
//!   initial_gear: 1
//! scheduler:
//!   idle_interval_ms: 10
//! buttons:
//!   gear_up: 311
//! ```

use std::path::Path;
use std::time::Duration;

use rover_drivetrain::{DriveGeometry, MotorCount};
use rover_errors::{ProfileError, RoverError, ValidationError};
use rover_gearbox::{FIRST_GEAR, GearboxMode, GearboxProfiles};
use rover_input::{ControllerFamily, DEFAULT_DEADZONE_PERCENT};
use rover_scheduler::DEFAULT_IDLE_INTERVAL_MS;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::router::{ButtonMap, InputRouter};

/// Dead zones at or above this share of the half range are rejected.
const DEADZONE_LIMIT_PERCENT: u32 = 50;

/// Longest accepted idle interval.
const MAX_IDLE_INTERVAL_MS: u64 = 100;

/// The idle interval may be at most this fraction of the shortest hold or
/// ramp time in the gear tables.
const TICKS_PER_SHORTEST_TIMING: u32 = 10;

/// Complete vehicle configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoverConfig {
    pub controller: ControllerConfig,
    pub drive: DriveConfig,
    pub gearbox: GearboxConfig,
    pub scheduler: SchedulerConfig,
    pub buttons: ButtonMap,
}

/// Gamepad settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    pub family: ControllerFamily,
    /// Stick dead zone as a share of the half range.
    pub deadzone_percent: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            family: ControllerFamily::default(),
            deadzone_percent: DEFAULT_DEADZONE_PERCENT,
        }
    }
}

/// Drivetrain geometry and motor setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriveConfig {
    /// Steering motor angle at full deflection, in degrees.
    pub max_steering_angle: f32,
    /// Gearbox selector rotation per gear, in degrees.
    pub gear_angle_step: f32,
    pub motor_count: MotorCount,
}

impl Default for DriveConfig {
    fn default() -> Self {
        let geometry = DriveGeometry::default();
        Self {
            max_steering_angle: geometry.max_steering_angle,
            gear_angle_step: geometry.gear_angle_step,
            motor_count: MotorCount::default(),
        }
    }
}

impl DriveConfig {
    /// Actuator geometry for the drive state.
    pub fn geometry(&self) -> DriveGeometry {
        DriveGeometry {
            max_steering_angle: self.max_steering_angle,
            gear_angle_step: self.gear_angle_step,
        }
    }
}

/// Gearbox mode and gear at startup, and the shift tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GearboxConfig {
    pub mode: GearboxMode,
    /// Gear selected before the first input, in `1..=N`.
    pub initial_gear: u8,
    pub profiles: GearboxProfiles,
}

impl Default for GearboxConfig {
    fn default() -> Self {
        Self {
            mode: GearboxMode::default(),
            initial_gear: FIRST_GEAR,
            profiles: GearboxProfiles::default(),
        }
    }
}

/// Control loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Sleep between gearbox ticks when no input is pending.
    pub idle_interval_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            idle_interval_ms: DEFAULT_IDLE_INTERVAL_MS,
        }
    }
}

impl SchedulerConfig {
    /// Idle interval as a `Duration`.
    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }
}

impl RoverConfig {
    /// Read, parse and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, RoverError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        config.validate()?;
        debug!(path = %path.display(), mode = %config.gearbox.mode, "loaded configuration");
        Ok(config)
    }

    /// Parse a YAML document without validating it.
    pub fn from_yaml_str(text: &str) -> Result<Self, RoverError> {
        serde_yaml::from_str(text)
            .map_err(|e| RoverError::config(format!("YAML parse error: {e}")))
    }

    /// Render as YAML.
    pub fn to_yaml_string(&self) -> Result<String, RoverError> {
        serde_yaml::to_string(self)
            .map_err(|e| RoverError::config(format!("YAML encode error: {e}")))
    }

    /// Check every section. Fails on the first problem found.
    pub fn validate(&self) -> Result<(), RoverError> {
        if self.controller.deadzone_percent >= DEADZONE_LIMIT_PERCENT {
            return Err(ValidationError::out_of_range(
                "controller.deadzone_percent",
                self.controller.deadzone_percent,
                0,
                DEADZONE_LIMIT_PERCENT - 1,
            )
            .into());
        }
        check_angle("drive.max_steering_angle", self.drive.max_steering_angle)?;
        check_angle("drive.gear_angle_step", self.drive.gear_angle_step)?;
        if !(1..=MAX_IDLE_INTERVAL_MS).contains(&self.scheduler.idle_interval_ms) {
            return Err(ValidationError::out_of_range(
                "scheduler.idle_interval_ms",
                self.scheduler.idle_interval_ms,
                1,
                MAX_IDLE_INTERVAL_MS,
            )
            .into());
        }
        self.buttons.validate()?;
        self.gearbox.profiles.validate()?;
        if let Some(shortest) = self.gearbox.profiles.shortest_timing() {
            let limit = shortest / TICKS_PER_SHORTEST_TIMING;
            if self.scheduler.idle_interval() > limit {
                return Err(ValidationError::constraint(format!(
                    "scheduler.idle_interval_ms {} exceeds {} ms, a tenth of the shortest hold or ramp ({} ms)",
                    self.scheduler.idle_interval_ms,
                    limit.as_millis(),
                    shortest.as_millis()
                ))
                .into());
            }
        }
        let top_gear = self.gearbox.profiles.top_gear();
        if !(FIRST_GEAR..=top_gear).contains(&self.gearbox.initial_gear) {
            return Err(ProfileError::gear_out_of_bounds(self.gearbox.initial_gear, top_gear).into());
        }
        Ok(())
    }

    /// Input router for this controller setup.
    pub fn router(&self) -> InputRouter {
        InputRouter::new(
            self.controller.family,
            self.controller.deadzone_percent,
            self.buttons,
        )
    }
}

fn check_angle(field: &str, value: f32) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::out_of_range(field, value, f32::MIN_POSITIVE, f32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_reference_vehicle() -> Result<(), RoverError> {
        let config = RoverConfig::from_yaml_str("{}")?;
        assert_eq!(config, RoverConfig::default());
        config.validate()
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() -> Result<(), RoverError> {
        let config = RoverConfig::from_yaml_str("drive:\n  motor_count: 1\n")?;
        assert_eq!(config.drive.motor_count, MotorCount::Single);
        assert_eq!(config.drive.geometry(), DriveGeometry::default());
        Ok(())
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = RoverConfig::from_yaml_str("drive:\n  turbo: true\n");
        assert!(matches!(result, Err(RoverError::Config(_))));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = RoverConfig {
            scheduler: SchedulerConfig { idle_interval_ms: 0 },
            ..RoverConfig::default()
        };
        assert!(matches!(config.validate(), Err(RoverError::Validation(_))));
    }

    #[test]
    fn test_initial_gear_outside_gearbox_rejected() -> Result<(), RoverError> {
        let config = RoverConfig::from_yaml_str("gearbox:\n  initial_gear: 5\n")?;
        assert!(matches!(
            config.validate(),
            Err(RoverError::Profile(ProfileError::GearOutOfBounds { gear: 5, max: 4 }))
        ));

        let config = RoverConfig::from_yaml_str("gearbox:\n  initial_gear: 0\n")?;
        assert!(matches!(
            config.validate(),
            Err(RoverError::Profile(ProfileError::GearOutOfBounds { gear: 0, .. }))
        ));

        let config = RoverConfig::from_yaml_str("gearbox:\n  initial_gear: 4\n")?;
        config.validate()
    }

    #[test]
    fn test_interval_above_hard_cap_rejected() {
        let config = RoverConfig {
            scheduler: SchedulerConfig { idle_interval_ms: 250 },
            ..RoverConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RoverError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_interval_must_be_short_against_reference_tables() -> Result<(), RoverError> {
        // Shortest reference timing is 0.3s, so 30ms passes and 40ms does not.
        let mut config = RoverConfig::default();
        config.scheduler.idle_interval_ms = 30;
        config.validate()?;

        config.scheduler.idle_interval_ms = 40;
        assert!(matches!(
            config.validate(),
            Err(RoverError::Validation(ValidationError::ConstraintViolation(_)))
        ));
        Ok(())
    }

    #[test]
    fn test_negative_angle_rejected() {
        let mut config = RoverConfig::default();
        config.drive.gear_angle_step = -150.0;
        assert!(matches!(config.validate(), Err(RoverError::Validation(_))));
    }
}
