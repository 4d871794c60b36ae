//! Per-gear shift thresholds.

use std::time::Duration;

use rover_errors::{ProfileError, ValidationError};
use serde::{Deserialize, Serialize};

/// Convert configured seconds to a `Duration`, rounded to the microsecond so
/// that `0.6` means 600ms rather than the nearest `f32`. Invalid values become
/// zero; validation rejects them before a table is ever used.
fn seconds(value: f32) -> Duration {
    let micros = (f64::from(value) * 1e6).round();
    Duration::try_from_secs_f64(micros / 1e6).unwrap_or(Duration::ZERO)
}

/// Post-shift power compensation for one gear (Comfort tables only).
///
/// After shifting out of this gear the drive power is multiplied by the
/// factor, which then ramps linearly back to 1.0 over the given seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftCompensation {
    /// Starting multiplier after an up-shift.
    pub up_compensation_factor: f32,
    /// Ramp length after an up-shift.
    pub up_compensation_seconds: f32,
    /// Starting multiplier after a down-shift.
    pub down_compensation_factor: f32,
    /// Ramp length after a down-shift.
    pub down_compensation_seconds: f32,
}

impl ShiftCompensation {
    /// Largest accepted compensation factor.
    pub const MAX_FACTOR: f32 = 2.0;

    /// Ramp duration after an up-shift.
    pub fn up_duration(&self) -> Duration {
        seconds(self.up_compensation_seconds)
    }

    /// Ramp duration after a down-shift.
    pub fn down_duration(&self) -> Duration {
        seconds(self.down_compensation_seconds)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_factor("up_compensation_factor", self.up_compensation_factor)?;
        check_seconds("up_compensation_seconds", self.up_compensation_seconds)?;
        check_factor("down_compensation_factor", self.down_compensation_factor)?;
        check_seconds("down_compensation_seconds", self.down_compensation_seconds)
    }
}

/// Shift thresholds for one gear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearProfile {
    /// Highest motor speed reachable in this gear.
    pub max_rpm: f32,
    /// Minimum absolute drive power for an up-shift.
    pub up_power_threshold: f32,
    /// Minimum motor speed for an up-shift.
    pub up_rpm_threshold: f32,
    /// How long the up condition must hold.
    pub up_hold_seconds: f32,
    /// Down-shift when absolute drive power is at or below this...
    pub down_power_threshold: f32,
    /// ...or when motor speed is at or below this.
    pub down_rpm_threshold: f32,
    /// How long the down condition must hold.
    pub down_hold_seconds: f32,
    /// Post-shift ramp parameters; required in Comfort tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compensation: Option<ShiftCompensation>,
}

impl GearProfile {
    /// Attach compensation parameters.
    pub const fn with_compensation(mut self, compensation: ShiftCompensation) -> Self {
        self.compensation = Some(compensation);
        self
    }

    /// Up-shift hold time.
    pub fn up_hold(&self) -> Duration {
        seconds(self.up_hold_seconds)
    }

    /// Down-shift hold time.
    pub fn down_hold(&self) -> Duration {
        seconds(self.down_hold_seconds)
    }

    /// Up condition: power AND speed both high enough.
    pub fn wants_up(&self, power_abs: f32, speed: f32) -> bool {
        power_abs >= self.up_power_threshold && speed >= self.up_rpm_threshold
    }

    /// Down condition: power OR speed low enough.
    pub fn wants_down(&self, power_abs: f32, speed: f32) -> bool {
        power_abs <= self.down_power_threshold || speed <= self.down_rpm_threshold
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.max_rpm.is_finite() || self.max_rpm <= 0.0 {
            return Err(ValidationError::out_of_range(
                "max_rpm",
                self.max_rpm,
                f32::MIN_POSITIVE,
                f32::MAX,
            ));
        }
        check_power("up_power_threshold", self.up_power_threshold)?;
        check_rpm("up_rpm_threshold", self.up_rpm_threshold, self.max_rpm)?;
        check_seconds("up_hold_seconds", self.up_hold_seconds)?;
        check_power("down_power_threshold", self.down_power_threshold)?;
        check_rpm("down_rpm_threshold", self.down_rpm_threshold, self.max_rpm)?;
        check_seconds("down_hold_seconds", self.down_hold_seconds)?;
        if let Some(compensation) = &self.compensation {
            compensation.validate()?;
        }
        Ok(())
    }

    /// Validate as row `gear` of `table`, wrapping failures with context.
    pub(crate) fn validate_row(
        &self,
        table: &str,
        gear: usize,
        require_compensation: bool,
    ) -> Result<(), ProfileError> {
        self.validate()
            .map_err(|e| ProfileError::invalid_value(table, gear, e))?;
        if require_compensation && self.compensation.is_none() {
            return Err(ProfileError::missing_compensation(table, gear));
        }
        Ok(())
    }
}

fn check_power(field: &str, value: f32) -> Result<(), ValidationError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::out_of_range(field, value, 0.0, 100.0))
    }
}

fn check_rpm(field: &str, value: f32, max_rpm: f32) -> Result<(), ValidationError> {
    if (0.0..=max_rpm).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::out_of_range(field, value, 0.0, max_rpm))
    }
}

fn check_seconds(field: &str, value: f32) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::out_of_range(field, value, 0.0, f32::MAX))
    }
}

fn check_factor(field: &str, value: f32) -> Result<(), ValidationError> {
    if value > 0.0 && value <= ShiftCompensation::MAX_FACTOR {
        Ok(())
    } else {
        Err(ValidationError::out_of_range(
            field,
            value,
            0.0,
            ShiftCompensation::MAX_FACTOR,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> GearProfile {
        GearProfile {
            max_rpm: 1050.0,
            up_power_threshold: 70.0,
            up_rpm_threshold: 600.0,
            up_hold_seconds: 0.6,
            down_power_threshold: 50.0,
            down_rpm_threshold: 400.0,
            down_hold_seconds: 0.4,
            compensation: None,
        }
    }

    #[test]
    fn test_up_requires_both() {
        let row = row();
        assert!(row.wants_up(80.0, 650.0));
        assert!(row.wants_up(70.0, 600.0));
        assert!(!row.wants_up(80.0, 550.0));
        assert!(!row.wants_up(60.0, 650.0));
    }

    #[test]
    fn test_down_requires_either() {
        let row = row();
        assert!(row.wants_down(40.0, 500.0));
        assert!(row.wants_down(90.0, 300.0));
        assert!(row.wants_down(50.0, 400.0));
        assert!(!row.wants_down(60.0, 500.0));
    }

    #[test]
    fn test_hold_durations() {
        let row = row();
        assert_eq!(row.up_hold(), Duration::from_millis(600));
        assert_eq!(row.down_hold(), Duration::from_millis(400));
    }

    #[test]
    fn test_validate_rejects_power_above_100() {
        let mut row = row();
        row.up_power_threshold = 120.0;
        assert!(matches!(
            row.validate(),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "up_power_threshold"
        ));
    }

    #[test]
    fn test_validate_rejects_rpm_above_max() {
        let mut row = row();
        row.down_rpm_threshold = 2000.0;
        assert!(row.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan_hold() {
        let mut row = row();
        row.up_hold_seconds = f32::NAN;
        assert!(row.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_factor() {
        let row = row().with_compensation(ShiftCompensation {
            up_compensation_factor: 0.0,
            up_compensation_seconds: 1.0,
            down_compensation_factor: 0.9,
            down_compensation_seconds: 0.5,
        });
        assert!(row.validate().is_err());
    }

    #[test]
    fn test_missing_compensation_in_comfort_row() {
        let result = row().validate_row("comfort", 2, true);
        assert_eq!(result, Err(ProfileError::missing_compensation("comfort", 2)));
    }
}
