//! Stick normalization.
//!
//! A raw reading in `0..=max` is centered on `(max + 1) / 2`. Readings within
//! the dead zone around the center map to exactly `0.0`; outside it the
//! remaining travel on each side is stretched linearly so that the extremes
//! land on `-100.0` and `+100.0`. The two sides are scaled separately because
//! the center sits half a count off the true middle on odd ranges.

use crate::family::ControllerFamily;

/// Dead zone half-width as a percentage of the half-range.
pub const DEFAULT_DEADZONE_PERCENT: u32 = 5;

/// Largest accepted dead zone percentage; beyond it the stick is useless.
const MAX_DEADZONE_PERCENT: u32 = 50;

/// Precomputed normalizer for one axis range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickNormalizer {
    max: u32,
    center: u32,
    deadzone: u32,
}

impl StickNormalizer {
    /// Build a normalizer for readings in `0..=max`.
    ///
    /// `deadzone_percent` is capped at 50.
    pub fn new(max: u32, deadzone_percent: u32) -> Self {
        let center = max.saturating_add(1) / 2;
        let percent = u64::from(deadzone_percent.min(MAX_DEADZONE_PERCENT));
        let deadzone = u32::try_from(u64::from(center) * percent / 100).unwrap_or(center);
        Self {
            max,
            center,
            deadzone,
        }
    }

    /// Normalizer for a controller family with the default dead zone.
    pub fn for_family(family: ControllerFamily) -> Self {
        Self::new(family.axis_max(), DEFAULT_DEADZONE_PERCENT)
    }

    /// Normalizer for a controller family with a custom dead zone.
    pub fn with_deadzone(family: ControllerFamily, deadzone_percent: u32) -> Self {
        Self::new(family.axis_max(), deadzone_percent)
    }

    /// Raw center value.
    pub fn center(&self) -> u32 {
        self.center
    }

    /// Dead zone half-width in raw counts.
    pub fn deadzone(&self) -> u32 {
        self.deadzone
    }

    /// Map a raw reading to `-100.0..=100.0`.
    ///
    /// Readings above `max` are treated as `max`.
    pub fn normalize(&self, raw: u32) -> f32 {
        let raw = i64::from(raw.min(self.max));
        let center = i64::from(self.center);
        let deadzone = i64::from(self.deadzone);
        let offset = raw - center;

        if offset.abs() < deadzone {
            return 0.0;
        }

        let (travel, span) = if offset > 0 {
            (offset - deadzone, i64::from(self.max) - center - deadzone)
        } else {
            (offset + deadzone, center - deadzone)
        };

        if span <= 0 {
            return if offset > 0 { 100.0 } else { -100.0 };
        }

        let value = travel as f64 / span as f64 * 100.0;
        (value as f32).clamp(-100.0, 100.0)
    }
}

/// Normalize a raw stick reading for `family` using the default dead zone.
///
/// ```
/// use rover_input::{normalize_stick, ControllerFamily};
///
/// // Inside the dead zone.
/// assert_eq!(normalize_stick(130, ControllerFamily::PlayStation), 0.0);
/// // Full deflection.
/// assert_eq!(normalize_stick(255, ControllerFamily::PlayStation), 100.0);
/// ```
pub fn normalize_stick(raw: u32, family: ControllerFamily) -> f32 {
    StickNormalizer::for_family(family).normalize(raw)
}
