//! Controller families.

use std::str::FromStr;

use rover_errors::ValidationError;
use serde::{Deserialize, Serialize};

use crate::event::codes;

/// Gamepad family, which fixes the raw axis range and trigger encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerFamily {
    /// Xbox-style pad: 16-bit sticks, right trigger on `ABS_RZ`.
    #[default]
    Xbox,
    /// PlayStation-style pad: 8-bit sticks, R2 on `ABS_RZ` equivalent code 5.
    #[serde(alias = "ps", alias = "dualshock")]
    PlayStation,
}

impl ControllerFamily {
    /// Largest raw stick reading.
    pub const fn axis_max(self) -> u32 {
        match self {
            Self::Xbox => 65_535,
            Self::PlayStation => 255,
        }
    }

    /// Absolute axis code carrying the throttle-boost trigger.
    pub const fn trigger_code(self) -> u16 {
        match self {
            Self::Xbox => codes::ABS_XBOX_RIGHT_TRIGGER,
            Self::PlayStation => codes::ABS_PS_R2,
        }
    }

    /// Divisor mapping a raw trigger reading onto `0.0..=1.0`.
    pub const fn trigger_divisor(self) -> f32 {
        match self {
            Self::Xbox => 1024.0,
            Self::PlayStation => 256.0,
        }
    }

    /// Scale a raw trigger reading into a boost fraction in `0.0..=1.0`.
    pub fn trigger_fraction(self, raw: i32) -> f32 {
        let raw = raw.max(0) as f32;
        (raw / self.trigger_divisor()).clamp(0.0, 1.0)
    }

    /// Short lowercase name, as used in configuration.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Xbox => "xbox",
            Self::PlayStation => "playstation",
        }
    }
}

impl std::fmt::Display for ControllerFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControllerFamily {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xbox" => Ok(Self::Xbox),
            "playstation" | "ps" | "dualshock" => Ok(Self::PlayStation),
            _ => Err(ValidationError::invalid_enum(
                "controller family",
                s,
                "xbox, playstation",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_ranges() {
        assert_eq!(ControllerFamily::Xbox.axis_max(), 65_535);
        assert_eq!(ControllerFamily::PlayStation.axis_max(), 255);
    }

    #[test]
    fn test_trigger_fraction_is_clamped() {
        let xbox = ControllerFamily::Xbox;
        assert!((xbox.trigger_fraction(512) - 0.5).abs() < 1e-6);
        assert!((xbox.trigger_fraction(4096) - 1.0).abs() < 1e-6);
        assert!(xbox.trigger_fraction(-20).abs() < 1e-6);

        let ps = ControllerFamily::PlayStation;
        assert!((ps.trigger_fraction(255) - 255.0 / 256.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_family_names() -> Result<(), ValidationError> {
        assert_eq!("xbox".parse::<ControllerFamily>()?, ControllerFamily::Xbox);
        assert_eq!(" PS ".parse::<ControllerFamily>()?, ControllerFamily::PlayStation);
        assert_eq!(
            ControllerFamily::PlayStation.name().parse::<ControllerFamily>()?,
            ControllerFamily::PlayStation
        );
        assert!(matches!("nes".parse::<ControllerFamily>(), Err(_)));
        Ok(())
    }

    #[test]
    fn test_trigger_codes_differ() {
        assert_ne!(
            ControllerFamily::Xbox.trigger_code(),
            ControllerFamily::PlayStation.trigger_code()
        );
    }
}
