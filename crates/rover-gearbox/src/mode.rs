//! Gearbox operating modes.

use std::fmt;
use std::str::FromStr;

use rover_errors::ValidationError;
use serde::{Deserialize, Serialize};

/// Which profile table an automatic mode consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrivingCharacter {
    /// Aggressive thresholds, no compensation ramp.
    Sport,
    /// Smoother thresholds with a post-shift compensation ramp.
    Comfort,
}

impl DrivingCharacter {
    /// Table name, as used in configuration and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sport => "sport",
            Self::Comfort => "comfort",
        }
    }
}

impl fmt::Display for DrivingCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gearbox operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GearboxMode {
    /// Gears change only on explicit gear-up/gear-down input.
    #[default]
    Manual,
    /// Automatic shifting with the Sport table.
    AutoSport,
    /// Automatic shifting with the Comfort table and compensation ramps.
    AutoComfort,
}

impl GearboxMode {
    /// All modes, in toggle order.
    pub const ALL: [GearboxMode; 3] = [Self::Manual, Self::AutoSport, Self::AutoComfort];

    /// True for the two automatic modes.
    pub const fn is_automatic(self) -> bool {
        !matches!(self, Self::Manual)
    }

    /// Table consulted by this mode, or `None` in Manual.
    pub const fn character(self) -> Option<DrivingCharacter> {
        match self {
            Self::Manual => None,
            Self::AutoSport => Some(DrivingCharacter::Sport),
            Self::AutoComfort => Some(DrivingCharacter::Comfort),
        }
    }

    /// True when shifts in this mode start a compensation ramp.
    pub const fn ramps_after_shift(self) -> bool {
        matches!(self, Self::AutoComfort)
    }

    /// Configuration name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::AutoSport => "auto_sport",
            Self::AutoComfort => "auto_comfort",
        }
    }
}

impl fmt::Display for GearboxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GearboxMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "manual" => Ok(Self::Manual),
            "auto_sport" | "sport" => Ok(Self::AutoSport),
            "auto_comfort" | "comfort" => Ok(Self::AutoComfort),
            _ => Err(ValidationError::invalid_enum(
                "gearbox mode",
                s,
                "manual, auto_sport, auto_comfort",
            )),
        }
    }
}
