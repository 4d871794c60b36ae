//! Gear tables and the Sport/Comfort profile pair.

use std::fmt;
use std::time::Duration;

use rover_errors::ProfileError;
use serde::{Deserialize, Serialize};

use crate::MAX_GEARS;
use crate::mode::DrivingCharacter;
use crate::profile::{GearProfile, ShiftCompensation};

/// Ordered shift thresholds, one row per gear starting at gear 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GearTable {
    rows: Vec<GearProfile>,
}

impl GearTable {
    /// Create a table from rows ordered by gear.
    pub fn new(rows: Vec<GearProfile>) -> Self {
        Self { rows }
    }

    /// Number of gears.
    pub fn gear_count(&self) -> usize {
        self.rows.len()
    }

    /// Highest gear number, or 0 for an empty table.
    pub fn top_gear(&self) -> u8 {
        u8::try_from(self.rows.len()).unwrap_or(u8::MAX)
    }

    /// Row for a 1-based gear number.
    pub fn row(&self, gear: u8) -> Option<&GearProfile> {
        let index = usize::from(gear).checked_sub(1)?;
        self.rows.get(index)
    }

    /// Rows in gear order.
    pub fn rows(&self) -> &[GearProfile] {
        &self.rows
    }

    /// Validate row count and every row's values.
    pub fn validate(&self, name: &str, require_compensation: bool) -> Result<(), ProfileError> {
        if self.rows.is_empty() {
            return Err(ProfileError::EmptyTable(name.to_string()));
        }
        if self.rows.len() > MAX_GEARS {
            return Err(ProfileError::TooManyGears {
                table: name.to_string(),
                count: self.rows.len(),
                max: MAX_GEARS,
            });
        }
        for (index, row) in self.rows.iter().enumerate() {
            row.validate_row(name, index + 1, require_compensation)?;
        }
        Ok(())
    }
}

impl fmt::Display for GearTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "gear  max_rpm | up: power   rpm  hold | down: power   rpm  hold | ramp up    ramp down"
        )?;
        for (index, row) in self.rows.iter().enumerate() {
            write!(
                f,
                "{:>4} {:>8.0} | {:>9.0} {:>5.0} {:>4.1}s | {:>11.0} {:>5.0} {:>4.1}s |",
                index + 1,
                row.max_rpm,
                row.up_power_threshold,
                row.up_rpm_threshold,
                row.up_hold_seconds,
                row.down_power_threshold,
                row.down_rpm_threshold,
                row.down_hold_seconds,
            )?;
            match &row.compensation {
                Some(c) => writeln!(
                    f,
                    " {:.2}/{:.1}s  {:.2}/{:.1}s",
                    c.up_compensation_factor,
                    c.up_compensation_seconds,
                    c.down_compensation_factor,
                    c.down_compensation_seconds,
                )?,
                None => writeln!(f, " -          -")?,
            }
        }
        Ok(())
    }
}

/// The two tables consulted by the automatic modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearboxProfiles {
    /// Aggressive thresholds.
    pub sport: GearTable,
    /// Smooth thresholds with compensation ramps.
    pub comfort: GearTable,
}

impl GearboxProfiles {
    /// Table for a driving character.
    pub fn table(&self, character: DrivingCharacter) -> &GearTable {
        match character {
            DrivingCharacter::Sport => &self.sport,
            DrivingCharacter::Comfort => &self.comfort,
        }
    }

    /// Number of gears, shared by both tables once validated.
    pub fn gear_count(&self) -> usize {
        self.sport.gear_count()
    }

    /// Highest gear number.
    pub fn top_gear(&self) -> u8 {
        self.sport.top_gear()
    }

    /// Validate both tables and check they describe the same gearbox.
    pub fn validate(&self) -> Result<(), ProfileError> {
        self.sport.validate(DrivingCharacter::Sport.name(), false)?;
        self.comfort.validate(DrivingCharacter::Comfort.name(), true)?;
        if self.sport.gear_count() != self.comfort.gear_count() {
            return Err(ProfileError::gear_count_mismatch(
                self.sport.gear_count(),
                self.comfort.gear_count(),
            ));
        }
        Ok(())
    }

    /// Shortest hold or compensation time across both tables, if any.
    ///
    /// The control loop tick has to stay well below this for hold timing
    /// and ramp sampling to be meaningful.
    pub fn shortest_timing(&self) -> Option<Duration> {
        self.sport
            .rows()
            .iter()
            .chain(self.comfort.rows())
            .flat_map(|row| {
                let ramps = row
                    .compensation
                    .map(|c| [c.up_duration(), c.down_duration()]);
                [row.up_hold(), row.down_hold()]
                    .into_iter()
                    .chain(ramps.into_iter().flatten())
            })
            .min()
    }

    /// Reference Sport table for the four-speed rover gearbox.
    pub fn reference_sport() -> GearTable {
        GearTable::new(vec![
            GearProfile {
                max_rpm: 1050.0,
                up_power_threshold: 70.0,
                up_rpm_threshold: 600.0,
                up_hold_seconds: 0.6,
                down_power_threshold: 0.0,
                down_rpm_threshold: 0.0,
                down_hold_seconds: 0.3,
                compensation: None,
            },
            GearProfile {
                max_rpm: 1050.0,
                up_power_threshold: 75.0,
                up_rpm_threshold: 650.0,
                up_hold_seconds: 0.5,
                down_power_threshold: 50.0,
                down_rpm_threshold: 400.0,
                down_hold_seconds: 0.4,
                compensation: None,
            },
            GearProfile {
                max_rpm: 1050.0,
                up_power_threshold: 80.0,
                up_rpm_threshold: 700.0,
                up_hold_seconds: 0.5,
                down_power_threshold: 55.0,
                down_rpm_threshold: 380.0,
                down_hold_seconds: 0.4,
                compensation: None,
            },
            GearProfile {
                max_rpm: 1050.0,
                up_power_threshold: 100.0,
                up_rpm_threshold: 1050.0,
                up_hold_seconds: 0.5,
                down_power_threshold: 60.0,
                down_rpm_threshold: 350.0,
                down_hold_seconds: 0.4,
                compensation: None,
            },
        ])
    }

    /// Reference Comfort table for the four-speed rover gearbox.
    pub fn reference_comfort() -> GearTable {
        GearTable::new(vec![
            GearProfile {
                max_rpm: 1050.0,
                up_power_threshold: 60.0,
                up_rpm_threshold: 550.0,
                up_hold_seconds: 0.8,
                down_power_threshold: 0.0,
                down_rpm_threshold: 0.0,
                down_hold_seconds: 0.6,
                compensation: Some(ShiftCompensation {
                    up_compensation_factor: 0.8,
                    up_compensation_seconds: 1.0,
                    down_compensation_factor: 1.0,
                    down_compensation_seconds: 0.3,
                }),
            },
            GearProfile {
                max_rpm: 1050.0,
                up_power_threshold: 65.0,
                up_rpm_threshold: 600.0,
                up_hold_seconds: 0.8,
                down_power_threshold: 45.0,
                down_rpm_threshold: 380.0,
                down_hold_seconds: 0.6,
                compensation: Some(ShiftCompensation {
                    up_compensation_factor: 0.8,
                    up_compensation_seconds: 1.0,
                    down_compensation_factor: 0.85,
                    down_compensation_seconds: 0.8,
                }),
            },
            GearProfile {
                max_rpm: 1050.0,
                up_power_threshold: 70.0,
                up_rpm_threshold: 620.0,
                up_hold_seconds: 0.8,
                down_power_threshold: 50.0,
                down_rpm_threshold: 360.0,
                down_hold_seconds: 0.6,
                compensation: Some(ShiftCompensation {
                    up_compensation_factor: 0.85,
                    up_compensation_seconds: 1.0,
                    down_compensation_factor: 0.85,
                    down_compensation_seconds: 0.8,
                }),
            },
            GearProfile {
                max_rpm: 1050.0,
                up_power_threshold: 100.0,
                up_rpm_threshold: 1050.0,
                up_hold_seconds: 0.8,
                down_power_threshold: 55.0,
                down_rpm_threshold: 340.0,
                down_hold_seconds: 0.6,
                compensation: Some(ShiftCompensation {
                    up_compensation_factor: 1.0,
                    up_compensation_seconds: 0.3,
                    down_compensation_factor: 0.85,
                    down_compensation_seconds: 0.8,
                }),
            },
        ])
    }
}

impl Default for GearboxProfiles {
    fn default() -> Self {
        Self {
            sport: Self::reference_sport(),
            comfort: Self::reference_comfort(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_profiles_are_valid() -> Result<(), ProfileError> {
        GearboxProfiles::default().validate()
    }

    #[test]
    fn test_row_lookup_is_one_based() {
        let table = GearboxProfiles::reference_sport();
        assert_eq!(table.row(0), None);
        assert!(table.row(1).is_some_and(|r| (r.up_power_threshold - 70.0).abs() < f32::EPSILON));
        assert!(table.row(4).is_some_and(|r| (r.up_power_threshold - 100.0).abs() < f32::EPSILON));
        assert_eq!(table.row(5), None);
    }

    #[test]
    fn test_empty_table_rejected() {
        let profiles = GearboxProfiles {
            sport: GearTable::new(Vec::new()),
            comfort: GearboxProfiles::reference_comfort(),
        };
        assert_eq!(
            profiles.validate(),
            Err(ProfileError::EmptyTable("sport".to_string()))
        );
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let mut comfort = GearboxProfiles::reference_comfort().rows().to_vec();
        comfort.pop();
        let profiles = GearboxProfiles {
            sport: GearboxProfiles::reference_sport(),
            comfort: GearTable::new(comfort),
        };
        assert_eq!(
            profiles.validate(),
            Err(ProfileError::gear_count_mismatch(4, 3))
        );
    }

    #[test]
    fn test_comfort_requires_compensation() {
        let profiles = GearboxProfiles {
            sport: GearboxProfiles::reference_sport(),
            comfort: GearboxProfiles::reference_sport(),
        };
        assert_eq!(
            profiles.validate(),
            Err(ProfileError::missing_compensation("comfort", 1))
        );
    }

    #[test]
    fn test_shortest_timing_covers_holds_and_ramps() {
        let profiles = GearboxProfiles::default();
        assert_eq!(profiles.shortest_timing(), Some(Duration::from_millis(300)));

        let empty = GearboxProfiles {
            sport: GearTable::new(Vec::new()),
            comfort: GearTable::new(Vec::new()),
        };
        assert_eq!(empty.shortest_timing(), None);
    }

    #[test]
    fn test_too_many_gears_rejected() {
        let row = GearProfile {
            max_rpm: 1000.0,
            up_power_threshold: 50.0,
            up_rpm_threshold: 500.0,
            up_hold_seconds: 0.5,
            down_power_threshold: 20.0,
            down_rpm_threshold: 200.0,
            down_hold_seconds: 0.5,
            compensation: None,
        };
        let table = GearTable::new(vec![row; MAX_GEARS + 1]);
        assert!(matches!(
            table.validate("sport", false),
            Err(ProfileError::TooManyGears { count: 9, .. })
        ));
    }
}
