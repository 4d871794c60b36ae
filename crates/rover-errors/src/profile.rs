//! Gear profile table errors.
//!
//! Profile tables are configuration. A malformed table is a wiring fault and
//! is reported once, during startup, never from inside the control loop.

use crate::common::ErrorSeverity;
use crate::validation::ValidationError;

/// Gear profile validation errors.
///
/// # Examples
///
/// ```
/// use rover_errors::{ErrorSeverity, ProfileError};
///
/// let err = ProfileError::gear_count_mismatch(4, 3);
/// assert_eq!(err.severity(), ErrorSeverity::Error);
/// assert!(err.to_string().contains("sport has 4"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    /// Table has no gears at all
    #[error("Gear table '{0}' has no gears")]
    EmptyTable(String),

    /// Table has more gears than the gearbox supports
    #[error("Gear table '{table}' has {count} gears (max: {max})")]
    TooManyGears {
        /// Table name
        table: String,
        /// Number of rows found
        count: usize,
        /// Maximum supported rows
        max: usize,
    },

    /// Sport and Comfort tables describe different gearboxes
    #[error("Gear tables disagree on gear count: sport has {sport}, comfort has {comfort}")]
    GearCountMismatch {
        /// Rows in the Sport table
        sport: usize,
        /// Rows in the Comfort table
        comfort: usize,
    },

    /// Comfort row without post-shift compensation
    #[error("Gear {gear} of table '{table}' has no shift compensation")]
    MissingCompensation {
        /// Table name
        table: String,
        /// 1-based gear number
        gear: usize,
    },

    /// A threshold or factor is outside its allowed range
    #[error("Gear {gear} of table '{table}': {source}")]
    InvalidValue {
        /// Table name
        table: String,
        /// 1-based gear number
        gear: usize,
        /// The range violation
        #[source]
        source: ValidationError,
    },

    /// Gear index outside `[1, N]`
    #[error("Gear {gear} is out of bounds (gearbox has {max} gears)")]
    GearOutOfBounds {
        /// Requested gear
        gear: u8,
        /// Number of gears
        max: u8,
    },
}

impl ProfileError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ProfileError::GearOutOfBounds { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Create a gear count mismatch error.
    pub fn gear_count_mismatch(sport: usize, comfort: usize) -> Self {
        ProfileError::GearCountMismatch { sport, comfort }
    }

    /// Create an invalid value error for one row of a table.
    pub fn invalid_value(table: impl Into<String>, gear: usize, source: ValidationError) -> Self {
        ProfileError::InvalidValue {
            table: table.into(),
            gear,
            source,
        }
    }

    /// Create an out-of-bounds error for a requested gear.
    pub fn gear_out_of_bounds(gear: u8, max: u8) -> Self {
        ProfileError::GearOutOfBounds { gear, max }
    }

    /// Create a missing compensation error.
    pub fn missing_compensation(table: impl Into<String>, gear: usize) -> Self {
        ProfileError::MissingCompensation {
            table: table.into(),
            gear,
        }
    }
}
