//! Top-level error type and classification shared by all rover crates.

use core::fmt;

use crate::{InputError, ProfileError, ValidationError};

/// Top-level error type that can wrap all rover sub-errors.
#[derive(Debug, thiserror::Error)]
pub enum RoverError {
    /// Gear profile errors
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Input event stream errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Actuator backend errors (opening motors, missing ports)
    #[error("Actuator error: {0}")]
    Actuator(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RoverError {
    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            RoverError::Profile(_) => ErrorCategory::Profile,
            RoverError::Validation(_) => ErrorCategory::Validation,
            RoverError::Input(_) => ErrorCategory::Input,
            RoverError::Actuator(_) => ErrorCategory::Actuator,
            RoverError::Io(_) => ErrorCategory::IO,
            RoverError::Config(_) => ErrorCategory::Config,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RoverError::Profile(e) => e.severity(),
            RoverError::Validation(_) => ErrorSeverity::Error,
            RoverError::Input(e) => e.severity(),
            RoverError::Actuator(_) => ErrorSeverity::Critical,
            RoverError::Io(_) => ErrorSeverity::Error,
            RoverError::Config(_) => ErrorSeverity::Error,
        }
    }

    /// Create a configuration error with a message.
    pub fn config(msg: impl Into<String>) -> Self {
        RoverError::Config(msg.into())
    }

    /// Create an actuator backend error with a message.
    pub fn actuator(msg: impl Into<String>) -> Self {
        RoverError::Actuator(msg.into())
    }
}

impl From<std::io::Error> for RoverError {
    fn from(e: std::io::Error) -> Self {
        RoverError::Io(e)
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Gear profile errors
    Profile = 0,
    /// Validation errors
    Validation = 1,
    /// Input stream errors
    Input = 2,
    /// Actuator backend errors
    Actuator = 3,
    /// I/O errors
    IO = 4,
    /// Configuration errors
    Config = 5,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Profile => write!(f, "Profile"),
            ErrorCategory::Validation => write!(f, "Validation"),
            ErrorCategory::Input => write!(f, "Input"),
            ErrorCategory::Actuator => write!(f, "Actuator"),
            ErrorCategory::IO => write!(f, "IO"),
            ErrorCategory::Config => write!(f, "Config"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, may require attention
    Warning = 1,
    /// Error, operation failed
    Error = 2,
    /// Critical, the vehicle cannot be driven
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Profile.to_string(), "Profile");
        assert_eq!(ErrorCategory::Input.to_string(), "Input");
        assert_eq!(ErrorCategory::IO.to_string(), "IO");
    }

    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Critical > ErrorSeverity::Error);
        assert!(ErrorSeverity::Error > ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning > ErrorSeverity::Info);
    }

    #[test]
    fn test_rover_error_category() {
        let err: RoverError = ProfileError::EmptyTable("sport".into()).into();
        assert_eq!(err.category(), ErrorCategory::Profile);

        let err = RoverError::config("bad interval");
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_actuator_error_is_critical() {
        let err = RoverError::actuator("no motor on outA");
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
