//! Exit codes for roverctl

use rover_errors::{ErrorCategory, ErrorSeverity, InputError, RoverError};

/// Controller device could not be opened.
pub const EXIT_DEVICE_NOT_FOUND: u8 = 2;

/// Configuration or profile tables were rejected.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Anything else.
pub const EXIT_FAILURE: u8 = 1;

/// Process exit code for a failed command.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    let Some(rover) = error.chain().find_map(|e| e.downcast_ref::<RoverError>()) else {
        return EXIT_FAILURE;
    };
    match rover {
        RoverError::Input(InputError::DeviceNotFound(_)) => EXIT_DEVICE_NOT_FOUND,
        other => match other.category() {
            ErrorCategory::Validation | ErrorCategory::Profile | ErrorCategory::Config => {
                EXIT_INVALID_CONFIG
            }
            _ => EXIT_FAILURE,
        },
    }
}

/// Short machine-readable name for the error kind.
pub fn error_type_name(error: &anyhow::Error) -> String {
    error
        .chain()
        .find_map(|e| e.downcast_ref::<RoverError>())
        .map_or_else(|| "Other".to_string(), |e| e.category().to_string())
}

/// Severity of the first rover error in the chain; anything else is a plain error.
pub fn error_severity(error: &anyhow::Error) -> ErrorSeverity {
    error
        .chain()
        .find_map(|e| e.downcast_ref::<RoverError>())
        .map_or(ErrorSeverity::Error, RoverError::severity)
}
