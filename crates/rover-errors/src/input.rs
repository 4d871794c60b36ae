//! Input event stream errors.

use crate::common::ErrorSeverity;

/// Errors raised while acquiring controller events.
///
/// Decoding happens on the reader side; the control loop only ever sees
/// fully decoded events or an exhausted source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Buffer is shorter than one event record
    #[error("Event record truncated: expected {expected} bytes, got {actual}")]
    ShortRecord {
        /// Record size for the active layout
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// The controller device node does not exist
    #[error("Controller device not found: {0}")]
    DeviceNotFound(String),

    /// The controller stream ended (device unplugged or EOF)
    #[error("Controller event stream closed")]
    StreamClosed,

    /// Reading from the device failed
    #[error("Failed to read controller events: {0}")]
    ReadFailed(String),
}

impl InputError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            InputError::ShortRecord { .. } => ErrorSeverity::Warning,
            InputError::DeviceNotFound(_)
            | InputError::StreamClosed
            | InputError::ReadFailed(_) => ErrorSeverity::Critical,
        }
    }
}

impl From<std::io::Error> for InputError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => InputError::StreamClosed,
            _ => InputError::ReadFailed(e.to_string()),
        }
    }
}
