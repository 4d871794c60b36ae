//! Centralized error types for the rover drive controller
//!
//! The control path itself never fails: setters and gearbox ticks are total.
//! Errors only exist at the edges of the system, so the taxonomy is narrow:
//!
//! - [`profile`]: malformed gear profile tables, rejected at startup
//! - [`validation`]: generic range and constraint violations
//! - [`input`]: raw input event stream decoding and disconnects
//! - [`common`]: the top-level [`RoverError`] wrapping everything else
//!
//! # Example
//!
//! ```
//! use rover_errors::prelude::*;
//!
//! fn check_interval(ms: u64) -> Result<u64> {
//!     if ms == 0 {
//!         return Err(ValidationError::out_of_range("idle_interval_ms", ms, 1, 100).into());
//!     }
//!     Ok(ms)
//! }
//!
//! assert!(check_interval(0).is_err());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod common;
pub mod input;
pub mod prelude;
pub mod profile;
pub mod validation;

pub use common::{ErrorCategory, ErrorSeverity, RoverError};
pub use input::InputError;
pub use profile::ProfileError;
pub use validation::ValidationError;

/// A specialized `Result` type for rover operations.
pub type Result<T> = std::result::Result<T, RoverError>;
