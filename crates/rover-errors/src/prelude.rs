//! Prelude module for convenient error handling imports.

pub use crate::{
    Result,
    common::{ErrorCategory, ErrorSeverity, RoverError},
    input::InputError,
    profile::ProfileError,
    validation::ValidationError,
};
