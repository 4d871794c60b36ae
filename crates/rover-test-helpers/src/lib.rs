//! Shared test utilities for the rover workspace.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`assertions`] - Float assertion macro
//! - [`mock`] - Recording actuators, scripted telemetry and event sources
//! - [`fixtures`] - Profile tables, drive states and controller events
//! - [`prelude`] - Convenience re-exports
//!
//! ```rust,ignore
//! use rover_test_helpers::prelude::*;
//! ```

#![allow(clippy::unwrap_used, clippy::panic)]

pub mod assertions;
pub mod fixtures;
pub mod mock;
pub mod must;
pub mod prelude;

pub use must::*;
