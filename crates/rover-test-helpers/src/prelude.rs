//! Convenience re-exports.

pub use crate::assert_approx_eq;
pub use crate::fixtures::*;
pub use crate::mock::{RecordingActuators, ScriptedEvents, ScriptedTelemetry};
pub use crate::must::{must, must_parse, must_some};
