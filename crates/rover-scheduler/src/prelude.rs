//! Prelude module for convenient imports.

pub use crate::{
    clock::{Clock, ManualClock, MonotonicClock},
    metrics::LoopMetrics,
    scheduler::{ControlHandler, ControlScheduler, EventSource, Step},
};
