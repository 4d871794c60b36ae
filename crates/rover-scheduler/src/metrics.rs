//! Control loop metrics.
//!
//! Counts serviced events and idle ticks and tracks how far each idle sleep
//! overshot the configured interval. Oversleep directly widens the timing
//! error of the hysteresis timers, so it is worth watching on slow bricks.

/// Control loop metrics collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopMetrics {
    /// Number of input events serviced
    pub events_handled: u64,

    /// Number of idle ticks (controller ticks plus sleep)
    pub idle_ticks: u64,

    /// Maximum observed oversleep in nanoseconds
    pub max_oversleep_ns: u64,

    /// Last observed oversleep in nanoseconds
    pub last_oversleep_ns: u64,

    /// Running sum of oversleep for the mean
    oversleep_sum_ns: u128,
}

impl LoopMetrics {
    /// Create an empty metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one serviced input event.
    #[inline]
    pub fn record_event(&mut self) {
        self.events_handled = self.events_handled.saturating_add(1);
    }

    /// Record one idle tick and how long its sleep overshot the interval.
    #[inline]
    pub fn record_idle(&mut self, oversleep_ns: u64) {
        self.idle_ticks = self.idle_ticks.saturating_add(1);
        self.max_oversleep_ns = self.max_oversleep_ns.max(oversleep_ns);
        self.last_oversleep_ns = oversleep_ns;
        self.oversleep_sum_ns = self.oversleep_sum_ns.saturating_add(u128::from(oversleep_ns));
    }

    /// Mean oversleep in nanoseconds, or 0 before the first idle tick.
    pub fn mean_oversleep_ns(&self) -> f64 {
        if self.idle_ticks == 0 {
            return 0.0;
        }
        self.oversleep_sum_ns as f64 / self.idle_ticks as f64
    }

    /// Share of iterations that serviced an input event.
    pub fn event_ratio(&self) -> f64 {
        let total = self.events_handled.saturating_add(self.idle_ticks);
        if total == 0 {
            return 0.0;
        }
        self.events_handled as f64 / total as f64
    }

    /// Reset all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
