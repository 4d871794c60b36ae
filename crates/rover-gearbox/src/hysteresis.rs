//! Hold timers for the up-shift and down-shift conditions.

use std::time::Duration;

/// Tracks how long a condition has held continuously.
///
/// `since` is `None` while the condition is false and otherwise records the
/// first observation of the current unbroken run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoldTimer {
    since: Option<Duration>,
}

impl HoldTimer {
    /// A timer that is not accumulating.
    pub const fn idle() -> Self {
        Self { since: None }
    }

    /// Feed one observation and return how long the condition has held.
    ///
    /// A false observation stops accumulation and returns `None`.
    pub fn observe(&mut self, condition: bool, now: Duration) -> Option<Duration> {
        if !condition {
            self.since = None;
            return None;
        }
        let since = *self.since.get_or_insert(now);
        Some(now.saturating_sub(since))
    }

    /// True once the condition has held for at least `hold`.
    pub fn held_for(&mut self, condition: bool, now: Duration, hold: Duration) -> bool {
        self.observe(condition, now).is_some_and(|held| held >= hold)
    }

    /// Start of the current run, if accumulating.
    pub const fn since(&self) -> Option<Duration> {
        self.since
    }

    /// Stop accumulating.
    pub fn reset(&mut self) {
        self.since = None;
    }
}

/// The pair of hold timers the automatic gearbox keeps between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HysteresisTimers {
    /// Up-shift condition timer.
    pub up: HoldTimer,
    /// Down-shift condition timer.
    pub down: HoldTimer,
}

impl HysteresisTimers {
    /// Both timers idle.
    pub const fn new() -> Self {
        Self {
            up: HoldTimer::idle(),
            down: HoldTimer::idle(),
        }
    }

    /// When the up condition started holding.
    pub const fn gear_up_since(&self) -> Option<Duration> {
        self.up.since()
    }

    /// When the down condition started holding.
    pub const fn gear_down_since(&self) -> Option<Duration> {
        self.down.since()
    }

    /// Reset both timers. Called on every gear change and mode switch.
    pub fn reset(&mut self) {
        self.up.reset();
        self.down.reset();
    }

    /// True when neither timer is accumulating.
    pub const fn is_idle(&self) -> bool {
        self.up.since.is_none() && self.down.since.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_first_observation_starts_run() {
        let mut timer = HoldTimer::idle();
        assert_eq!(timer.observe(true, ms(100)), Some(Duration::ZERO));
        assert_eq!(timer.since(), Some(ms(100)));
        assert_eq!(timer.observe(true, ms(350)), Some(ms(250)));
    }

    #[test]
    fn test_false_observation_resets() {
        let mut timer = HoldTimer::idle();
        timer.observe(true, ms(0));
        assert_eq!(timer.observe(false, ms(10)), None);
        assert_eq!(timer.since(), None);
        assert_eq!(timer.observe(true, ms(20)), Some(Duration::ZERO));
    }

    #[test]
    fn test_held_for_is_inclusive() {
        let mut timer = HoldTimer::idle();
        assert!(!timer.held_for(true, ms(0), ms(600)));
        assert!(!timer.held_for(true, ms(590), ms(600)));
        assert!(timer.held_for(true, ms(600), ms(600)));
    }

    #[test]
    fn test_zero_hold_fires_immediately() {
        let mut timer = HoldTimer::idle();
        assert!(timer.held_for(true, ms(5), Duration::ZERO));
    }

    #[test]
    fn test_reset_both() {
        let mut timers = HysteresisTimers::new();
        timers.up.observe(true, ms(1));
        timers.down.observe(true, ms(2));
        assert!(!timers.is_idle());

        timers.reset();

        assert!(timers.is_idle());
        assert_eq!(timers.gear_up_since(), None);
        assert_eq!(timers.gear_down_since(), None);
    }
}
