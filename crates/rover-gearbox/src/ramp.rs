//! Post-shift power compensation ramp.

use std::time::Duration;

use crate::NEUTRAL_COMPENSATION;

/// Linear ramp of the power compensation multiplier back to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompensationRamp {
    start_time: Duration,
    start_factor: f32,
    duration: Duration,
}

/// One evaluation of a ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampSample {
    /// Compensation multiplier to apply.
    pub factor: f32,
    /// The ramp has reached 1.0 and should be dropped.
    pub finished: bool,
}

impl CompensationRamp {
    /// Start a ramp at `start_time` from `start_factor`.
    pub const fn start(start_time: Duration, start_factor: f32, duration: Duration) -> Self {
        Self {
            start_time,
            start_factor,
            duration,
        }
    }

    /// When the ramp started.
    pub const fn start_time(&self) -> Duration {
        self.start_time
    }

    /// Multiplier at the start of the ramp.
    pub const fn start_factor(&self) -> f32 {
        self.start_factor
    }

    /// Total ramp length.
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Evaluate the ramp at `now`.
    ///
    /// Interpolates linearly from the start factor toward 1.0 and reports
    /// exactly 1.0 once the full duration has elapsed. Times before the
    /// start evaluate as the start factor.
    pub fn sample(&self, now: Duration) -> RampSample {
        let elapsed = now.saturating_sub(self.start_time);
        if elapsed >= self.duration {
            return RampSample {
                factor: NEUTRAL_COMPENSATION,
                finished: true,
            };
        }
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let start = f64::from(self.start_factor);
        let factor = start + (f64::from(NEUTRAL_COMPENSATION) - start) * progress;
        RampSample {
            factor: factor as f32,
            finished: false,
        }
    }
}
