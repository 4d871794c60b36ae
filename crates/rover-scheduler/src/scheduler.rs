//! The poll / handle / idle / sleep control loop.

use std::time::Duration;

use tracing::{debug, trace};

use crate::clock::Clock;
use crate::metrics::LoopMetrics;

/// Non-blocking source of input events.
pub trait EventSource {
    /// Event type produced by this source.
    type Event;

    /// Return the next pending event, or `None` if nothing is waiting.
    ///
    /// Must never block.
    fn poll_event(&mut self) -> Option<Self::Event>;

    /// True once the source is drained and will never produce another event.
    ///
    /// Live controllers never exhaust; replayed streams do.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Receiver of the loop's two kinds of work.
pub trait ControlHandler<E> {
    /// Service one input event at loop time `now`.
    fn handle_event(&mut self, event: E, now: Duration);

    /// Run one idle step at loop time `now`. Called only when no event was
    /// pending.
    fn handle_idle(&mut self, now: Duration);
}

/// What a single loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// An input event was serviced; no sleep happened.
    Event,
    /// No event was pending; the idle step ran and the loop slept.
    Idle,
}

/// Single-threaded cooperative control loop.
///
/// Input events take priority over idle work. The idle handler runs only on
/// iterations that found no pending event, followed by one fixed sleep, so a
/// burst of stick movement delays controller ticks instead of interleaving
/// with them.
#[derive(Debug)]
pub struct ControlScheduler<C: Clock> {
    clock: C,
    idle_interval: Duration,
    metrics: LoopMetrics,
}

impl<C: Clock> ControlScheduler<C> {
    /// Create a scheduler that sleeps `idle_interval` after each idle step.
    pub fn new(clock: C, idle_interval: Duration) -> Self {
        Self {
            clock,
            idle_interval,
            metrics: LoopMetrics::new(),
        }
    }

    /// Run exactly one loop iteration.
    pub fn step<S, H>(&mut self, source: &mut S, handler: &mut H) -> Step
    where
        S: EventSource,
        H: ControlHandler<S::Event>,
    {
        if let Some(event) = source.poll_event() {
            let now = self.clock.now();
            handler.handle_event(event, now);
            self.metrics.record_event();
            return Step::Event;
        }

        let now = self.clock.now();
        handler.handle_idle(now);

        let before = self.clock.now();
        self.clock.sleep(self.idle_interval);
        let slept = self.clock.now().saturating_sub(before);
        let oversleep = slept.saturating_sub(self.idle_interval);
        let oversleep_ns = u64::try_from(oversleep.as_nanos()).unwrap_or(u64::MAX);
        self.metrics.record_idle(oversleep_ns);
        trace!(oversleep_ns, "idle tick");

        Step::Idle
    }

    /// Run until the source reports exhaustion.
    ///
    /// With a live controller this never returns; the process is stopped
    /// externally.
    pub fn run<S, H>(&mut self, source: &mut S, handler: &mut H) -> LoopMetrics
    where
        S: EventSource,
        H: ControlHandler<S::Event>,
    {
        debug!(
            idle_interval_us = self.idle_interval.as_micros() as u64,
            "control loop started"
        );
        while !source.is_exhausted() {
            self.step(source, handler);
        }
        debug!(
            events = self.metrics.events_handled,
            idle_ticks = self.metrics.idle_ticks,
            "control loop finished: event source exhausted"
        );
        self.metrics.clone()
    }

    /// Run at most `steps` iterations, stopping early if the source is
    /// exhausted.
    pub fn run_steps<S, H>(&mut self, steps: usize, source: &mut S, handler: &mut H) -> usize
    where
        S: EventSource,
        H: ControlHandler<S::Event>,
    {
        let mut done = 0;
        while done < steps && !source.is_exhausted() {
            self.step(source, handler);
            done += 1;
        }
        done
    }

    /// Configured idle interval.
    pub fn idle_interval(&self) -> Duration {
        self.idle_interval
    }

    /// Loop metrics collected so far.
    pub fn metrics(&self) -> &LoopMetrics {
        &self.metrics
    }

    /// The scheduler's clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
