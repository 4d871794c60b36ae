//! Busy-poll control loop with an injectable monotonic clock.
//!
//! The rover runs a single cooperative control thread. Each iteration polls
//! for a pending input event without blocking; when there is none it runs one
//! idle step (the gearbox controller tick) and sleeps for a short fixed
//! interval. That interval is the control loop's tick period.
//!
//! - **Clock**: monotonic time source, swapped for [`ManualClock`] in tests
//! - **ControlScheduler**: the poll / handle / idle / sleep loop
//! - **LoopMetrics**: event and idle counters with oversleep tracking
//!
//! # Example
//!
//! ```
//! use std::collections::VecDeque;
//! use std::time::Duration;
//! use rover_scheduler::{ControlHandler, ControlScheduler, EventSource, ManualClock, Step};
//!
//! struct Queue(VecDeque<u8>);
//!
//! impl EventSource for Queue {
//!     type Event = u8;
//!     fn poll_event(&mut self) -> Option<u8> {
//!         self.0.pop_front()
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Counter { events: u32, idles: u32 }
//!
//! impl ControlHandler<u8> for Counter {
//!     fn handle_event(&mut self, _event: u8, _now: Duration) { self.events += 1; }
//!     fn handle_idle(&mut self, _now: Duration) { self.idles += 1; }
//! }
//!
//! let mut scheduler = ControlScheduler::new(ManualClock::new(), Duration::from_millis(10));
//! let mut source = Queue(VecDeque::from([1, 2]));
//! let mut handler = Counter::default();
//!
//! assert_eq!(scheduler.step(&mut source, &mut handler), Step::Event);
//! assert_eq!(scheduler.step(&mut source, &mut handler), Step::Event);
//! assert_eq!(scheduler.step(&mut source, &mut handler), Step::Idle);
//! assert_eq!(handler.idles, 1);
//! ```

#![deny(clippy::unwrap_used)]
#![deny(unused_must_use)]

pub mod clock;
pub mod metrics;
pub mod prelude;
pub mod scheduler;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use metrics::LoopMetrics;
pub use scheduler::{ControlHandler, ControlScheduler, EventSource, Step};

/// Default idle interval between controller ticks (10ms).
pub const DEFAULT_IDLE_INTERVAL_MS: u64 = 10;
