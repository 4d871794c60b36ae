//! Gamepad input for the rover.
//!
//! Turns raw controller events into the normalized values the drivetrain
//! consumes:
//!
//! - [`ControllerFamily`]: per-family axis range and trigger encoding
//! - [`StickNormalizer`]: raw axis reading to a symmetric percentage with a
//!   center dead zone
//! - [`RawInputEvent`] and the [`evdev`] record codec
//! - [`EvdevEventSource`]: background reader feeding the control loop
//!
//! # Example
//!
//! ```
//! use rover_input::{normalize_stick, ControllerFamily};
//!
//! assert_eq!(normalize_stick(32768, ControllerFamily::Xbox), 0.0);
//! assert_eq!(normalize_stick(65535, ControllerFamily::Xbox), 100.0);
//! assert_eq!(normalize_stick(0, ControllerFamily::PlayStation), -100.0);
//! ```

#![deny(clippy::unwrap_used)]
#![deny(unused_must_use)]

pub mod event;
pub mod evdev;
pub mod family;
pub mod normalize;

pub use event::{RawInputEvent, codes};
pub use evdev::{EvdevEventSource, RecordLayout, decode_record, encode_record};
pub use family::ControllerFamily;
pub use normalize::{DEFAULT_DEADZONE_PERCENT, StickNormalizer, normalize_stick};
