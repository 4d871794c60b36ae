//! Linux evdev record codec and background event reader.
//!
//! A kernel input record is a `timeval` followed by `u16 type`, `u16 code`
//! and `i32 value`, all in native byte order. The `timeval` is two `long`s,
//! so the record is 16 bytes on 32-bit userspace (the ev3dev brick) and
//! 24 bytes on 64-bit hosts.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::thread;

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use rover_errors::{InputError, RoverError};
use rover_scheduler::EventSource;
use tracing::{debug, info, warn};

use crate::event::RawInputEvent;

/// Size of the `type`, `code`, `value` tail shared by both layouts.
const PAYLOAD_LEN: usize = 8;

/// Record layout, determined by the width of `long` on the producing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// 32-bit `timeval`: 16-byte records.
    Compact,
    /// 64-bit `timeval`: 24-byte records.
    Wide,
}

impl RecordLayout {
    /// Layout matching this process's pointer width.
    pub const fn native() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::Wide
        } else {
            Self::Compact
        }
    }

    /// Full record size in bytes.
    pub const fn record_len(self) -> usize {
        self.timestamp_len() + PAYLOAD_LEN
    }

    const fn timestamp_len(self) -> usize {
        match self {
            Self::Compact => 8,
            Self::Wide => 16,
        }
    }
}

fn read_u16(buf: &[u8], at: usize) -> Option<u16> {
    let bytes: [u8; 2] = buf.get(at..at + 2)?.try_into().ok()?;
    Some(u16::from_ne_bytes(bytes))
}

fn read_i32(buf: &[u8], at: usize) -> Option<i32> {
    let bytes: [u8; 4] = buf.get(at..at + 4)?.try_into().ok()?;
    Some(i32::from_ne_bytes(bytes))
}

/// Decode one record. The timestamp is ignored; the control loop stamps
/// events with its own monotonic clock.
pub fn decode_record(buf: &[u8], layout: RecordLayout) -> Result<RawInputEvent, InputError> {
    let short = || InputError::ShortRecord {
        expected: layout.record_len(),
        actual: buf.len(),
    };
    let base = layout.timestamp_len();
    let kind = read_u16(buf, base).ok_or_else(short)?;
    let code = read_u16(buf, base + 2).ok_or_else(short)?;
    let value = read_i32(buf, base + 4).ok_or_else(short)?;
    Ok(RawInputEvent::new(kind, code, value))
}

/// Encode one record with a zero timestamp. Used for replay files and tests.
pub fn encode_record(event: &RawInputEvent, layout: RecordLayout) -> Vec<u8> {
    let mut buf = vec![0u8; layout.timestamp_len()];
    buf.extend_from_slice(&event.kind.to_ne_bytes());
    buf.extend_from_slice(&event.code.to_ne_bytes());
    buf.extend_from_slice(&event.value.to_ne_bytes());
    buf
}

/// Event source fed by a background reader thread.
///
/// The reader blocks on the device and forwards decoded events over a
/// channel; the control loop drains it without blocking. When the stream
/// ends the reader exits, and the source reports exhaustion once the
/// channel is drained.
#[derive(Debug)]
pub struct EvdevEventSource {
    events: Receiver<RawInputEvent>,
    exhausted: bool,
}

impl EvdevEventSource {
    /// Open an input device node such as `/dev/input/event2`.
    pub fn open(path: &Path, layout: RecordLayout) -> Result<Self, RoverError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                RoverError::from(InputError::DeviceNotFound(path.display().to_string()))
            }
            _ => RoverError::from(e),
        })?;
        info!(device = %path.display(), ?layout, "opened controller");
        Self::spawn(file, layout)
    }

    /// Start reading records from any byte stream.
    pub fn spawn<R>(reader: R, layout: RecordLayout) -> Result<Self, RoverError>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = channel::unbounded();
        thread::Builder::new()
            .name("rover-input".to_string())
            .spawn(move || read_loop(reader, layout, tx))?;
        Ok(Self {
            events: rx,
            exhausted: false,
        })
    }

    /// Source backed by an existing channel, for callers that produce
    /// events themselves.
    pub fn from_receiver(events: Receiver<RawInputEvent>) -> Self {
        Self {
            events,
            exhausted: false,
        }
    }
}

fn read_loop<R: Read>(mut reader: R, layout: RecordLayout, tx: Sender<RawInputEvent>) {
    let mut buf = vec![0u8; layout.record_len()];
    let mut forwarded: u64 = 0;
    loop {
        if let Err(e) = reader.read_exact(&mut buf) {
            match InputError::from(e) {
                InputError::StreamClosed => info!(forwarded, "controller stream closed"),
                other => warn!(error = %other, forwarded, "controller read failed"),
            }
            return;
        }
        match decode_record(&buf, layout) {
            Ok(event) if event.is_sync() => {}
            Ok(event) => {
                if tx.send(event).is_err() {
                    debug!("event receiver dropped; stopping reader");
                    return;
                }
                forwarded = forwarded.saturating_add(1);
            }
            Err(e) => warn!(error = %e, "skipping malformed record"),
        }
    }
}

impl EventSource for EvdevEventSource {
    type Event = RawInputEvent;

    fn poll_event(&mut self) -> Option<RawInputEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.exhausted = true;
                None
            }
        }
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
