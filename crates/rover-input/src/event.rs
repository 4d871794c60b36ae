//! Raw controller events.

use serde::{Deserialize, Serialize};

/// Linux input event type and code constants used by the rover.
pub mod codes {
    /// Synchronization marker between event batches.
    pub const EV_SYN: u16 = 0x00;
    /// Key and button events.
    pub const EV_KEY: u16 = 0x01;
    /// Absolute axis events.
    pub const EV_ABS: u16 = 0x03;

    /// Left stick, horizontal.
    pub const ABS_X: u16 = 0x00;
    /// Left stick, vertical.
    pub const ABS_Y: u16 = 0x01;
    /// PlayStation R2 trigger.
    pub const ABS_PS_R2: u16 = 0x05;
    /// Xbox right trigger.
    pub const ABS_XBOX_RIGHT_TRIGGER: u16 = 0x09;

    /// South face button (A / Cross).
    pub const BTN_A: u16 = 0x130;
    /// East face button (B / Circle).
    pub const BTN_B: u16 = 0x131;
    /// North face button on Xbox pads (X).
    pub const BTN_X: u16 = 0x133;
    /// West face button on Xbox pads (Y).
    pub const BTN_Y: u16 = 0x134;
    /// Left shoulder.
    pub const BTN_TL: u16 = 0x136;
    /// Right shoulder.
    pub const BTN_TR: u16 = 0x137;
    /// Select / Back / Share.
    pub const BTN_SELECT: u16 = 0x13a;
    /// Start / Menu / Options.
    pub const BTN_START: u16 = 0x13b;
    /// Left stick click.
    pub const BTN_THUMBL: u16 = 0x13d;
}

/// Key event value for a press. Releases are 0 and autorepeat is 2.
pub const KEY_PRESSED: i32 = 1;

/// One decoded controller event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawInputEvent {
    /// Event type (`EV_KEY`, `EV_ABS`, ...).
    pub kind: u16,
    /// Axis or button code.
    pub code: u16,
    /// Axis reading or key state.
    pub value: i32,
}

impl RawInputEvent {
    /// Create an event.
    pub const fn new(kind: u16, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }

    /// Absolute axis event.
    pub const fn axis(code: u16, value: i32) -> Self {
        Self::new(codes::EV_ABS, code, value)
    }

    /// Button press.
    pub const fn press(code: u16) -> Self {
        Self::new(codes::EV_KEY, code, KEY_PRESSED)
    }

    /// Button release.
    pub const fn release(code: u16) -> Self {
        Self::new(codes::EV_KEY, code, 0)
    }

    /// True for absolute axis events.
    pub const fn is_axis(&self) -> bool {
        self.kind == codes::EV_ABS
    }

    /// True for a key press. Releases and autorepeat are excluded.
    pub const fn is_press(&self) -> bool {
        self.kind == codes::EV_KEY && self.value == KEY_PRESSED
    }

    /// True for batch separators, which carry no controller state.
    pub const fn is_sync(&self) -> bool {
        self.kind == codes::EV_SYN
    }

    /// Axis value as an unsigned raw reading. Negative values read as 0.
    pub fn axis_reading(&self) -> u32 {
        u32::try_from(self.value).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        assert!(RawInputEvent::press(codes::BTN_TR).is_press());
        assert!(!RawInputEvent::release(codes::BTN_TR).is_press());
        assert!(!RawInputEvent::new(codes::EV_KEY, codes::BTN_TR, 2).is_press());
    }

    #[test]
    fn test_axis_reading_rejects_negative() {
        assert_eq!(RawInputEvent::axis(codes::ABS_X, -5).axis_reading(), 0);
        assert_eq!(RawInputEvent::axis(codes::ABS_X, 200).axis_reading(), 200);
    }

    #[test]
    fn test_xbox_button_codes() {
        assert_eq!(codes::BTN_X, 307);
        assert_eq!(codes::BTN_Y, 308);
        assert_eq!(codes::BTN_TL, 310);
        assert_eq!(codes::BTN_TR, 311);
    }
}
