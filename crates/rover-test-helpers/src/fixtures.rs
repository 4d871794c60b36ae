//! Ready-made profiles, drive states and controller events.

use rover_drivetrain::{AutoGearbox, DriveGeometry, DriveState, MotorCount, PropulsionUpdate};
use rover_gearbox::{GearProfile, GearTable, GearboxMode, GearboxProfiles, ShiftCompensation};
use rover_input::{ControllerFamily, RawInputEvent, codes};

use crate::mock::RecordingActuators;
use crate::must;

/// Reference Sport/Comfort tables.
pub fn reference_profiles() -> GearboxProfiles {
    GearboxProfiles::default()
}

/// A minimal two-speed gearbox with round numbers, handy for timing tests.
pub fn two_speed_profiles() -> GearboxProfiles {
    let first = GearProfile {
        max_rpm: 1000.0,
        up_power_threshold: 50.0,
        up_rpm_threshold: 500.0,
        up_hold_seconds: 0.5,
        down_power_threshold: 0.0,
        down_rpm_threshold: 0.0,
        down_hold_seconds: 0.5,
        compensation: None,
    };
    let second = GearProfile {
        max_rpm: 1000.0,
        up_power_threshold: 100.0,
        up_rpm_threshold: 1000.0,
        up_hold_seconds: 0.5,
        down_power_threshold: 30.0,
        down_rpm_threshold: 300.0,
        down_hold_seconds: 0.5,
        compensation: None,
    };
    GearboxProfiles {
        sport: GearTable::new(vec![first, second]),
        comfort: GearTable::new(vec![
            first.with_compensation(ShiftCompensation {
                up_compensation_factor: 0.5,
                up_compensation_seconds: 1.0,
                down_compensation_factor: 1.0,
                down_compensation_seconds: 0.5,
            }),
            second.with_compensation(ShiftCompensation {
                up_compensation_factor: 1.0,
                up_compensation_seconds: 0.5,
                down_compensation_factor: 0.5,
                down_compensation_seconds: 1.0,
            }),
        ]),
    }
}

/// Validated controller in `mode` using `profiles`.
#[track_caller]
pub fn auto_gearbox(profiles: GearboxProfiles, mode: GearboxMode) -> AutoGearbox {
    must(AutoGearbox::new(profiles, mode))
}

/// Dual-motor drive state with default geometry and a recording sink.
pub fn recording_drive(top_gear: u8) -> (DriveState<RecordingActuators>, RecordingActuators) {
    let recorder = RecordingActuators::new();
    let drive = DriveState::new(
        recorder.clone(),
        DriveGeometry::default(),
        top_gear,
        MotorCount::Dual,
    );
    (drive, recorder)
}

/// Drive state in `gear` with `power` requested.
pub fn cruising_drive(
    top_gear: u8,
    gear: u8,
    power: f32,
) -> (DriveState<RecordingActuators>, RecordingActuators) {
    let (mut drive, recorder) = recording_drive(top_gear);
    drive.set_gear(gear);
    drive.set_propulsion(PropulsionUpdate::power(power));
    recorder.clear();
    (drive, recorder)
}

/// Left stick vertical axis event.
pub fn stick_y(raw: i32) -> RawInputEvent {
    RawInputEvent::axis(codes::ABS_Y, raw)
}

/// Left stick horizontal axis event.
pub fn stick_x(raw: i32) -> RawInputEvent {
    RawInputEvent::axis(codes::ABS_X, raw)
}

/// Right trigger event for `family`.
pub fn trigger(family: ControllerFamily, raw: i32) -> RawInputEvent {
    RawInputEvent::axis(family.trigger_code(), raw)
}

/// Raw reading at full forward or backward deflection for `family`.
pub fn full_stick(family: ControllerFamily, positive: bool) -> i32 {
    if positive {
        i32::try_from(family.axis_max()).unwrap_or(i32::MAX)
    } else {
        0
    }
}

/// Raw reading at the stick's rest position for `family`.
pub fn centered_stick(family: ControllerFamily) -> i32 {
    i32::try_from(family.axis_max() / 2 + 1).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_speed_profiles_validate() {
        assert!(two_speed_profiles().validate().is_ok());
    }

    #[test]
    fn test_cruising_drive_starts_with_clean_log() {
        let (drive, recorder) = cruising_drive(4, 2, 40.0);
        assert_eq!(drive.gear(), 2);
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_centered_stick() {
        assert_eq!(centered_stick(ControllerFamily::Xbox), 32_768);
        assert_eq!(centered_stick(ControllerFamily::PlayStation), 128);
    }
}
