//! Automatic gearbox controller.
//!
//! One [`AutoGearbox::tick`] per idle scheduler cycle. The controller is
//! stateless apart from its mode and profiles; the hold timers and the
//! compensation ramp live in [`DriveState`] because every gear change,
//! manual or automatic, has to reset them.

use std::time::Duration;

use rover_errors::ProfileError;
use rover_gearbox::{CompensationRamp, FIRST_GEAR, GearProfile, GearboxMode, GearboxProfiles};
use tracing::{debug, info, warn};

use crate::drive::DriveState;
use crate::ports::{ActuatorSink, TelemetrySource};

/// What one controller tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Manual mode; nothing evaluated.
    Skipped,
    /// No shift this tick.
    Held,
    /// Shifted up after the up condition held long enough.
    ShiftedUp {
        /// Gear before the shift
        from: u8,
    },
    /// Shifted down after the down condition held long enough.
    ShiftedDown {
        /// Gear before the shift
        from: u8,
    },
    /// Vehicle at a standstill with no power request; dropped to first gear.
    StallReset {
        /// Gear before the reset
        from: u8,
    },
}

impl TickOutcome {
    /// True if the tick changed gear.
    pub const fn shifted(&self) -> bool {
        matches!(
            self,
            Self::ShiftedUp { .. } | Self::ShiftedDown { .. } | Self::StallReset { .. }
        )
    }
}

fn is_zero(value: f32) -> bool {
    value.abs() < f32::EPSILON
}

/// Shift direction, used to pick ramp parameters.
#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
}

/// Hysteresis-based automatic gear selection with Comfort compensation.
#[derive(Debug, Clone)]
pub struct AutoGearbox {
    profiles: GearboxProfiles,
    mode: GearboxMode,
}

impl AutoGearbox {
    /// Create a controller after validating the profile tables.
    pub fn new(profiles: GearboxProfiles, mode: GearboxMode) -> Result<Self, ProfileError> {
        profiles.validate()?;
        Ok(Self { profiles, mode })
    }

    /// Active mode.
    pub fn mode(&self) -> GearboxMode {
        self.mode
    }

    /// Profile tables.
    pub fn profiles(&self) -> &GearboxProfiles {
        &self.profiles
    }

    /// Number of gears described by the profiles.
    pub fn top_gear(&self) -> u8 {
        self.profiles.top_gear()
    }

    /// Switch mode. A change resets the hold timers; a running compensation
    /// ramp is left to finish.
    pub fn set_mode<A: ActuatorSink>(&mut self, mode: GearboxMode, drive: &mut DriveState<A>) -> bool {
        if mode == self.mode {
            return false;
        }
        info!(from = %self.mode, mode = %mode, "gearbox mode changed");
        self.mode = mode;
        drive.reset_timers();
        true
    }

    /// Run one controller tick at loop time `now`.
    pub fn tick<A, T>(&self, drive: &mut DriveState<A>, telemetry: &T, now: Duration) -> TickOutcome
    where
        A: ActuatorSink,
        T: TelemetrySource + ?Sized,
    {
        let Some(character) = self.mode.character() else {
            return TickOutcome::Skipped;
        };

        let speed = telemetry.drive_speed().abs();
        let gear = drive.gear();

        if is_zero(drive.power_pos()) && is_zero(speed) && gear > FIRST_GEAR {
            drive.set_gear(FIRST_GEAR);
            info!(from = gear, "standstill: reset to first gear");
            return TickOutcome::StallReset { from: gear };
        }

        let Some(row) = self.profiles.table(character).row(gear).copied() else {
            warn!(gear, table = %character, "no profile row for gear");
            return TickOutcome::Held;
        };

        let power = drive.power_pos().abs();
        let wants_up = row.wants_up(power, speed) && !drive.ramp_active();
        let wants_down = row.wants_down(power, speed);

        let timers = drive.timers_mut();
        let up_due = timers.up.held_for(wants_up, now, row.up_hold());
        let down_due = timers.down.held_for(wants_down, now, row.down_hold());

        let outcome = if up_due && gear < drive.top_gear() {
            self.shift(drive, gear.saturating_add(1), &row, Direction::Up, now);
            debug!(from = gear, power, speed, "up-shift");
            TickOutcome::ShiftedUp { from: gear }
        } else if down_due && gear > FIRST_GEAR {
            self.shift(drive, gear.saturating_sub(1), &row, Direction::Down, now);
            debug!(from = gear, power, speed, "down-shift");
            TickOutcome::ShiftedDown { from: gear }
        } else {
            TickOutcome::Held
        };

        drive.advance_ramp(now);
        outcome
    }

    /// Move to `target`, starting the row's compensation ramp in the same
    /// step when the mode ramps after a shift.
    fn shift<A: ActuatorSink>(
        &self,
        drive: &mut DriveState<A>,
        target: u8,
        row: &GearProfile,
        direction: Direction,
        now: Duration,
    ) {
        match self.ramp_for(row, direction, now) {
            Some(ramp) => drive.shift_with_ramp(target, ramp),
            None => drive.set_gear(target),
        };
    }

    fn ramp_for(&self, row: &GearProfile, direction: Direction, now: Duration) -> Option<CompensationRamp> {
        if !self.mode.ramps_after_shift() {
            return None;
        }
        let compensation = row.compensation?;
        let (factor, duration) = match direction {
            Direction::Up => (
                compensation.up_compensation_factor,
                compensation.up_duration(),
            ),
            Direction::Down => (
                compensation.down_compensation_factor,
                compensation.down_duration(),
            ),
        };
        Some(CompensationRamp::start(now, factor, duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::{DriveGeometry, MotorCount, PropulsionUpdate};
    use crate::ports::DriveMotor;
    use std::cell::Cell;

    struct Null;

    impl ActuatorSink for Null {
        fn set_duty(&mut self, _motor: DriveMotor, _duty: f32) {}
        fn coast(&mut self, _motor: DriveMotor) {}
        fn track_steering(&mut self, _angle_deg: f32) {}
        fn track_gearbox(&mut self, _angle_deg: f32) {}
    }

    struct Speed(Cell<f32>);

    impl TelemetrySource for Speed {
        fn drive_speed(&self) -> f32 {
            self.0.get()
        }
    }

    fn setup(mode: GearboxMode) -> Result<(AutoGearbox, DriveState<Null>), ProfileError> {
        let auto = AutoGearbox::new(GearboxProfiles::default(), mode)?;
        let drive = DriveState::new(Null, DriveGeometry::default(), auto.top_gear(), MotorCount::Dual);
        Ok((auto, drive))
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_manual_mode_skips() -> Result<(), ProfileError> {
        let (auto, mut drive) = setup(GearboxMode::Manual)?;
        drive.set_gear(3);
        let speed = Speed(Cell::new(0.0));
        assert_eq!(auto.tick(&mut drive, &speed, ms(0)), TickOutcome::Skipped);
        assert_eq!(drive.gear(), 3);
        Ok(())
    }

    #[test]
    fn test_stall_reset_bypasses_hold() -> Result<(), ProfileError> {
        let (auto, mut drive) = setup(GearboxMode::AutoSport)?;
        drive.set_gear(3);
        let speed = Speed(Cell::new(0.0));
        assert_eq!(
            auto.tick(&mut drive, &speed, ms(0)),
            TickOutcome::StallReset { from: 3 }
        );
        assert_eq!(drive.gear(), 1);
        Ok(())
    }

    #[test]
    fn test_no_up_shift_at_top_gear() -> Result<(), ProfileError> {
        let (auto, mut drive) = setup(GearboxMode::AutoSport)?;
        drive.set_gear(4);
        drive.set_propulsion(PropulsionUpdate::power(100.0));
        let speed = Speed(Cell::new(1050.0));
        for t in 0..200 {
            auto.tick(&mut drive, &speed, ms(t * 10));
        }
        assert_eq!(drive.gear(), 4);
        Ok(())
    }

    #[test]
    fn test_set_mode_resets_timers() -> Result<(), ProfileError> {
        let (mut auto, mut drive) = setup(GearboxMode::AutoSport)?;
        drive.set_propulsion(PropulsionUpdate::power(80.0));
        let speed = Speed(Cell::new(650.0));
        auto.tick(&mut drive, &speed, ms(0));
        assert!(drive.shift_tracking().timers.gear_up_since().is_some());

        assert!(auto.set_mode(GearboxMode::AutoComfort, &mut drive));
        assert!(drive.shift_tracking().timers.is_idle());
        assert!(!auto.set_mode(GearboxMode::AutoComfort, &mut drive));
        Ok(())
    }

    #[test]
    fn test_sport_shift_has_no_ramp() -> Result<(), ProfileError> {
        let (auto, mut drive) = setup(GearboxMode::AutoSport)?;
        drive.set_propulsion(PropulsionUpdate::power(80.0));
        let speed = Speed(Cell::new(650.0));
        let mut t = 0;
        while drive.gear() == 1 && t < 100 {
            auto.tick(&mut drive, &speed, ms(t * 10));
            t += 1;
        }
        assert_eq!(drive.gear(), 2);
        assert!(!drive.ramp_active());
        assert!((drive.power_compensation() - 1.0).abs() < f32::EPSILON);
        Ok(())
    }
}
