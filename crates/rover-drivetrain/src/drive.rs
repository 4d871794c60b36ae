//! Drive state: the single point where actuator commands are emitted.
//!
//! Every setter compares its effective value against the current state and
//! only talks to the actuators when something actually changed, so the
//! control loop can call setters on every event without flooding the motor
//! drivers with identical writes.

use std::time::Duration;

use rover_errors::ValidationError;
use rover_gearbox::{CompensationRamp, FIRST_GEAR, HysteresisTimers, NEUTRAL_COMPENSATION};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::ports::{ActuatorSink, DriveMotor};

/// Duty limit of the propulsion motors, in percent.
pub const MAX_DUTY: f32 = 100.0;

/// Exact change test; `0.0` and `-0.0` compare equal.
fn differs(a: f32, b: f32) -> bool {
    (a - b).abs() > 0.0
}

/// Mechanical constants of the steering and gearbox linkages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveGeometry {
    /// Steering motor angle at full stick deflection, in degrees.
    pub max_steering_angle: f32,
    /// Gearbox selector rotation between adjacent gears, in degrees.
    pub gear_angle_step: f32,
}

impl DriveGeometry {
    /// Steering angle for a steering position in `-100.0..=100.0`.
    pub fn steering_target(&self, steering_pos: f32) -> f32 {
        -steering_pos * self.max_steering_angle / 100.0
    }

    /// Gearbox selector angle for a gear.
    pub fn gearbox_target(&self, gear: u8) -> f32 {
        -f32::from(gear.saturating_sub(FIRST_GEAR)) * self.gear_angle_step
    }
}

impl Default for DriveGeometry {
    fn default() -> Self {
        Self {
            max_steering_angle: 270.0,
            // 20/12 of a quarter turn per gear
            gear_angle_step: 150.0,
        }
    }
}

/// Number of propulsion motors receiving the drive signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MotorCount {
    /// Primary only; the secondary coasts.
    Single,
    /// Secondary mirrors the primary.
    #[default]
    Dual,
}

impl MotorCount {
    /// Number of driven motors.
    pub const fn count(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Dual => 2,
        }
    }

    /// The other setting.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Single => Self::Dual,
            Self::Dual => Self::Single,
        }
    }
}

impl TryFrom<u8> for MotorCount {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Single),
            2 => Ok(Self::Dual),
            other => Err(ValidationError::out_of_range("motor_count", other, 1, 2)),
        }
    }
}

impl From<MotorCount> for u8 {
    fn from(value: MotorCount) -> Self {
        value.count()
    }
}

/// Partial update of the propulsion inputs. `None` leaves a field unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PropulsionUpdate {
    /// Drive power request in `-100.0..=100.0`.
    pub power: Option<f32>,
    /// Trigger boost in `0.0..=1.0`.
    pub bump: Option<f32>,
    /// Compensation multiplier.
    pub compensation: Option<f32>,
}

impl PropulsionUpdate {
    /// Update only the power request.
    pub const fn power(power: f32) -> Self {
        Self {
            power: Some(power),
            bump: None,
            compensation: None,
        }
    }

    /// Update only the trigger boost.
    pub const fn bump(bump: f32) -> Self {
        Self {
            power: None,
            bump: Some(bump),
            compensation: None,
        }
    }

    /// Update only the compensation multiplier.
    pub const fn compensation(compensation: f32) -> Self {
        Self {
            power: None,
            bump: None,
            compensation: Some(compensation),
        }
    }
}

/// Hysteresis and ramp state attached to the current gear.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShiftTracking {
    /// Up/down hold timers.
    pub timers: HysteresisTimers,
    /// Active compensation ramp, if any.
    pub ramp: Option<CompensationRamp>,
}

/// Commanded drive state and the actuators it controls.
#[derive(Debug)]
pub struct DriveState<A: ActuatorSink> {
    actuators: A,
    geometry: DriveGeometry,
    top_gear: u8,
    power_pos: f32,
    power_bump: f32,
    power_compensation: f32,
    steering_pos: f32,
    gear: u8,
    motor_count: MotorCount,
    shift: ShiftTracking,
}

impl<A: ActuatorSink> DriveState<A> {
    /// Create a drive state at rest in first gear.
    ///
    /// Nothing is sent to the actuators until [`DriveState::sync`] or a
    /// setter is called.
    pub fn new(actuators: A, geometry: DriveGeometry, top_gear: u8, motor_count: MotorCount) -> Self {
        Self {
            actuators,
            geometry,
            top_gear: top_gear.max(FIRST_GEAR),
            power_pos: 0.0,
            power_bump: 0.0,
            power_compensation: NEUTRAL_COMPENSATION,
            steering_pos: 0.0,
            gear: FIRST_GEAR,
            motor_count,
            shift: ShiftTracking::default(),
        }
    }

    /// Start in `gear` instead of first, clamped to `1..=top_gear`.
    ///
    /// Like [`DriveState::new`], nothing is sent to the actuators.
    pub fn with_gear(mut self, gear: u8) -> Self {
        self.gear = gear.clamp(FIRST_GEAR, self.top_gear);
        self
    }

    /// Issue every actuator command for the current state unconditionally.
    pub fn sync(&mut self) {
        let duty = self.duty();
        self.actuators.set_duty(DriveMotor::Primary, duty);
        self.apply_secondary(duty);
        self.actuators.track_steering(self.geometry.steering_target(self.steering_pos));
        self.actuators.track_gearbox(self.geometry.gearbox_target(self.gear));
    }

    /// Coast both propulsion motors, e.g. on shutdown.
    pub fn coast_all(&mut self) {
        self.actuators.coast(DriveMotor::Primary);
        self.actuators.coast(DriveMotor::Secondary);
    }

    /// Update any subset of power, bump and compensation.
    ///
    /// Values are clamped to their ranges; non-finite values are ignored.
    /// Returns true when the propulsion command was re-issued.
    pub fn set_propulsion(&mut self, update: PropulsionUpdate) -> bool {
        let power = update
            .power
            .filter(|v| v.is_finite())
            .map_or(self.power_pos, |v| v.clamp(-100.0, 100.0));
        let bump = update
            .bump
            .filter(|v| v.is_finite())
            .map_or(self.power_bump, |v| v.clamp(0.0, 1.0));
        let compensation = update
            .compensation
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(self.power_compensation);

        if !differs(power, self.power_pos)
            && !differs(bump, self.power_bump)
            && !differs(compensation, self.power_compensation)
        {
            return false;
        }

        self.power_pos = power;
        self.power_bump = bump;
        self.power_compensation = compensation;

        let duty = self.duty();
        trace!(power, bump, compensation, duty, "propulsion");
        self.actuators.set_duty(DriveMotor::Primary, duty);
        self.apply_secondary(duty);
        true
    }

    /// Update the steering position in `-100.0..=100.0`.
    pub fn set_steering(&mut self, position: f32) -> bool {
        if !position.is_finite() {
            return false;
        }
        let position = position.clamp(-100.0, 100.0);
        if !differs(position, self.steering_pos) {
            return false;
        }
        self.steering_pos = position;
        let angle = self.geometry.steering_target(position);
        trace!(position, angle, "steering");
        self.actuators.track_steering(angle);
        true
    }

    /// Select a gear, clamped to `1..=top_gear`.
    ///
    /// A change resets the hysteresis timers, drops any compensation ramp and
    /// restores neutral compensation before moving the selector.
    pub fn set_gear(&mut self, gear: u8) -> bool {
        self.change_gear(gear, None)
    }

    /// Select a gear and start `ramp` in the same step.
    ///
    /// The propulsion motors go straight from the old compensation to the
    /// ramp's start factor; neutral compensation is never written in between.
    pub fn shift_with_ramp(&mut self, gear: u8, ramp: CompensationRamp) -> bool {
        self.change_gear(gear, Some(ramp))
    }

    /// Step one gear up, saturating at the top gear.
    pub fn shift_up(&mut self) -> bool {
        self.set_gear(self.gear.saturating_add(1))
    }

    /// Step one gear down, saturating at first gear.
    pub fn shift_down(&mut self) -> bool {
        self.set_gear(self.gear.saturating_sub(1))
    }

    fn change_gear(&mut self, gear: u8, ramp: Option<CompensationRamp>) -> bool {
        let gear = gear.clamp(FIRST_GEAR, self.top_gear);
        if gear == self.gear {
            return false;
        }
        let from = self.gear;
        self.gear = gear;
        self.shift = ShiftTracking::default();
        match ramp {
            Some(ramp) => self.start_ramp(ramp),
            None => {
                self.set_propulsion(PropulsionUpdate::compensation(NEUTRAL_COMPENSATION));
            }
        }

        let angle = self.geometry.gearbox_target(gear);
        info!(from, gear, angle, "gear changed");
        self.actuators.track_gearbox(angle);
        true
    }

    /// Switch between one and two driven motors.
    pub fn set_motor_count(&mut self, count: MotorCount) -> bool {
        if count == self.motor_count {
            return false;
        }
        self.motor_count = count;
        info!(motor_count = count.count(), "motor count changed");
        let duty = self.duty();
        self.apply_secondary(duty);
        true
    }

    /// Start a compensation ramp and apply its initial factor immediately.
    pub fn start_ramp(&mut self, ramp: CompensationRamp) {
        debug!(
            start_factor = ramp.start_factor(),
            duration_ms = ramp.duration().as_millis() as u64,
            "compensation ramp started"
        );
        self.shift.ramp = Some(ramp);
        self.advance_ramp(ramp.start_time());
    }

    /// Apply the active ramp at `now`. Returns true while a ramp is active.
    pub fn advance_ramp(&mut self, now: Duration) -> bool {
        let Some(ramp) = self.shift.ramp else {
            return false;
        };
        let sample = ramp.sample(now);
        if sample.finished {
            self.shift.ramp = None;
            debug!("compensation ramp finished");
        }
        self.set_propulsion(PropulsionUpdate::compensation(sample.factor));
        !sample.finished
    }

    /// Stop both hold timers.
    pub fn reset_timers(&mut self) {
        self.shift.timers.reset();
    }

    /// Current propulsion duty, clamped to the motor limit.
    pub fn duty(&self) -> f32 {
        (self.power_pos * (1.0 + self.power_bump) * self.power_compensation)
            .clamp(-MAX_DUTY, MAX_DUTY)
    }

    fn apply_secondary(&mut self, duty: f32) {
        match self.motor_count {
            MotorCount::Dual => self.actuators.set_duty(DriveMotor::Secondary, duty),
            MotorCount::Single => self.actuators.coast(DriveMotor::Secondary),
        }
    }

    /// Commanded power in `-100.0..=100.0`.
    pub fn power_pos(&self) -> f32 {
        self.power_pos
    }

    /// Trigger boost in `0.0..=1.0`.
    pub fn power_bump(&self) -> f32 {
        self.power_bump
    }

    /// Compensation multiplier; 1.0 at rest.
    pub fn power_compensation(&self) -> f32 {
        self.power_compensation
    }

    /// Commanded steering in `-100.0..=100.0`.
    pub fn steering_pos(&self) -> f32 {
        self.steering_pos
    }

    /// Current gear, starting at 1.
    pub fn gear(&self) -> u8 {
        self.gear
    }

    /// Highest selectable gear.
    pub fn top_gear(&self) -> u8 {
        self.top_gear
    }

    /// Number of driven propulsion motors.
    pub fn motor_count(&self) -> MotorCount {
        self.motor_count
    }

    /// Actuator scaling and gear angles.
    pub fn geometry(&self) -> &DriveGeometry {
        &self.geometry
    }

    /// Hold timers and ramp.
    pub fn shift_tracking(&self) -> &ShiftTracking {
        &self.shift
    }

    /// True while a compensation ramp is running.
    pub fn ramp_active(&self) -> bool {
        self.shift.ramp.is_some()
    }

    pub(crate) fn timers_mut(&mut self) -> &mut HysteresisTimers {
        &mut self.shift.timers
    }

    /// Actuator sink receiving the commands.
    pub fn actuators(&self) -> &A {
        &self.actuators
    }

    /// Mutable access to the actuator sink.
    pub fn actuators_mut(&mut self) -> &mut A {
        &mut self.actuators
    }

    /// Consume the drive state and return the actuators.
    pub fn into_actuators(self) -> A {
        self.actuators
    }
}
