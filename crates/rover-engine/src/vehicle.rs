//! The vehicle: routing, drive state and gearbox behind one control handler.

use std::time::Duration;

use rover_drivetrain::{
    ActuatorSink, AutoGearbox, DriveState, PropulsionUpdate, TelemetrySource, TickOutcome,
};
use rover_errors::RoverError;
use rover_input::RawInputEvent;
use rover_scheduler::ControlHandler;
use tracing::{debug, info};

use crate::config::RoverConfig;
use crate::feedback::Feedback;
use crate::router::{ControlEvent, InputRouter};
use crate::status::VehicleStatus;

/// Owns all mutable control state for one rover.
#[derive(Debug)]
pub struct Vehicle<A: ActuatorSink, T: TelemetrySource, F: Feedback> {
    router: InputRouter,
    drive: DriveState<A>,
    gearbox: AutoGearbox,
    telemetry: T,
    feedback: F,
}

impl<A, T, F> Vehicle<A, T, F>
where
    A: ActuatorSink,
    T: TelemetrySource,
    F: Feedback,
{
    /// Assemble a vehicle from a validated configuration.
    pub fn new(config: &RoverConfig, actuators: A, telemetry: T, feedback: F) -> Result<Self, RoverError> {
        config.validate()?;
        let gearbox = AutoGearbox::new(config.gearbox.profiles.clone(), config.gearbox.mode)?;
        let drive = DriveState::new(
            actuators,
            config.drive.geometry(),
            gearbox.top_gear(),
            config.drive.motor_count,
        )
        .with_gear(config.gearbox.initial_gear);
        info!(
            family = %config.controller.family,
            mode = %gearbox.mode(),
            gears = gearbox.top_gear(),
            gear = drive.gear(),
            motor_count = config.drive.motor_count.count(),
            "vehicle ready"
        );
        Ok(Self {
            router: config.router(),
            drive,
            gearbox,
            telemetry,
            feedback,
        })
    }

    /// Push the full state to the actuators and announce it.
    pub fn start(&mut self) {
        self.drive.sync();
        self.notify();
    }

    /// Coast the propulsion motors.
    pub fn shutdown(&mut self) {
        info!(gear = self.drive.gear(), "stopping vehicle");
        self.drive.coast_all();
    }

    /// Apply one control intent.
    pub fn apply(&mut self, event: ControlEvent) {
        debug!(?event, "control event");
        match event {
            ControlEvent::Throttle(power) => {
                self.drive.set_propulsion(PropulsionUpdate::power(power));
            }
            ControlEvent::Bump(bump) => {
                self.drive.set_propulsion(PropulsionUpdate::bump(bump));
            }
            ControlEvent::Steering(position) => {
                self.drive.set_steering(position);
            }
            ControlEvent::GearUp => {
                if self.drive.shift_up() {
                    self.notify();
                }
            }
            ControlEvent::GearDown => {
                if self.drive.shift_down() {
                    self.notify();
                }
            }
            ControlEvent::SetMode(mode) => {
                if self.gearbox.set_mode(mode, &mut self.drive) {
                    self.notify();
                }
            }
            ControlEvent::ToggleMotors => {
                let next = self.drive.motor_count().toggled();
                if self.drive.set_motor_count(next) {
                    self.notify();
                }
            }
            ControlEvent::Horn => self.feedback.horn(),
            ControlEvent::Effect => self.feedback.effect(),
        }
    }

    /// Run the periodic part of the control loop.
    ///
    /// Automatic modes tick the gearbox. In manual mode a ramp started before
    /// the switch keeps running to completion.
    pub fn idle(&mut self, now: Duration) -> TickOutcome {
        if !self.gearbox.mode().is_automatic() {
            self.drive.advance_ramp(now);
            return TickOutcome::Skipped;
        }
        let outcome = self.gearbox.tick(&mut self.drive, &self.telemetry, now);
        if outcome.shifted() {
            self.notify();
        }
        outcome
    }

    /// Snapshot of gear, mode and motor count.
    pub fn status(&self) -> VehicleStatus {
        VehicleStatus::capture(&self.drive, self.gearbox.mode())
    }

    /// Commanded drive state.
    pub fn drive(&self) -> &DriveState<A> {
        &self.drive
    }

    /// Automatic gearbox controller and its active mode.
    pub fn gearbox(&self) -> &AutoGearbox {
        &self.gearbox
    }

    /// Input mapping for the configured controller.
    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    /// Motor speed source.
    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    /// Horn, effect and status outputs.
    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    fn notify(&mut self) {
        let status = self.status();
        self.feedback.status_changed(&status);
    }
}

impl<A, T, F> ControlHandler<RawInputEvent> for Vehicle<A, T, F>
where
    A: ActuatorSink,
    T: TelemetrySource,
    F: Feedback,
{
    fn handle_event(&mut self, event: RawInputEvent, _now: Duration) {
        if let Some(control) = self.router.route(&event) {
            self.apply(control);
        }
    }

    fn handle_idle(&mut self, now: Duration) {
        self.idle(now);
    }
}
