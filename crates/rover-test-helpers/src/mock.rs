//! Mock ports for driving the rover without hardware.
//!
//! The mocks are cheap to clone and clones share state, so a test can hand
//! one handle to the code under test and inspect another afterwards.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use rover_drivetrain::{ActuatorCommand, ActuatorSink, DriveMotor, TelemetrySource};
use rover_scheduler::{EventSource, ManualClock};
use std::time::Duration;

/// Actuator sink that records every command.
#[derive(Debug, Clone, Default)]
pub struct RecordingActuators {
    commands: Rc<RefCell<Vec<ActuatorCommand>>>,
}

impl RecordingActuators {
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands so far, oldest first.
    pub fn commands(&self) -> Vec<ActuatorCommand> {
        self.commands.borrow().clone()
    }

    pub fn last(&self) -> Option<ActuatorCommand> {
        self.commands.borrow().last().copied()
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.commands.borrow_mut().clear();
    }

    /// Duties sent to `motor`, in order.
    pub fn duties(&self, motor: DriveMotor) -> Vec<f32> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|c| match c {
                ActuatorCommand::Duty { motor: m, duty } if *m == motor => Some(*duty),
                _ => None,
            })
            .collect()
    }

    /// Gearbox selector targets, in order.
    pub fn gearbox_targets(&self) -> Vec<f32> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|c| match c {
                ActuatorCommand::Gearbox { angle_deg } => Some(*angle_deg),
                _ => None,
            })
            .collect()
    }

    /// Steering targets, in order.
    pub fn steering_targets(&self) -> Vec<f32> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|c| match c {
                ActuatorCommand::Steering { angle_deg } => Some(*angle_deg),
                _ => None,
            })
            .collect()
    }

    fn push(&self, command: ActuatorCommand) {
        self.commands.borrow_mut().push(command);
    }
}

impl ActuatorSink for RecordingActuators {
    fn set_duty(&mut self, motor: DriveMotor, duty: f32) {
        self.push(ActuatorCommand::Duty { motor, duty });
    }

    fn coast(&mut self, motor: DriveMotor) {
        self.push(ActuatorCommand::Coast { motor });
    }

    fn track_steering(&mut self, angle_deg: f32) {
        self.push(ActuatorCommand::Steering { angle_deg });
    }

    fn track_gearbox(&mut self, angle_deg: f32) {
        self.push(ActuatorCommand::Gearbox { angle_deg });
    }
}

/// Telemetry whose speed the test sets directly.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTelemetry {
    speed: Rc<Cell<f32>>,
}

impl ScriptedTelemetry {
    pub fn new(speed: f32) -> Self {
        Self {
            speed: Rc::new(Cell::new(speed)),
        }
    }

    pub fn set_speed(&self, speed: f32) {
        self.speed.set(speed);
    }
}

impl TelemetrySource for ScriptedTelemetry {
    fn drive_speed(&self) -> f32 {
        self.speed.get()
    }
}

/// Event source replaying a fixed script.
///
/// Each event may carry a release time; it is withheld until the clock
/// reaches it. The source is exhausted once the script is empty.
#[derive(Debug)]
pub struct ScriptedEvents<E> {
    clock: Option<ManualClock>,
    pending: VecDeque<(Duration, E)>,
}

impl<E> ScriptedEvents<E> {
    /// Release every event immediately, in order.
    pub fn immediate(events: impl IntoIterator<Item = E>) -> Self {
        Self {
            clock: None,
            pending: events.into_iter().map(|e| (Duration::ZERO, e)).collect(),
        }
    }

    /// Release each event once `clock` reaches its timestamp.
    pub fn timed(clock: ManualClock, events: impl IntoIterator<Item = (Duration, E)>) -> Self {
        Self {
            clock: Some(clock),
            pending: events.into_iter().collect(),
        }
    }

    /// Events not yet delivered.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl<E> EventSource for ScriptedEvents<E> {
    type Event = E;

    fn poll_event(&mut self) -> Option<E> {
        let now = self.clock.as_ref().map_or(Duration::MAX, rover_scheduler::Clock::now);
        match self.pending.front() {
            Some((at, _)) if *at <= now => self.pending.pop_front().map(|(_, e)| e),
            _ => None,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_clones_share_log() {
        let recorder = RecordingActuators::new();
        let mut handle = recorder.clone();
        handle.set_duty(DriveMotor::Primary, 12.0);
        handle.track_gearbox(-150.0);

        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.duties(DriveMotor::Primary), vec![12.0]);
        assert_eq!(recorder.gearbox_targets(), vec![-150.0]);
    }

    #[test]
    fn test_timed_events_wait_for_clock() {
        let clock = ManualClock::new();
        let mut events = ScriptedEvents::timed(
            clock.clone(),
            [(Duration::from_millis(20), 'a'), (Duration::from_millis(20), 'b')],
        );

        assert_eq!(events.poll_event(), None);
        clock.advance(Duration::from_millis(20));
        assert_eq!(events.poll_event(), Some('a'));
        assert_eq!(events.poll_event(), Some('b'));
        assert!(events.is_exhausted());
    }
}
