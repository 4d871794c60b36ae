//! Driver feedback port.
//!
//! Horn and effect buttons and status changes are reported here. Feedback is
//! fire-and-forget; the control loop never waits on it.

use tracing::info;

use crate::status::VehicleStatus;

/// Receiver of driver-facing notifications.
pub trait Feedback {
    /// Horn button pressed.
    fn horn(&mut self);

    /// Sound effect button pressed.
    fn effect(&mut self);

    /// Gear, mode or motor count changed.
    fn status_changed(&mut self, status: &VehicleStatus);
}

/// Feedback that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn horn(&mut self) {
        info!("horn");
    }

    fn effect(&mut self) {
        info!("sound effect");
    }

    fn status_changed(&mut self, status: &VehicleStatus) {
        info!(
            gear = status.gear,
            mode = %status.mode,
            motor_count = status.motor_count,
            "{status}"
        );
    }
}

impl<F: Feedback + ?Sized> Feedback for &mut F {
    fn horn(&mut self) {
        (**self).horn();
    }

    fn effect(&mut self) {
        (**self).effect();
    }

    fn status_changed(&mut self, status: &VehicleStatus) {
        (**self).status_changed(status);
    }
}

impl<F: Feedback + ?Sized> Feedback for Box<F> {
    fn horn(&mut self) {
        (**self).horn();
    }

    fn effect(&mut self) {
        (**self).effect();
    }

    fn status_changed(&mut self, status: &VehicleStatus) {
        (**self).status_changed(status);
    }
}
