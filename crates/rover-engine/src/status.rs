//! Readable vehicle state for displays and feedback.

use rover_drivetrain::{ActuatorSink, DriveState};
use rover_gearbox::GearboxMode;
use serde::{Deserialize, Serialize};

/// Point-in-time view of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleStatus {
    pub gear: u8,
    pub top_gear: u8,
    pub mode: GearboxMode,
    pub motor_count: u8,
    pub steering_pos: f32,
    pub power_pos: f32,
    pub power_compensation: f32,
}

impl VehicleStatus {
    /// Capture the current state of `drive` under `mode`.
    pub fn capture<A: ActuatorSink>(drive: &DriveState<A>, mode: GearboxMode) -> Self {
        Self {
            gear: drive.gear(),
            top_gear: drive.top_gear(),
            mode,
            motor_count: drive.motor_count().count(),
            steering_pos: drive.steering_pos(),
            power_pos: drive.power_pos(),
            power_compensation: drive.power_compensation(),
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "gear {}/{} | {} | {} motor{}",
            self.gear,
            self.top_gear,
            self.mode,
            self.motor_count,
            if self.motor_count == 1 { "" } else { "s" }
        )
    }
}
