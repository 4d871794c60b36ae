//! Command definitions and implementations

pub mod check_config;
pub mod profiles;
pub mod run;

use std::path::PathBuf;

use clap::Args;
use rover_engine::MotorPorts;
use rover_gearbox::GearboxMode;
use rover_input::ControllerFamily;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Controller event device, e.g. /dev/input/event2
    #[arg(short, long, env = "ROVER_DEVICE")]
    pub device: PathBuf,

    /// Configuration file (YAML)
    #[arg(short, long, env = "ROVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Controller family, overriding the configuration
    #[arg(long)]
    pub family: Option<ControllerFamily>,

    /// Initial gearbox mode (manual, sport, comfort)
    #[arg(short, long)]
    pub mode: Option<GearboxMode>,

    /// Log motor commands instead of driving the ev3dev motors
    #[arg(long)]
    pub dry_run: bool,

    /// Output ports as primary,secondary,steering,gearbox
    #[arg(long, default_value = "A,D,B,C")]
    pub ports: MotorPorts,
}

#[derive(Args, Debug)]
pub struct ProfilesArgs {
    /// Read profiles from this configuration instead of the built-in tables
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CheckConfigArgs {
    /// Configuration file to validate
    pub path: PathBuf,
}
