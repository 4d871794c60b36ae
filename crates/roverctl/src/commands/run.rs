//! Drive the rover until the controller stream ends

use anyhow::{Context, Result};
use rover_drivetrain::{ActuatorSink, TelemetrySource};
use rover_engine::{
    DryRunActuators, Ev3devActuators, LogFeedback, RoverConfig, StillTelemetry, Vehicle,
};
use rover_input::{EvdevEventSource, RecordLayout};
use rover_scheduler::{ControlScheduler, LoopMetrics, MonotonicClock};
use tracing::info;

use crate::commands::RunArgs;
use crate::output;

/// Execute the run command
pub fn execute(args: &RunArgs, json: bool) -> Result<()> {
    let config = effective_config(args)?;
    let mut source = EvdevEventSource::open(&args.device, RecordLayout::native())
        .with_context(|| format!("opening controller {}", args.device.display()))?;

    let summary = if args.dry_run {
        drive(&config, &mut source, DryRunActuators::new(), StillTelemetry)?
    } else {
        let actuators = Ev3devActuators::open(args.ports)?;
        let telemetry = actuators.telemetry();
        drive(&config, &mut source, actuators, telemetry)?
    };

    output::print_run_summary(&summary, json);
    Ok(())
}

/// Configuration file (or defaults) with command-line overrides applied.
fn effective_config(args: &RunArgs) -> Result<RoverConfig> {
    let mut config = match &args.config {
        Some(path) => RoverConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => RoverConfig::default(),
    };
    if let Some(family) = args.family {
        config.controller.family = family;
    }
    if let Some(mode) = args.mode {
        config.gearbox.mode = mode;
    }
    config.validate()?;
    Ok(config)
}

/// Final state of a finished run.
pub struct RunSummary {
    pub status: rover_engine::VehicleStatus,
    pub metrics: LoopMetrics,
}

fn drive<A, T>(
    config: &RoverConfig,
    source: &mut EvdevEventSource,
    actuators: A,
    telemetry: T,
) -> Result<RunSummary>
where
    A: ActuatorSink,
    T: TelemetrySource,
{
    let mut vehicle = Vehicle::new(config, actuators, telemetry, LogFeedback)?;
    let mut scheduler =
        ControlScheduler::new(MonotonicClock::new(), config.scheduler.idle_interval());

    vehicle.start();
    let metrics = scheduler.run(source, &mut vehicle);
    vehicle.shutdown();

    info!(
        events = metrics.events_handled,
        idle_ticks = metrics.idle_ticks,
        max_oversleep_us = metrics.max_oversleep_ns / 1_000,
        "run finished"
    );
    Ok(RunSummary {
        status: vehicle.status(),
        metrics,
    })
}
