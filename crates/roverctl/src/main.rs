//! roverctl - gamepad rover driver
//!
//! Runs the control loop against a controller device and the ev3dev motors,
//! and inspects gear profiles and configuration files.

#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{CheckConfigArgs, ProfilesArgs, RunArgs};

#[derive(Parser)]
#[command(name = "roverctl")]
#[command(about = "Rover control CLI - drive the rover from a gamepad and inspect its setup")]
#[command(version)]
#[command(long_about = "
roverctl drives a gamepad-controlled rover with a motorised gearbox.
The run command reads controller events and commands the motors until the
controller stream ends; the other commands inspect profiles and configuration.

Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(long, global = true, help = "Output in JSON format for machine parsing")]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the rover from a controller device
    Run(RunArgs),

    /// Print the effective gear profile tables
    Profiles(ProfilesArgs),

    /// Load and validate a configuration file
    CheckConfig(CheckConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("warn,rover={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(error::exit_code(&e))
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run(args) => commands::run::execute(args, cli.json),
        Commands::Profiles(args) => commands::profiles::execute(args, cli.json),
        Commands::CheckConfig(args) => commands::check_config::execute(args, cli.json),
    }
}
