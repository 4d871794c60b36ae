//! Gear profile inspection

use anyhow::{Context, Result};
use rover_engine::RoverConfig;

use crate::commands::ProfilesArgs;
use crate::output;

/// Execute the profiles command
pub fn execute(args: &ProfilesArgs, json: bool) -> Result<()> {
    let config = match &args.config {
        Some(path) => RoverConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => RoverConfig::default(),
    };
    output::print_profiles(&config.gearbox.profiles, json)
}
