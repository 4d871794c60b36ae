//! Configuration file validation

use anyhow::Result;
use rover_engine::RoverConfig;

use crate::commands::CheckConfigArgs;
use crate::output;

/// Execute the check-config command
pub fn execute(args: &CheckConfigArgs, json: bool) -> Result<()> {
    let config = RoverConfig::load(&args.path)?;
    output::print_config_ok(&args.path, &config, json);
    Ok(())
}
