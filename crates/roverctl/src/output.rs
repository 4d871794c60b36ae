//! Output formatting for CLI responses

use std::path::Path;

use anyhow::{Error, Result};
use colored::Colorize;
use rover_engine::RoverConfig;
use rover_errors::ErrorSeverity;
use rover_gearbox::{GearProfile, GearTable, GearboxProfiles};
use serde_json::json;

use crate::commands::run::RunSummary;
use crate::error::{error_severity, error_type_name};

fn print_json(value: &serde_json::Value, what: &str) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format {what} as JSON: {e}"),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    print_json(
        &json!({
            "success": false,
            "error": {
                "message": format!("{error:#}"),
                "type": error_type_name(error),
                "severity": error_severity(error).to_string()
            }
        }),
        "error",
    );
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    let label = match error_severity(error) {
        ErrorSeverity::Info | ErrorSeverity::Warning => "Warning:".yellow().bold(),
        ErrorSeverity::Error => "Error:".red().bold(),
        ErrorSeverity::Critical => "Critical:".red().bold(),
    };
    eprintln!("{label} {error}");

    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "Caused by:".yellow(), cause);
    }
}

/// Print both gear tables
pub fn print_profiles(profiles: &GearboxProfiles, json: bool) -> Result<()> {
    if json {
        let value = json!({
            "success": true,
            "gears": profiles.gear_count(),
            "profiles": serde_json::to_value(profiles)?
        });
        print_json(&value, "profiles");
        return Ok(());
    }

    print_table("Sport", &profiles.sport);
    println!();
    print_table("Comfort", &profiles.comfort);
    Ok(())
}

fn print_table(name: &str, table: &GearTable) {
    println!("{} ({} gears)", name.bold(), table.gear_count());
    println!(
        "  {:>4} {:>8}  {:>18}  {:>18}  {}",
        "gear".dimmed(),
        "max rpm".dimmed(),
        "up power/rpm/hold".dimmed(),
        "down power/rpm/hold".dimmed(),
        "ramp up / down".dimmed()
    );
    for (gear, row) in (1u8..).zip(table.rows()) {
        println!(
            "  {:>4} {:>8.0}  {:>18}  {:>18}  {}",
            gear.to_string().cyan(),
            row.max_rpm,
            thresholds(row.up_power_threshold, row.up_rpm_threshold, row.up_hold_seconds),
            thresholds(
                row.down_power_threshold,
                row.down_rpm_threshold,
                row.down_hold_seconds
            ),
            ramps(row)
        );
    }
}

fn thresholds(power: f32, rpm: f32, hold: f32) -> String {
    format!("{power:.0}% {rpm:.0} {hold:.2}s")
}

fn ramps(row: &GearProfile) -> String {
    row.compensation.map_or_else(
        || "-".to_string(),
        |c| {
            format!(
                "x{:.2} {:.2}s / x{:.2} {:.2}s",
                c.up_compensation_factor,
                c.up_compensation_seconds,
                c.down_compensation_factor,
                c.down_compensation_seconds
            )
        },
    )
}

/// Print the result of a successful configuration check
pub fn print_config_ok(path: &Path, config: &RoverConfig, json: bool) {
    if json {
        print_json(
            &json!({
                "success": true,
                "path": path.display().to_string(),
                "family": config.controller.family,
                "mode": config.gearbox.mode,
                "gears": config.gearbox.profiles.gear_count(),
                "motor_count": config.drive.motor_count.count(),
            }),
            "configuration",
        );
        return;
    }

    println!("{} {}", "✓".green(), path.display().to_string().bold());
    println!("  Controller: {}", config.controller.family);
    println!("  Mode: {}", config.gearbox.mode);
    println!("  Gears: {}", config.gearbox.profiles.gear_count());
    println!("  Motors: {}", config.drive.motor_count.count());
}

/// Print the vehicle state after the control loop finished
pub fn print_run_summary(summary: &RunSummary, json: bool) {
    let metrics = &summary.metrics;
    if json {
        print_json(
            &json!({
                "success": true,
                "status": summary.status,
                "events": metrics.events_handled,
                "idle_ticks": metrics.idle_ticks,
                "max_oversleep_ns": metrics.max_oversleep_ns,
            }),
            "run summary",
        );
        return;
    }

    println!("{} {}", "Stopped:".bold(), summary.status);
    println!(
        "  {} events, {} idle ticks, max oversleep {} us",
        metrics.events_handled,
        metrics.idle_ticks,
        metrics.max_oversleep_ns / 1_000
    );
}
