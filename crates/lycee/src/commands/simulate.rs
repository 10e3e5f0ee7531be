//! Preview a scenario projection.

use anyhow::Result;
use colored::Colorize;
use lycee_core::scenario;

use super::{Context, fmt_delta, print_json};

pub async fn execute(id: &str, delta: f64, ctx: &Context) -> Result<()> {
    let simulation = scenario::simulate(&ctx.store, id, delta)?;

    if ctx.json {
        return print_json(&simulation);
    }

    if simulation.delta != delta {
        println!(
            "{} delta {} clamped to {}",
            "⚠".yellow(),
            delta,
            simulation.delta
        );
    }

    println!(
        "{}",
        format!("Scenario for {} ({})", id, fmt_delta(simulation.delta))
            .cyan()
            .bold()
    );
    println!("{}", "─".repeat(40));

    if simulation.scenario.is_empty() {
        println!("  No projected years");
        return Ok(());
    }

    println!("  {:<6} {:>9} {:>9} {:>6}", "YEAR", "BASELINE", "SCENARIO", "GAIN");
    let projected: Vec<_> = ctx
        .store
        .get_institution(id)
        .map(|r| r.projected().collect())
        .unwrap_or_default();
    for (point, source) in simulation.scenario.iter().zip(projected.iter()) {
        let baseline = source.baseline.unwrap_or(0);
        let gain = point.scenario_value - baseline;
        let gain = if gain >= 0 {
            format!("{:+}", gain).green()
        } else {
            format!("{:+}", gain).red()
        };
        println!(
            "  {:<6} {:>9} {:>9} {:>6}",
            point.year, baseline, point.scenario_value, gain
        );
    }

    Ok(())
}
