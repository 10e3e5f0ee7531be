//! List institutions.

use anyhow::Result;
use colored::Colorize;
use lycee_core::types::InstitutionMarker;

use super::{Context, print_json};

pub async fn execute(division: Option<&str>, ctx: &Context) -> Result<()> {
    let markers = filter_markers(ctx.store.list_institutions(), division);

    if ctx.json {
        return print_json(&markers);
    }

    if markers.is_empty() {
        println!("{}", "No institutions found".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("{:<24} {:<36} {:>4} {:>9}", "ID", "NAME", "DIV", "ENROLLED")
            .cyan()
            .bold()
    );
    println!("{}", "─".repeat(76));
    for marker in &markers {
        println!(
            "{:<24} {:<36} {:>4} {:>9}",
            marker.id,
            truncate(&marker.name, 36),
            marker.division_code,
            marker.current_enrollment
        );
    }
    println!();
    println!("{} institution(s)", markers.len());

    Ok(())
}

/// Markers, optionally restricted to one division code.
fn filter_markers<'a>(
    markers: &'a [InstitutionMarker],
    division: Option<&str>,
) -> Vec<&'a InstitutionMarker> {
    markers
        .iter()
        .filter(|m| division.is_none_or(|d| m.division_code == d))
        .collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
