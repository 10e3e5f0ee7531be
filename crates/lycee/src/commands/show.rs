//! Show one institution.

use anyhow::{Result, anyhow};
use colored::Colorize;
use lycee_core::types::InstitutionRecord;

use super::{Context, fmt_count, print_json};

pub async fn execute(id: &str, ctx: &Context) -> Result<()> {
    let record = ctx
        .store
        .get_institution(id)
        .ok_or_else(|| anyhow!("Institution not found: {}", id))?;

    if ctx.json {
        return print_json(record);
    }

    let info = &record.institution;
    let metrics = &record.metrics;

    println!("{}", format!("{} ({})", info.name, info.id).cyan().bold());
    println!("{}", "─".repeat(50));
    println!("  Division:          {}", info.division_code);
    println!("  Location:          {:.4}, {:.4}", info.lat, info.lng);
    println!();
    println!("{}", "Metrics:".cyan());
    println!("  Trend slope:       {:+.2} / year", metrics.trend_slope);
    println!(
        "  Captation rate:    {:.2}% → {:.2}% ({:+.2} pts)",
        metrics.captation_start, metrics.captation_end, metrics.captation_delta_points
    );
    println!("  Model MAPE:        {:.1}%", metrics.mape);
    println!("  Critical threshold: {}", metrics.critical_threshold);
    println!();
    println!("{}", "Series:".cyan());
    println!("  {:<6} {:>8} {:>9}", "YEAR", "ACTUAL", "BASELINE");
    for point in &record.series {
        let baseline = fmt_count(point.baseline);
        let baseline = if below_threshold(record, point.baseline) {
            baseline.red().to_string()
        } else {
            baseline
        };
        println!(
            "  {:<6} {:>8} {:>9}",
            point.year,
            fmt_count(point.actual),
            baseline
        );
    }

    if below_threshold(record, record.latest_baseline()) {
        println!();
        println!(
            "  {} Projection falls under the critical threshold by the final year",
            "⚠".yellow()
        );
    }

    Ok(())
}

fn below_threshold(record: &InstitutionRecord, value: Option<i64>) -> bool {
    value.is_some_and(|v| v < record.metrics.critical_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_store;

    #[test]
    fn test_below_threshold() {
        let store = test_store();
        let evron = store.get_institution("evron").unwrap();
        assert!(below_threshold(evron, evron.latest_baseline()));
        assert!(!below_threshold(evron, Some(50)));
        assert!(!below_threshold(evron, None));

        let x = store.get_institution("x").unwrap();
        assert!(!below_threshold(x, x.latest_baseline()));
    }

    #[tokio::test]
    async fn test_unknown_institution_is_error() {
        let ctx = Context {
            store: std::sync::Arc::new(test_store()),
            config: crate::config::Config::default(),
            json: true,
        };
        let err = execute("unknown-id", &ctx).await.unwrap_err();
        assert!(err.to_string().contains("unknown-id"));
    }
}
