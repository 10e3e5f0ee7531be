//! Scenario engine.
//!
//! Applies an attractiveness delta multiplicatively to the baseline
//! projection of an institution. [`project`] is pure and infallible;
//! [`simulate`] adds the dataset lookup for the preview path.

use crate::dataset::DatasetStore;
use crate::error::{Error, Result};
use crate::types::{ScenarioPoint, SeriesPoint, Simulation};

/// Lowest accepted attractiveness delta (-20%).
pub const MIN_DELTA: f64 = -0.20;

/// Highest accepted attractiveness delta (+40%).
pub const MAX_DELTA: f64 = 0.40;

/// Clamp a delta into `[MIN_DELTA, MAX_DELTA]`.
///
/// Non-finite input (NaN, infinities from a malformed request) is treated as 0.
pub fn clamp_delta(delta: f64) -> f64 {
    if delta.is_nan() {
        return 0.0;
    }
    delta.clamp(MIN_DELTA, MAX_DELTA)
}

/// Round half toward positive infinity (`floor(x + 0.5)`).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Scenario value for one baseline figure.
pub fn scenario_value(baseline: i64, delta: f64) -> i64 {
    round_half_up(baseline as f64 * (1.0 + delta))
}

/// Project the future segment of `series` under `delta`.
///
/// Only points without an observed value are kept. A projected point with no
/// baseline counts as 0.
pub fn project(series: &[SeriesPoint], delta: f64) -> Vec<ScenarioPoint> {
    series
        .iter()
        .filter(|p| p.is_projected())
        .map(|p| ScenarioPoint {
            year: p.year,
            scenario_value: scenario_value(p.baseline.unwrap_or(0), delta),
        })
        .collect()
}

/// Simulate `delta` on a stored institution.
pub fn simulate(store: &DatasetStore, institution_id: &str, delta: f64) -> Result<Simulation> {
    let record = store
        .get_institution(institution_id)
        .ok_or_else(|| Error::InstitutionNotFound(institution_id.to_string()))?;
    let delta = clamp_delta(delta);
    Ok(Simulation {
        institution_id: institution_id.to_string(),
        delta,
        scenario: project(&record.series, delta),
    })
}
