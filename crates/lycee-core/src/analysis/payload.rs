//! Structured analysis payload sent to the language model.

use serde::Serialize;

use crate::dataset::DatasetStore;
use crate::scenario::{round_half_up, scenario_value};
use crate::types::InstitutionRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisPayload {
    pub institution: PayloadIdentity,
    pub metrics: PayloadMetrics,
    pub history: Vec<YearEnrollment>,
    pub baseline_projection: Vec<YearEnrollment>,
    /// Final projected year falls under the critical threshold.
    pub baseline_below_threshold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peers: Option<Vec<PeerSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<ScenarioBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadIdentity {
    pub id: String,
    pub name: String,
    pub division_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadMetrics {
    pub trend_slope: f64,
    pub captation_start: f64,
    pub captation_end: f64,
    pub captation_delta_points: f64,
    pub model_mape: f64,
    pub critical_threshold: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearEnrollment {
    pub year: i32,
    pub enrollment: i64,
}

/// Same-division comparison entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerSummary {
    pub name: String,
    pub trend_slope: f64,
    pub latest_enrollment: i64,
    pub latest_baseline: i64,
    pub captation_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioBlock {
    pub delta_pct: i64,
    pub projections: Vec<ScenarioYear>,
    /// Mean of the yearly gains, `None` without projected years.
    pub average_gain: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScenarioYear {
    pub year: i32,
    pub scenario_enrollment: i64,
    pub gain: i64,
}

/// Assemble the payload for `record` under an already clamped `delta`.
pub fn build_payload(store: &DatasetStore, record: &InstitutionRecord, delta: f64) -> AnalysisPayload {
    let metrics = &record.metrics;

    let history: Vec<YearEnrollment> = record
        .historical()
        .map(|p| YearEnrollment {
            year: p.year,
            enrollment: p.actual.unwrap_or(0),
        })
        .collect();

    let baseline_projection: Vec<YearEnrollment> = record
        .projected()
        .map(|p| YearEnrollment {
            year: p.year,
            enrollment: p.baseline.unwrap_or(0),
        })
        .collect();

    let baseline_below_threshold = baseline_projection
        .last()
        .is_some_and(|last| last.enrollment < metrics.critical_threshold);

    let peers: Vec<PeerSummary> = store
        .peers_of(record)
        .map(|peer| PeerSummary {
            name: peer.institution.name.clone(),
            trend_slope: peer.metrics.trend_slope,
            latest_enrollment: peer.latest_actual().unwrap_or(0),
            latest_baseline: peer.latest_baseline().unwrap_or(0),
            captation_rate: peer.metrics.captation_end,
        })
        .collect();

    let scenario = (delta != 0.0).then(|| scenario_block(&baseline_projection, delta));

    AnalysisPayload {
        institution: PayloadIdentity {
            id: record.institution.id.clone(),
            name: record.institution.name.clone(),
            division_code: record.institution.division_code.clone(),
        },
        metrics: PayloadMetrics {
            trend_slope: metrics.trend_slope,
            captation_start: metrics.captation_start,
            captation_end: metrics.captation_end,
            captation_delta_points: metrics.captation_delta_points,
            model_mape: metrics.mape,
            critical_threshold: metrics.critical_threshold,
        },
        history,
        baseline_projection,
        baseline_below_threshold,
        peers: (!peers.is_empty()).then_some(peers),
        scenario,
    }
}

fn scenario_block(baseline: &[YearEnrollment], delta: f64) -> ScenarioBlock {
    let projections: Vec<ScenarioYear> = baseline
        .iter()
        .map(|b| {
            let projected = scenario_value(b.enrollment, delta);
            ScenarioYear {
                year: b.year,
                scenario_enrollment: projected,
                gain: projected - b.enrollment,
            }
        })
        .collect();

    let average_gain = if projections.is_empty() {
        None
    } else {
        let total: i64 = projections.iter().map(|p| p.gain).sum();
        Some(round_half_up(total as f64 / projections.len() as f64))
    };

    ScenarioBlock {
        delta_pct: round_half_up(delta * 100.0),
        projections,
        average_gain,
    }
}
