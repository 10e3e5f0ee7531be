//! Shared types for lycee-core.
//!
//! These types are used by the dataset store, the HTTP server and the CLI.
//! Field aliases accept the key names written by the fixture generator.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Dataset Types
// ─────────────────────────────────────────────────────────────────────────────

/// Identity of an institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionInfo {
    pub id: String,
    pub name: String,
    /// Administrative division (département) code, e.g. "53".
    #[serde(alias = "departement_code")]
    pub division_code: String,
    pub lat: f64,
    pub lng: f64,
}

/// Pre-computed model metrics for an institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionMetrics {
    /// Least-squares slope of yearly enrollment.
    #[serde(alias = "pente_annuelle")]
    pub trend_slope: f64,
    /// Captation rate (%) at the first reference year.
    #[serde(alias = "captation_2018")]
    pub captation_start: f64,
    /// Captation rate (%) at the latest reference year.
    #[serde(alias = "captation_2025")]
    pub captation_end: f64,
    #[serde(alias = "delta_captation_points")]
    pub captation_delta_points: f64,
    /// Mean absolute percentage error of the baseline model.
    pub mape: f64,
    /// Enrollment under which the institution is considered fragile.
    #[serde(alias = "seuil_critique")]
    pub critical_threshold: i64,
}

/// One year of an enrollment series.
///
/// A point is historical when `actual` is set, projected otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    #[serde(default)]
    pub actual: Option<i64>,
    #[serde(default)]
    pub baseline: Option<i64>,
    #[serde(default)]
    pub scenario: Option<i64>,
}

impl SeriesPoint {
    /// Create an observed point.
    pub fn historical(year: i32, actual: i64) -> Self {
        Self {
            year,
            actual: Some(actual),
            baseline: None,
            scenario: None,
        }
    }

    /// Create a model-projected point.
    pub fn projected(year: i32, baseline: i64) -> Self {
        Self {
            year,
            actual: None,
            baseline: Some(baseline),
            scenario: None,
        }
    }

    pub fn is_historical(&self) -> bool {
        self.actual.is_some()
    }

    pub fn is_projected(&self) -> bool {
        self.actual.is_none()
    }
}

/// Full record of an institution, as served by `GET /institutions/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionRecord {
    #[serde(alias = "lycee")]
    pub institution: InstitutionInfo,
    pub metrics: InstitutionMetrics,
    pub series: Vec<SeriesPoint>,
}

impl InstitutionRecord {
    pub fn id(&self) -> &str {
        &self.institution.id
    }

    /// Observed points, in chronological order.
    pub fn historical(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.series.iter().filter(|p| p.is_historical())
    }

    /// Projected points, in chronological order.
    pub fn projected(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.series.iter().filter(|p| p.is_projected())
    }

    /// Latest observed enrollment.
    pub fn latest_actual(&self) -> Option<i64> {
        self.historical().last().and_then(|p| p.actual)
    }

    /// Baseline projection of the final projected year.
    pub fn latest_baseline(&self) -> Option<i64> {
        self.projected().last().and_then(|p| p.baseline)
    }
}

/// Map marker summary, as served by `GET /institutions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionMarker {
    pub id: String,
    pub name: String,
    #[serde(alias = "departement_code")]
    pub division_code: String,
    #[serde(default, alias = "departement_nom", skip_serializing_if = "Option::is_none")]
    pub division_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, alias = "effectif_actuel")]
    pub current_enrollment: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Types
// ─────────────────────────────────────────────────────────────────────────────

/// One year of a simulated trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioPoint {
    pub year: i32,
    pub scenario_value: i64,
}

/// Result of the simulate preview path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub institution_id: String,
    /// Clamped delta actually applied
    pub delta: f64,
    pub scenario: Vec<ScenarioPoint>,
}

/// Narrative analysis split into its two display sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub diagnostic: String,
    pub scenario: Option<String>,
}
