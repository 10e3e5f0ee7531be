//! Institution routes: markers, records, scenario preview and analysis.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
};
use lycee_core::completion::CompletionOverrides;
use lycee_core::scenario;
use lycee_core::types::{AnalysisResult, InstitutionMarker, InstitutionRecord, Simulation};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Create institution router
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/institutions", get(list_institutions))
        .route("/institutions/{id}", get(get_institution))
        .route("/institutions/{id}/simulate", post(simulate))
        .route("/institutions/{id}/analyze", post(analyze))
}

/// Body of the simulate and analyze requests.
///
/// Fields are read one by one from the JSON object so that a bad field never
/// hides a valid delta. `delta` stays a raw value so that numeric strings can
/// be accepted.
#[derive(Debug, Default)]
pub struct DeltaRequest {
    pub delta: Option<Value>,
    pub overrides: CompletionOverrides,
}

impl DeltaRequest {
    /// Parse a request body; anything unreadable counts as an empty body.
    pub fn from_body(body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::default();
        }
        let mut fields = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                debug!("Request body is not a JSON object, using delta 0");
                return Self::default();
            }
            Err(e) => {
                debug!(error = %e, "Unreadable request body, using delta 0");
                return Self::default();
            }
        };

        let delta = fields
            .remove("delta")
            .filter(|v| !v.is_null())
            .or_else(|| fields.remove("delta_attractivite"));
        let mut text = |key: &str| match fields.remove(key) {
            Some(Value::String(s)) => Some(s),
            Some(Value::Null) | None => None,
            Some(other) => {
                debug!(field = key, value = %other, "Ignoring non-string override");
                None
            }
        };

        Self {
            delta,
            overrides: CompletionOverrides {
                api_key: text("api_key"),
                api_endpoint: text("api_endpoint"),
                model: text("model"),
            },
        }
    }

    /// Requested delta, 0 when absent or not numeric
    pub fn delta(&self) -> f64 {
        let delta = match &self.delta {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };
        if delta.is_finite() { delta } else { 0.0 }
    }
}

/// List map markers
pub async fn list_institutions(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<InstitutionMarker>> {
    Json(state.store.list_institutions().to_vec())
}

/// Get the full record of an institution
pub async fn get_institution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<InstitutionRecord>, ApiError> {
    state
        .store
        .get_institution(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

/// Preview the projection under an attractiveness delta
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Simulation>, ApiError> {
    let request = DeltaRequest::from_body(&body);
    let simulation = scenario::simulate(&state.store, &id, request.delta())?;
    Ok(Json(simulation))
}

/// Produce the two-section narrative analysis
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<AnalysisResult>, ApiError> {
    let request = DeltaRequest::from_body(&body);
    let result = state
        .analysis
        .analyze(&id, request.delta(), &request.overrides)
        .await?;
    Ok(Json(result))
}
