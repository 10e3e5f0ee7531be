//! AnalysisService - narrative analysis orchestrator
//!
//! Builds the analysis payload for an institution, asks the text-completion
//! collaborator for a report and splits it into display sections. Results are
//! cached per (institution, delta in percent); upstream failures degrade into
//! fixed messages and are never cached.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};

use super::cache::{AnalysisCache, CacheKey, MemoryCache};
use super::payload::build_payload;
use super::prompt::{SYSTEM_PROMPT, render_user_prompt};
use super::splitter::split_sections;
use crate::completion::{CompletionClient, CompletionOverrides, CompletionRequest, CompletionSettings};
use crate::dataset::DatasetStore;
use crate::error::{Error, Result};
use crate::scenario::clamp_delta;
use crate::time::{Clock, SystemClock};
use crate::types::AnalysisResult;

/// Diagnostic shown when the completion collaborator cannot be reached.
pub const DIAGNOSTIC_UNAVAILABLE: &str =
    "Analyse IA temporairement indisponible. Vérifiez que le service de complétion est joignable.";

/// Scenario text shown alongside [`DIAGNOSTIC_UNAVAILABLE`] when a delta was requested.
pub const SCENARIO_UNAVAILABLE: &str = "Analyse du scénario indisponible.";

/// Narrative analysis orchestrator
pub struct AnalysisService {
    store: Arc<DatasetStore>,
    client: Arc<dyn CompletionClient>,
    settings: CompletionSettings,
    cache: Arc<dyn AnalysisCache>,
    clock: Arc<dyn Clock>,
}

impl AnalysisService {
    /// Create a service with an in-memory cache of the given TTL and the wall clock.
    pub fn new(
        store: Arc<DatasetStore>,
        client: Arc<dyn CompletionClient>,
        settings: CompletionSettings,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            store,
            client,
            settings,
            cache: Arc::new(MemoryCache::new(cache_ttl)),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the cache
    pub fn with_cache(mut self, cache: Arc<dyn AnalysisCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Process-wide completion settings
    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    /// Number of cached analyses, expired ones included
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Produce the two-section analysis of `institution_id` under `delta`.
    ///
    /// Only an unknown institution is an error; upstream failures come back
    /// as the degraded result.
    pub async fn analyze(
        &self,
        institution_id: &str,
        delta: f64,
        overrides: &CompletionOverrides,
    ) -> Result<AnalysisResult> {
        let delta = clamp_delta(delta);
        let key = CacheKey::new(institution_id, delta);

        if let Some(hit) = self.cache.get(&key, self.clock.now()) {
            debug!(institution_id = %institution_id, delta_pct = key.delta_pct, "Analysis cache hit");
            return Ok(hit);
        }

        let record = self
            .store
            .get_institution(institution_id)
            .ok_or_else(|| Error::InstitutionNotFound(institution_id.to_string()))?;

        let payload = build_payload(&self.store, record, delta);
        let settings = self.settings.with_overrides(overrides);
        let request = CompletionRequest::new(&settings.model, SYSTEM_PROMPT, render_user_prompt(&payload)?);

        info!(
            institution_id = %institution_id,
            delta_pct = key.delta_pct,
            model = %settings.model,
            "Requesting narrative analysis"
        );

        match self.client.complete(&settings, &request).await {
            Ok(raw) => {
                let result = split_sections(&raw);
                self.cache.put(key, result.clone(), self.clock.now());
                Ok(result)
            }
            Err(e) => {
                warn!(
                    institution_id = %institution_id,
                    delta_pct = key.delta_pct,
                    error = %e,
                    "Completion failed, returning degraded analysis"
                );
                Ok(degraded(delta))
            }
        }
    }
}

/// Fallback result for an unreachable or failing collaborator.
pub fn degraded(delta: f64) -> AnalysisResult {
    AnalysisResult {
        diagnostic: DIAGNOSTIC_UNAVAILABLE.to_string(),
        scenario: (delta != 0.0).then(|| SCENARIO_UNAVAILABLE.to_string()),
    }
}
