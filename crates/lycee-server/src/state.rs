//! Application state.

use std::sync::Arc;
use std::time::Instant;

use lycee_core::completion::CompletionClient;
use lycee_core::{AnalysisService, DatasetStore};

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Read-only institution fixtures
    pub store: Arc<DatasetStore>,
    /// Narrative analysis orchestrator
    pub analysis: Arc<AnalysisService>,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(
        config: Config,
        store: DatasetStore,
        client: Arc<dyn CompletionClient>,
    ) -> Arc<Self> {
        let store = Arc::new(store);
        let analysis = AnalysisService::new(
            Arc::clone(&store),
            client,
            config.completion.clone(),
            config.cache_ttl,
        );
        Arc::new(Self {
            config: Arc::new(config),
            store,
            analysis: Arc::new(analysis),
            start_time: Instant::now(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use lycee_core::completion::{CompletionRequest, CompletionSettings};
    use lycee_core::types::{InstitutionMarker, InstitutionRecord};
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Completion double: fixed reply or fixed upstream status.
    pub(crate) struct StubClient {
        reply: Result<String, u16>,
        calls: AtomicUsize,
        last_settings: Mutex<Option<CompletionSettings>>,
    }

    impl StubClient {
        pub(crate) fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last_settings: Mutex::new(None),
            })
        }

        pub(crate) fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
                last_settings: Mutex::new(None),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn last_settings(&self) -> Option<CompletionSettings> {
            self.last_settings.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionClient for StubClient {
        async fn complete(
            &self,
            settings: &CompletionSettings,
            _request: &CompletionRequest,
        ) -> lycee_core::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_settings.lock().unwrap() = Some(settings.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(lycee_core::Error::completion(*status, "upstream down")),
            }
        }
    }

    /// Two institutions in division 53: `x` (baselines 100/110/120) and `evron`.
    pub(crate) fn test_store() -> DatasetStore {
        let records: Vec<InstitutionRecord> = serde_json::from_value(json!([
            {
                "institution": {"id": "x", "name": "Lycée X", "division_code": "53", "lat": 48.1, "lng": -0.7},
                "metrics": {
                    "trend_slope": 2.0, "captation_start": 1.8, "captation_end": 2.2,
                    "captation_delta_points": 0.4, "mape": 4.5, "critical_threshold": 50
                },
                "series": [
                    {"year": 2025, "actual": 95},
                    {"year": 2026, "baseline": 100},
                    {"year": 2027, "baseline": 110},
                    {"year": 2028, "baseline": 120}
                ]
            },
            {
                "institution": {"id": "evron", "name": "Evron", "division_code": "53", "lat": 48.15, "lng": -0.4},
                "metrics": {
                    "trend_slope": -3.0, "captation_start": 1.9, "captation_end": 1.1,
                    "captation_delta_points": -0.8, "mape": 7.0, "critical_threshold": 50
                },
                "series": [
                    {"year": 2025, "actual": 55},
                    {"year": 2026, "baseline": 53}
                ]
            }
        ]))
        .unwrap();
        let markers: Vec<InstitutionMarker> = serde_json::from_value(json!([
            {"id": "x", "name": "Lycée X", "division_code": "53", "lat": 48.1, "lng": -0.7},
            {"id": "evron", "name": "Evron", "division_code": "53", "lat": 48.15, "lng": -0.4}
        ]))
        .unwrap();
        let records: BTreeMap<String, InstitutionRecord> = records
            .into_iter()
            .map(|r| (r.institution.id.clone(), r))
            .collect();
        DatasetStore::from_parts(markers, records)
    }

    pub(crate) fn test_state(client: Arc<StubClient>) -> Arc<AppState> {
        AppState::new(Config::default(), test_store(), client)
    }

    #[test]
    fn test_state_shares_store_with_analysis() {
        let state = test_state(StubClient::replying("ok"));
        assert_eq!(state.store.len(), 2);
        assert_eq!(state.analysis.store().len(), 2);
        assert_eq!(state.analysis.settings(), &state.config.completion);
        assert_eq!(state.analysis.cached_entries(), 0);
    }

    #[test]
    fn test_markers_take_latest_enrollment() {
        let store = test_store();
        let x = store
            .list_institutions()
            .iter()
            .find(|m| m.id == "x")
            .unwrap();
        assert_eq!(x.current_enrollment, 95);
    }
}
