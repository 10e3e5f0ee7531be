//! Shared fixtures and fakes for unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::completion::{CompletionClient, CompletionRequest, CompletionSettings};
use crate::dataset::DatasetStore;
use crate::error::{Error, Result};
use crate::time::Clock;
use crate::types::{
    InstitutionInfo, InstitutionMarker, InstitutionMetrics, InstitutionRecord, SeriesPoint,
};

fn record(
    id: &str,
    name: &str,
    division: &str,
    captation_end: f64,
    series: Vec<SeriesPoint>,
) -> InstitutionRecord {
    InstitutionRecord {
        institution: InstitutionInfo {
            id: id.into(),
            name: name.into(),
            division_code: division.into(),
            lat: 47.5,
            lng: -0.8,
        },
        metrics: InstitutionMetrics {
            trend_slope: -1.5,
            captation_start: 2.0,
            captation_end,
            captation_delta_points: captation_end - 2.0,
            mape: 7.2,
            critical_threshold: 50,
        },
        series,
    }
}

/// Four institutions: two sharing division 53, one without projections and
/// the `x` institution with baselines 100/110/120.
pub(crate) fn sample_store() -> DatasetStore {
    use SeriesPoint as P;

    let records = [
        record(
            "evron",
            "Evron",
            "53",
            1.1,
            vec![
                P::historical(2023, 62),
                P::historical(2024, 58),
                P::historical(2025, 55),
                P::projected(2026, 53),
                P::projected(2027, 50),
                P::projected(2028, 48),
            ],
        ),
        record(
            "mayenne",
            "Mayenne",
            "53",
            2.4,
            vec![
                P::historical(2024, 135),
                P::historical(2025, 140),
                P::projected(2026, 144),
                P::projected(2027, 147),
                P::projected(2028, 150),
            ],
        ),
        record("sable", "Sablé-sur-Sarthe", "72", 1.8, vec![P::historical(2025, 80)]),
        record(
            "x",
            "Lycée X",
            "85",
            1.0,
            vec![
                P::historical(2025, 95),
                P::projected(2026, 100),
                P::projected(2027, 110),
                P::projected(2028, 120),
            ],
        ),
    ];

    let markers = records
        .iter()
        .map(|r| InstitutionMarker {
            id: r.institution.id.clone(),
            name: r.institution.name.clone(),
            division_code: r.institution.division_code.clone(),
            division_name: None,
            region: Some("Pays de la Loire".into()),
            lat: r.institution.lat,
            lng: r.institution.lng,
            current_enrollment: 0,
        })
        .collect();

    let records: BTreeMap<String, InstitutionRecord> = records
        .into_iter()
        .map(|r| (r.institution.id.clone(), r))
        .collect();

    DatasetStore::from_parts(markers, records)
}

/// Completion client returning a fixed reply, or failing on demand.
pub(crate) struct FakeCompletionClient {
    reply: Mutex<Result<String>>,
    calls: AtomicUsize,
    last_settings: Mutex<Option<CompletionSettings>>,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl FakeCompletionClient {
    pub(crate) fn replying(text: &str) -> Self {
        Self {
            reply: Mutex::new(Ok(text.to_string())),
            calls: AtomicUsize::new(0),
            last_settings: Mutex::new(None),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn failing(status: u16) -> Self {
        let fake = Self::replying("");
        fake.fail_with(status);
        fake
    }

    pub(crate) fn fail_with(&self, status: u16) {
        *self.reply.lock().unwrap() = Err(Error::completion(status, "upstream failure"));
    }

    pub(crate) fn reply_with(&self, text: &str) {
        *self.reply.lock().unwrap() = Ok(text.to_string());
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_settings(&self) -> Option<CompletionSettings> {
        self.last_settings.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletionClient {
    async fn complete(
        &self,
        settings: &CompletionSettings,
        request: &CompletionRequest,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_settings.lock().unwrap() = Some(settings.clone());
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &*self.reply.lock().unwrap() {
            Ok(text) => Ok(text.clone()),
            Err(Error::Completion { status, body }) => Err(Error::completion(*status, body.clone())),
            Err(other) => Err(Error::Transport(other.to_string())),
        }
    }
}

/// Clock that only moves when told to.
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
