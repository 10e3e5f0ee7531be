//! Short-lived cache of analysis results.
//!
//! Entries are keyed by institution and delta in whole percent. Expiry is
//! lazy: an entry older than the TTL is reported absent on read and replaced
//! by the next write; nothing sweeps in the background.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::scenario::round_half_up;
use crate::types::AnalysisResult;

/// Default time-to-live of a cached analysis, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Cache key: institution id and `round_half_up(delta * 100)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub institution_id: String,
    pub delta_pct: i64,
}

impl CacheKey {
    pub fn new(institution_id: &str, delta: f64) -> Self {
        Self {
            institution_id: institution_id.to_string(),
            delta_pct: round_half_up(delta * 100.0),
        }
    }
}

/// Storage capability used by the analysis orchestrator.
pub trait AnalysisCache: Send + Sync {
    /// Live entry for `key` as of `now`.
    fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<AnalysisResult>;

    /// Store `value` created at `timestamp`, replacing any previous entry.
    fn put(&self, key: CacheKey, value: AnalysisResult, timestamp: DateTime<Utc>);

    /// Number of stored entries, expired ones included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: AnalysisResult,
    created_at: DateTime<Utc>,
}

/// In-process cache with a fixed TTL
#[derive(Debug)]
pub struct MemoryCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS as i64))
    }
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl AnalysisCache for MemoryCache {
    fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<AnalysisResult> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| now - entry.created_at < self.ttl)
            .map(|entry| entry.value.clone())
    }

    fn put(&self, key: CacheKey, value: AnalysisResult, timestamp: DateTime<Utc>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                value,
                created_at: timestamp,
            },
        );
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn result(text: &str) -> AnalysisResult {
        AnalysisResult {
            diagnostic: text.to_string(),
            scenario: None,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_key_rounding_boundary() {
        assert_eq!(CacheKey::new("x", 0.101), CacheKey::new("x", 0.104));
        assert_eq!(CacheKey::new("x", 0.101).delta_pct, 10);
        assert_eq!(CacheKey::new("x", 0.105).delta_pct, 11);
        assert_ne!(CacheKey::new("x", 0.104), CacheKey::new("x", 0.105));
        assert_eq!(CacheKey::new("x", -0.2).delta_pct, -20);
        assert_ne!(CacheKey::new("x", 0.1), CacheKey::new("y", 0.1));
    }

    #[test]
    fn test_get_within_ttl() {
        let cache = MemoryCache::default();
        let key = CacheKey::new("evron", 0.2);
        cache.put(key.clone(), result("cached"), t0());

        let hit = cache.get(&key, t0() + Duration::minutes(4)).unwrap();
        assert_eq!(hit.diagnostic, "cached");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entry_expires_at_ttl() {
        let cache = MemoryCache::new(Duration::minutes(5));
        let key = CacheKey::new("evron", 0.0);
        cache.put(key.clone(), result("cached"), t0());

        assert!(cache.get(&key, t0() + Duration::seconds(299)).is_some());
        assert!(cache.get(&key, t0() + Duration::minutes(5)).is_none());
        // lazy expiry keeps the entry around until overwritten
        assert_eq!(cache.len(), 1);

        cache.put(key.clone(), result("fresh"), t0() + Duration::minutes(6));
        let hit = cache.get(&key, t0() + Duration::minutes(7)).unwrap();
        assert_eq!(hit.diagnostic, "fresh");
    }

    #[test]
    fn test_missing_key() {
        let cache = MemoryCache::default();
        assert!(cache.is_empty());
        assert!(cache.get(&CacheKey::new("mayenne", 0.1), t0()).is_none());
    }
}
