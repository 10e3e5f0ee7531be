//! Narrative analysis.
//!
//! - **payload**: structured JSON handed to the language model
//! - **prompt**: fixed system and user instructions
//! - **splitter**: diagnostic / scenario section split of the reply
//! - **cache**: short-lived result cache
//! - **service**: the orchestrator tying them together

pub mod cache;
pub mod payload;
pub mod prompt;
pub mod service;
pub mod splitter;

pub use cache::{AnalysisCache, CacheKey, MemoryCache, DEFAULT_TTL_SECS};
pub use payload::{build_payload, AnalysisPayload};
pub use service::{AnalysisService, DIAGNOSTIC_UNAVAILABLE, SCENARIO_UNAVAILABLE};
pub use splitter::split_sections;
