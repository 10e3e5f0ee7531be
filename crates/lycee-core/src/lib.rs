//! lycee-core - Core library for lycee-insight
//!
//! This crate provides the logic shared by the lycee-server HTTP API and the
//! lycee CLI:
//!
//! - **dataset**: read-only institution fixtures
//! - **scenario**: bounded attractiveness projections
//! - **analysis**: narrative analysis orchestration (payload, prompt, cache, splitter)
//! - **completion**: OpenAI-compatible text-completion client
//! - **time**: injectable clock

pub mod analysis;
pub mod completion;
pub mod dataset;
pub mod error;
pub mod scenario;
pub mod time;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use analysis::AnalysisService;
pub use dataset::DatasetStore;
pub use error::{Error, Result};
