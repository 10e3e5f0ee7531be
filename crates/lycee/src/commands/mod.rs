//! Command implementations for lycee CLI.
//!
//! Each submodule implements the logic for one command.

pub mod analyze;
pub mod list;
pub mod show;
pub mod simulate;

use anyhow::Result;
use lycee_core::DatasetStore;
use serde::Serialize;
use std::sync::Arc;

use crate::config::Config;

/// Everything a command needs
pub struct Context {
    pub store: Arc<DatasetStore>,
    pub config: Config,
    pub json: bool,
}

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format an optional enrollment figure.
pub(crate) fn fmt_count(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Format a signed percentage of an attractiveness delta.
pub(crate) fn fmt_delta(delta: f64) -> String {
    format!("{:+.0}%", delta * 100.0)
}
