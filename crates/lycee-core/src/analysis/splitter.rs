//! Splits raw model output into the diagnostic and scenario sections.
//!
//! The model is asked for a "SECTION 1 — DIAGNOSTIC" followed by an optional
//! "SECTION 2 — SCÉNARIO". Its output is free text, so the split is a
//! best-effort marker search: when no marker is found everything is
//! diagnostic.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::AnalysisResult;

/// Scenario section markers, in priority order.
pub const SCENARIO_MARKERS: [&str; 3] = ["SECTION 2", "SCÉNARIO", "SCENARIO"];

// Leftmost-first alternation: the earliest match wins and, at equal
// positions, the earlier marker in the list.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = SCENARIO_MARKERS
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i){}", alternation)).expect("marker pattern is valid")
});

/// Split `raw` into its two display sections.
pub fn split_sections(raw: &str) -> AnalysisResult {
    match find_scenario_start(raw) {
        Some(idx) => AnalysisResult {
            diagnostic: strip_section_edges(&raw[..idx]).to_string(),
            scenario: Some(raw[idx..].trim().to_string()),
        },
        None => AnalysisResult {
            diagnostic: raw.trim().to_string(),
            scenario: None,
        },
    }
}

/// Byte offset of the first marker that does not start the text.
fn find_scenario_start(raw: &str) -> Option<usize> {
    MARKER_RE
        .find_iter(raw)
        .map(|m| m.start())
        .find(|&start| start > 0)
}

/// Trim whitespace, dashes and heading hashes left around a section boundary.
fn strip_section_edges(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || matches!(c, '—' | '-' | '#'))
}
