//! Text-completion collaborator.
//!
//! The narrative analysis is produced by an OpenAI-compatible
//! `POST {endpoint}/chat/completions` service. This module holds the wire
//! types, the explicit configuration value used for every call and the
//! [`CompletionClient`] seam the orchestrator depends on.
//!
//! # Usage
//!
//! ```rust,no_run
//! use lycee_core::completion::{CompletionClient, CompletionRequest, CompletionSettings, HttpCompletionClient};
//!
//! # async fn example() -> lycee_core::Result<()> {
//! let client = HttpCompletionClient::new(std::time::Duration::from_secs(60))?;
//! let settings = CompletionSettings::default();
//! let request = CompletionRequest::new(&settings.model, "system", "user");
//! let text = client.complete(&settings, &request).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[cfg(feature = "client")]
mod http;

#[cfg(feature = "client")]
pub use http::HttpCompletionClient;

/// Default base address of the completion proxy
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8002/v1";

/// Default model name
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Sampling temperature used for analyses
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Output cap used for analyses
pub const ANALYSIS_MAX_OUTPUT_TOKENS: u32 = 1500;

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Settings for one outbound call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSettings {
    /// Bearer token, sent only when present
    pub api_key: Option<String>,
    /// Base address, or a full `.../chat/completions` URL
    pub api_endpoint: String,
    pub model: String,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl CompletionSettings {
    /// Apply per-request overrides. Blank override values are ignored.
    pub fn with_overrides(&self, overrides: &CompletionOverrides) -> Self {
        Self {
            api_key: non_blank(&overrides.api_key).or_else(|| self.api_key.clone()),
            api_endpoint: non_blank(&overrides.api_endpoint)
                .unwrap_or_else(|| self.api_endpoint.clone()),
            model: non_blank(&overrides.model).unwrap_or_else(|| self.model.clone()),
        }
    }

    /// Full URL of the chat completions resource.
    pub fn completions_url(&self) -> String {
        let base = self.api_endpoint.trim().trim_end_matches('/');
        if base.ends_with(CHAT_COMPLETIONS_PATH) {
            base.to_string()
        } else {
            format!("{}{}", base, CHAT_COMPLETIONS_PATH)
        }
    }
}

/// Caller-supplied overrides of the process-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionOverrides {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_endpoint: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(rename = "max_tokens")]
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    /// Two-message exchange with the analysis sampling parameters.
    pub fn new(model: &str, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: ANALYSIS_TEMPERATURE,
            max_output_tokens: ANALYSIS_MAX_OUTPUT_TOKENS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<CompletionMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Content of the first choice, empty when the provider sent none.
    pub fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client Seam
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque text-completion function.
///
/// Any non-success status or transport failure is an error; the orchestrator
/// decides how to degrade.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        settings: &CompletionSettings,
        request: &CompletionRequest,
    ) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let base = CompletionSettings {
            api_key: Some("process-key".into()),
            ..Default::default()
        };
        let overrides = CompletionOverrides {
            api_key: Some("caller-key".into()),
            api_endpoint: Some("https://api.openai.com/v1".into()),
            model: Some("gpt-4o-mini".into()),
        };
        let merged = base.with_overrides(&overrides);
        assert_eq!(merged.api_key.as_deref(), Some("caller-key"));
        assert_eq!(merged.api_endpoint, "https://api.openai.com/v1");
        assert_eq!(merged.model, "gpt-4o-mini");
    }

    #[test]
    fn test_blank_overrides_fall_back() {
        let base = CompletionSettings {
            api_key: Some("process-key".into()),
            ..Default::default()
        };
        let overrides = CompletionOverrides {
            api_key: Some("".into()),
            api_endpoint: Some("   ".into()),
            model: None,
        };
        let merged = base.with_overrides(&overrides);
        assert_eq!(merged, base);
    }

    #[test]
    fn test_completions_url() {
        let mut settings = CompletionSettings::default();
        assert_eq!(settings.completions_url(), "http://127.0.0.1:8002/v1/chat/completions");

        settings.api_endpoint = "https://api.openai.com/v1/".into();
        assert_eq!(settings.completions_url(), "https://api.openai.com/v1/chat/completions");

        settings.api_endpoint = "https://gateway.example/v1/chat/completions".into();
        assert_eq!(settings.completions_url(), "https://gateway.example/v1/chat/completions");
    }

    #[test]
    fn test_request_wire_format() {
        let request = CompletionRequest::new("gpt-4o", "sys", "usr");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "usr");
        assert_eq!(value["max_tokens"], 1500);
        assert!((value["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_response_text() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "Bonjour"}}]}"#;
        let response: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text(), "Bonjour");

        let response: CompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(response.into_text(), "");

        let response: CompletionResponse = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert_eq!(response.into_text(), "");
    }
}
