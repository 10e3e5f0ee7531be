//! reqwest implementation of the completion client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{CompletionClient, CompletionRequest, CompletionResponse, CompletionSettings};
use crate::error::{Error, Result};

/// Upstream error bodies are truncated to this many characters in errors.
const MAX_ERROR_BODY: usize = 500;

/// HTTP client for an OpenAI-compatible completion endpoint
#[derive(Clone)]
pub struct HttpCompletionClient {
    client: reqwest::Client,
}

impl HttpCompletionClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        settings: &CompletionSettings,
        request: &CompletionRequest,
    ) -> Result<String> {
        let url = settings.completions_url();
        debug!(url = %url, model = %request.model, "Sending completion request");

        let mut builder = self.client.post(&url).json(request);
        if let Some(ref key) = settings.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::completion(status.as_u16(), truncate(&body, MAX_ERROR_BODY)));
        }

        let body: CompletionResponse = response.json().await?;
        Ok(body.into_text())
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
