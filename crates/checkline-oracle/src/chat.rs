//! HTTP chat-completion implementation of [`MoveOracle`].

use std::time::Duration;

use serde::Deserialize;

use crate::{DifficultyProfile, MoveOracle, OracleError};

/// Default per-request deadline. A stalled service must not hold the
/// `thinking` flag forever; past this the session falls back to a
/// random legal move.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// A [`MoveOracle`] backed by an OpenAI-style chat-completion endpoint.
pub struct ChatOracle {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl ChatOracle {
    /// Creates a client against `endpoint` (the full completions URL)
    /// using `model`.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
        }
    }

    /// Sets the bearer token sent with each request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl MoveOracle for ChatOracle {
    async fn suggest(
        &self,
        fen: &str,
        profile: &DifficultyProfile,
    ) -> Result<String, OracleError> {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": profile.persona },
                {
                    "role": "user",
                    "content": format!(
                        "FEN: {fen}. You play the side to move. \
                         Make the best move."
                    ),
                },
            ],
            "temperature": profile.temperature,
        });
        if profile.fast_path {
            // Hint the service to skip deliberation entirely.
            body["thinking_budget"] = serde_json::json!(0);
        }

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response: ChatResponse = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(OracleError::EmptyReply)?;
        if text.trim().is_empty() {
            return Err(OracleError::EmptyReply);
        }
        tracing::debug!(reply = %text.trim(), "suggestion received");
        Ok(text)
    }
}
