//! Completion-service interaction: the only stage with network I/O.
//!
//! The wire format is the OpenAI `/chat/completions` shape, so any
//! compatible server (OpenAI itself, Ollama, vLLM, LiteLLM, LM Studio) can
//! be targeted by changing the base URL. The service is treated as an
//! opaque text-in/text-out collaborator: one request in flight at a time,
//! no retry — a failed call marks that file failed and the batch moves on.
//!
//! [`ChatCompletion`] is the seam between the driver and the network.
//! Tests inject a scripted implementation through
//! [`crate::config::ConversionConfig::client`]; production uses
//! [`HttpChatClient`], constructed once at startup and owned by the driver
//! for the lifetime of the run.

use crate::error::Cmd2SlashError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// One `{role, content}` pair in the request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
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

/// Request body for `POST {base_url}/chat/completions`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: usize,
}

/// The subset of the response body we consume: the first textual choice.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Object-safe seam over the completion service.
///
/// Errors are returned as human-readable descriptions; the driver wraps
/// them into [`crate::error::FileError::ApiFailed`] with the file's path.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send the fixed two-message prompt and return the raw reply text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, String>;
}

/// HTTP client for an OpenAI-compatible chat-completion endpoint.
pub struct HttpChatClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl HttpChatClient {
    /// Build the client. Called once at startup; a missing or empty
    /// credential is a fatal error — no files are processed without one.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        model: &str,
        temperature: f32,
        max_tokens: usize,
        timeout_secs: u64,
    ) -> Result<Self, Cmd2SlashError> {
        let key = match api_key {
            Some(k) if !k.trim().is_empty() => k.trim().to_string(),
            _ => match std::env::var("OPENAI_API_KEY") {
                Ok(k) if !k.trim().is_empty() => k.trim().to_string(),
                _ => {
                    return Err(Cmd2SlashError::MissingApiKey {
                        hint: "Set OPENAI_API_KEY or pass --api-key <KEY>.".to_string(),
                    })
                }
            },
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Cmd2SlashError::ClientBuildFailed {
                detail: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: key,
            model: model.to_string(),
            temperature,
            max_tokens,
        })
    }
}

#[async_trait]
impl ChatCompletion for HttpChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, String> {
        let messages = [ChatMessage::system(system), ChatMessage::user(user)];
        let body = ChatRequest {
            model: &self.model,
            messages: &messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            "POST {} (model {}, {} prompt chars)",
            self.endpoint,
            self.model,
            user.chars().count()
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail = detail.trim();
            return Err(if detail.is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {detail}")
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed response body: {e}"))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| "response contained no choices".to_string())
    }
}
