//! OpenAI-compatible provider implementation.
//!
//! Works with xAI, OpenAI, OpenRouter, and any endpoint exposing the
//! `/chat/completions` contract. One call is one HTTP request; the
//! completion client decides whether to try again.

use async_trait::async_trait;
use mcpilot_config::{AppConfig, ConfigError};
use mcpilot_core::error::ProviderError;
use mcpilot_core::message::Message;
use mcpilot_core::provider::*;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// An OpenAI-compatible chat-completion provider.
pub struct OpenAiCompatProvider {
    name: String,
    url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a provider posting to `url` (the full `/chat/completions` URL).
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: name.into(),
            url: url.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create an xAI provider (convenience constructor).
    pub fn xai(api_key: impl Into<String>) -> Self {
        Self::new(
            "xai",
            "https://api.x.ai/v1/chat/completions",
            api_key,
            Duration::from_secs(10),
        )
    }

    /// Build the provider described by `config`.
    ///
    /// Fails when no API key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key()?;
        Ok(Self::new(
            "completion",
            &config.completion_url,
            api_key,
            config.completion.timeout(),
        ))
    }

    /// Build the chat-completions request body.
    fn to_api_body(request: &ProviderRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
            "top_p": request.top_p,
            "frequency_penalty": request.frequency_penalty,
            "presence_penalty": request.presence_penalty,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if request.json_object {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }

        body
    }

    fn to_api_messages(messages: &[Message]) -> Vec<serde_json::Value> {
        messages
            .iter()
            .map(|m| serde_json::json!({"role": m.role, "content": m.content}))
            .collect()
    }
}

#[async_trait]
impl mcpilot_core::Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let body = Self::to_api_body(&request);

        debug!(provider = %self.name, model = %request.model, "Sending completion request");
        trace!(body = %body, "Completion request body");

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 1,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        // A reply without content reads as an empty object, not a failure.
        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| "{}".to_string());

        debug!(provider = %self.name, content = %content, "Completion response");

        Ok(ProviderResponse {
            content,
            model: api_response.model.unwrap_or(request.model),
        })
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}
