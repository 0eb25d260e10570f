//! Completion client: one "decide" request with retry and JSON parsing.
//!
//! Every instruction goes out as a single system message with fixed
//! sampling and a forced JSON-object reply. Transport failures are retried
//! with exponential backoff. A reply that is not valid JSON is reported
//! at once, since asking again would not repair it.

use mcpilot_config::{AppConfig, SamplingConfig};
use mcpilot_core::message::Message;
use mcpilot_core::provider::{Provider, ProviderRequest};
use mcpilot_core::retry::RetryPolicy;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Message of the directive returned when the reply is not valid JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON response from completion service";

/// Message of the directive returned when every attempt failed.
pub const EXHAUSTED_MESSAGE: &str = "Failed to process request";

/// Sends instructions to a [`Provider`] and parses the JSON directive.
pub struct CompletionClient {
    provider: Arc<dyn Provider>,
    model: String,
    sampling: SamplingConfig,
    retry: RetryPolicy,
}

impl CompletionClient {
    /// Create a client with default sampling and a 3-attempt, 1s-base
    /// exponential backoff.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            sampling: SamplingConfig::default(),
            retry: RetryPolicy::exponential(3, Duration::from_secs(1)),
        }
    }

    /// Create a client using the model, sampling and retry settings of `config`.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider, &config.default_model)
            .with_sampling(config.sampling.clone())
            .with_retry_policy(config.completion.retry_policy())
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn request(&self, instruction: &str) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::system(instruction)],
            temperature: self.sampling.temperature,
            max_tokens: Some(self.sampling.max_tokens),
            top_p: self.sampling.top_p,
            frequency_penalty: self.sampling.frequency_penalty,
            presence_penalty: self.sampling.presence_penalty,
            json_object: true,
        }
    }

    /// Send `instruction` and return the parsed JSON reply.
    ///
    /// Never fails: an unparseable reply or exhausted retries come back as
    /// an `{"action": "error", "message": ...}` directive. A reply that is
    /// valid JSON but not an object is returned unchanged for the caller to
    /// reject.
    pub async fn complete(&self, instruction: &str) -> Value {
        let request = self.request(instruction);
        debug!(
            provider = self.provider.name(),
            model = %self.model,
            prompt_len = instruction.len(),
            "Requesting completion"
        );

        let outcome = self
            .retry
            .run("completion", |attempt| {
                let provider = Arc::clone(&self.provider);
                let request = request.clone();
                async move {
                    debug!(attempt, "Completion attempt");
                    provider.complete(request).await
                }
            })
            .await;

        match outcome {
            Ok(response) => {
                debug!(model = %response.model, "Completion received");
                match serde_json::from_str::<Value>(&response.content) {
                    Ok(directive) => directive,
                    Err(e) => {
                        warn!(error = %e, content = %response.content, "Completion reply is not valid JSON");
                        error_directive(INVALID_JSON_MESSAGE)
                    }
                }
            }
            Err(_) => error_directive(EXHAUSTED_MESSAGE),
        }
    }
}

fn error_directive(message: &str) -> Value {
    json!({"action": "error", "message": message})
}
