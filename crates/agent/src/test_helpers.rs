//! Shared test doubles for the pipeline stages.

use async_trait::async_trait;
use mcpilot_core::error::ProviderError;
use mcpilot_core::provider::{Provider, ProviderRequest, ProviderResponse};
use mcpilot_core::transport::{JsonMap, Transport};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A provider that answers with scripted replies, in order.
///
/// Records the instruction of every request.
/// Panics if more calls are made than replies provided.
pub struct ScriptedProvider {
    replies: Vec<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut prompts = self.prompts.lock().unwrap();
        let n = prompts.len();
        let Some(reply) = self.replies.get(n) else {
            panic!(
                "ScriptedProvider: no more replies (call #{n}, have {})",
                self.replies.len()
            );
        };
        prompts.push(
            request
                .messages
                .first()
                .map(|m| m.content.clone())
                .unwrap_or_default(),
        );
        Ok(ProviderResponse {
            content: reply.clone(),
            model: request.model,
        })
    }
}

/// A transport answering each method with a fixed result.
///
/// Unknown methods get the empty map, like an unreachable registry.
pub struct ScriptedTransport {
    results: HashMap<String, JsonMap>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new(results: impl IntoIterator<Item = (&'static str, Value)>) -> Arc<Self> {
        Arc::new(Self {
            results: results
                .into_iter()
                .map(|(method, result)| {
                    (
                        method.to_string(),
                        result.as_object().cloned().unwrap_or_default(),
                    )
                })
                .collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::new([])
    }

    /// `(method, params)` of every call so far.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn call(&self, method: &str, params: JsonMap, _endpoint: Option<&str>) -> JsonMap {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), Value::Object(params)));
        self.results.get(method).cloned().unwrap_or_default()
    }
}
