//! Action resolver: turns a query into a decision.
//!
//! The resolver renders the decision prompt, asks the completion service
//! once, and converts the reply into a [`Decision`]. Records with unknown
//! tags are kept and left to the dispatcher to report.

use crate::prompt::PromptTemplate;
use mcpilot_core::action::{ActionRecord, Decision};
use mcpilot_core::capability::CapabilityCatalog;
use mcpilot_memory::ConversationMemory;
use mcpilot_providers::CompletionClient;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Output when the completion reply is not a JSON object.
pub const INVALID_RESPONSE_MESSAGE: &str = "Error: Invalid response from completion service";

/// Output for an `error` directive that carries no message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Query processing failed";

pub struct ActionResolver {
    completion: Arc<CompletionClient>,
    template: PromptTemplate,
}

impl ActionResolver {
    pub fn new(completion: Arc<CompletionClient>, template: PromptTemplate) -> Self {
        Self {
            completion,
            template,
        }
    }

    /// Decide what to do for `query`.
    pub async fn decide(
        &self,
        query: &str,
        catalog: &CapabilityCatalog,
        memory: &ConversationMemory,
    ) -> Decision {
        let prompt = self.template.render_decision(query, catalog, memory);
        let directive = self.completion.complete(&prompt).await;
        let decision = interpret(directive);
        debug!(?decision, "Resolved decision");
        decision
    }

    /// Resolve `query` into action records.
    ///
    /// A finishing decision comes back as a single `error` record.
    pub async fn resolve(
        &self,
        query: &str,
        catalog: &CapabilityCatalog,
        memory: &ConversationMemory,
    ) -> Vec<ActionRecord> {
        self.decide(query, catalog, memory).await.into_actions()
    }
}

/// Convert a completion reply into a decision.
///
/// - not an object: finish with [`INVALID_RESPONSE_MESSAGE`]
/// - `"action": "error"`: finish with its message
/// - an `actions` array: one record per entry
/// - otherwise the object itself is the only record
pub fn interpret(directive: Value) -> Decision {
    let Value::Object(object) = directive else {
        return Decision::Finish(INVALID_RESPONSE_MESSAGE.to_string());
    };

    if object.get("action").and_then(Value::as_str) == Some("error") {
        let message = object
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ERROR_MESSAGE);
        return Decision::Finish(message.to_string());
    }

    match object.get("actions") {
        Some(Value::Array(entries)) => {
            Decision::Actions(entries.iter().map(ActionRecord::from_value).collect())
        }
        Some(other) => Decision::Actions(vec![ActionRecord::from_value(other)]),
        None => Decision::Actions(vec![ActionRecord::from_value(&Value::Object(object))]),
    }
}
