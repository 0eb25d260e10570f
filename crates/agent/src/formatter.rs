//! Result formatter.
//!
//! A second completion call reshapes the raw dispatch result for display.
//! The reply counts as formatted only if it is an object with both `tools`
//! and `resources` keys; otherwise the raw result is returned as JSON.

use crate::prompt::PromptTemplate;
use mcpilot_core::dispatch::DispatchResult;
use mcpilot_providers::CompletionClient;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Output for an empty dispatch result.
pub const NO_ACTION_MESSAGE: &str = "No relevant tool or action found";

pub struct ResultFormatter {
    completion: Arc<CompletionClient>,
    template: PromptTemplate,
}

impl ResultFormatter {
    pub fn new(completion: Arc<CompletionClient>, template: PromptTemplate) -> Self {
        Self {
            completion,
            template,
        }
    }

    pub async fn format(&self, result: &DispatchResult) -> String {
        if result.is_empty() {
            return NO_ACTION_MESSAGE.to_string();
        }

        let reply = self.completion.complete(&self.template.render_format(result)).await;
        if is_formatted(&reply) {
            debug!("Formatted dispatch result");
            reply.to_string()
        } else {
            warn!(reply = %reply, "Formatter reply lacks tools/resources, using raw result");
            result.to_json_string()
        }
    }
}

/// Whether `reply` has the shape of a formatted result.
pub fn is_formatted(reply: &Value) -> bool {
    reply
        .as_object()
        .is_some_and(|o| o.contains_key("tools") && o.contains_key("resources"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedProvider;
    use serde_json::json;

    fn formatter(replies: &[&str]) -> (ResultFormatter, Arc<ScriptedProvider>) {
        let provider = ScriptedProvider::new(replies);
        let completion = Arc::new(CompletionClient::new(provider.clone(), "m"));
        (
            ResultFormatter::new(completion, PromptTemplate::new("Format it.")),
            provider,
        )
    }

    fn result() -> DispatchResult {
        let mut result = DispatchResult::new();
        result.push_message("list_all_wells: List every well");
        result
    }

    #[tokio::test(start_paused = true)]
    async fn empty_result_skips_completion() {
        let (formatter, provider) = formatter(&[]);
        assert_eq!(formatter.format(&DispatchResult::new()).await, NO_ACTION_MESSAGE);
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_reply_is_serialized() {
        let (formatter, provider) =
            formatter(&[r#"{"tools": ["list_all_wells"], "resources": []}"#]);

        let output = formatter.format(&result()).await;

        assert_eq!(
            serde_json::from_str::<Value>(&output).unwrap(),
            json!({"tools": ["list_all_wells"], "resources": []})
        );
        assert_eq!(
            provider.last_prompt().unwrap(),
            "Format it.\nOutput: [\"list_all_wells: List every well\"]"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn reply_without_resources_falls_back_to_raw() {
        let (formatter, _) = formatter(&[r#"{"tools": ["list_all_wells"]}"#]);
        assert_eq!(
            formatter.format(&result()).await,
            r#"["list_all_wells: List every well"]"#
        );
    }

    #[tokio::test(start_paused = true)]
    async fn error_directive_falls_back_to_raw() {
        let (formatter, _) = formatter(&["not json"]);
        assert_eq!(
            formatter.format(&result()).await,
            r#"["list_all_wells: List every well"]"#
        );
    }

    #[test]
    fn formatted_shape() {
        assert!(is_formatted(&json!({"tools": [], "resources": [], "prompts": []})));
        assert!(!is_formatted(&json!({"tools": []})));
        assert!(!is_formatted(&json!([{"tools": [], "resources": []}])));
    }
}
