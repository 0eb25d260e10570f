//! Action dispatcher.
//!
//! Records are handled in order and their outputs accumulate into one
//! [`DispatchResult`]. The first `tool` record naming a catalog tool with
//! an object input ends the pass: the caller performs that call through
//! [`ActionDispatcher::invoke`] and everything gathered so far is dropped.

use mcpilot_core::action::{ActionRecord, ListKind};
use mcpilot_core::capability::CapabilityCatalog;
use mcpilot_core::dispatch::{DispatchOutcome, DispatchResult, ToolInvocation};
use mcpilot_core::transport::{JsonMap, Transport, methods};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ActionDispatcher {
    transport: Arc<dyn Transport>,
}

impl ActionDispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Dispatch `records` against `catalog`.
    pub async fn dispatch(&self, records: &[ActionRecord], catalog: &CapabilityCatalog) -> DispatchOutcome {
        let mut result = DispatchResult::new();

        for record in records {
            debug!(action = record.tag(), "Dispatching action");
            match record {
                ActionRecord::List { kind } => list(&mut result, kind, catalog),

                ActionRecord::InvokeTool {
                    tool_name,
                    tool_input,
                } => {
                    if catalog.tool(tool_name).is_none() {
                        warn!(tool = %tool_name, "Tool not found in catalog");
                        result.push_message(format!("Error: Tool {tool_name} not found"));
                        continue;
                    }
                    match tool_input {
                        Value::Object(params) => {
                            info!(tool = %tool_name, "Short-circuiting to tool call");
                            return DispatchOutcome::Invoke(ToolInvocation {
                                name: tool_name.clone(),
                                params: params.clone(),
                            });
                        }
                        other => {
                            warn!(tool = %tool_name, input = %other, "Tool input is not an object");
                            result.push_message(format!("Error: Invalid tool input for {tool_name}"));
                        }
                    }
                }

                ActionRecord::ReadResource { resource_uri } => {
                    if resource_uri.is_empty() {
                        result.push_message("Error: No resource URI provided");
                    } else {
                        let contents = self.read_resource(resource_uri).await;
                        result.push_payload(Value::Object(contents));
                    }
                }

                ActionRecord::Error { message } => result.push_message(message.clone()),

                ActionRecord::Unknown { tag } => {
                    warn!(tag = %tag, "Unrecognised action");
                    result.push_message(format!("Error: Invalid action {tag}"));
                }
            }
        }

        DispatchOutcome::Completed(result)
    }

    /// Perform a short-circuited tool call through `tools/call`.
    pub async fn invoke(&self, invocation: &ToolInvocation) -> JsonMap {
        info!(tool = %invocation.name, "Invoking tool");
        self.transport
            .call(methods::TOOLS_CALL, invocation.to_call_params(), None)
            .await
    }

    async fn read_resource(&self, uri: &str) -> JsonMap {
        let mut params = JsonMap::new();
        params.insert("uri".into(), Value::String(uri.to_string()));
        self.transport.call(methods::RESOURCES_READ, params, None).await
    }
}

fn list(result: &mut DispatchResult, kind: &ListKind, catalog: &CapabilityCatalog) {
    match kind {
        ListKind::Tools if catalog.tools().is_empty() => result.push_message("No tools available"),
        ListKind::Tools => {
            for tool in catalog.tools() {
                result.push_message(format!("{}: {}", tool.name, tool.description));
            }
        }
        ListKind::Resources if catalog.resources().is_empty() => {
            result.push_message("No resources available")
        }
        ListKind::Resources => {
            for resource in catalog.resources() {
                result.push_message(format!("{}: {}", resource.uri, resource.description));
            }
        }
        ListKind::Prompts if catalog.prompts().is_empty() => {
            result.push_message("No prompts available")
        }
        ListKind::Prompts => {
            for prompt in catalog.prompts() {
                result.push_message(format!("{}: {}", prompt.name, prompt.description));
            }
        }
        ListKind::Other(kind) => result.push_message(format!("Error: Invalid list type {kind}")),
    }
}
