//! Capability discovery: one snapshot of the registry per session.
//!
//! An unreachable registry and an empty one look the same here: both yield
//! empty sections, because the transport reports failure as an empty result.

use mcpilot_core::capability::{CapabilityCatalog, PromptInfo, Resource, Tool};
use mcpilot_core::transport::{JsonMap, Transport, methods};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

/// Fetch tools, resources and prompts and build the session catalog.
pub async fn discover(transport: &dyn Transport, endpoint: Option<&str>) -> CapabilityCatalog {
    let tools: Vec<Tool> = list(transport, methods::TOOLS_LIST, "tools", endpoint).await;
    let resources: Vec<Resource> =
        list(transport, methods::RESOURCES_LIST, "resources", endpoint).await;
    let prompts: Vec<PromptInfo> = list(transport, methods::PROMPTS_LIST, "prompts", endpoint).await;

    let catalog = CapabilityCatalog::new(tools, resources, prompts);
    info!(
        tools = ?catalog.tool_names(),
        resources = ?catalog.resources().iter().map(|r| r.uri.as_str()).collect::<Vec<_>>(),
        prompts = ?catalog.prompts().iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        "Discovered capabilities"
    );
    catalog
}

/// Call a `*/list` method and decode the entries under `key`.
///
/// Entries that do not decode are skipped.
async fn list<T: DeserializeOwned>(
    transport: &dyn Transport,
    method: &str,
    key: &str,
    endpoint: Option<&str>,
) -> Vec<T> {
    let result = transport.call(method, JsonMap::new(), endpoint).await;
    let Some(entries) = result.get(key).and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(method, entry = %entry, error = %e, "Skipping malformed registry entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers each method with a fixed result.
    struct FixedTransport {
        results: HashMap<&'static str, serde_json::Value>,
        endpoints: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn call(&self, method: &str, _params: JsonMap, endpoint: Option<&str>) -> JsonMap {
            self.endpoints.lock().unwrap().push(endpoint.map(String::from));
            self.results
                .get(method)
                .and_then(|v| v.as_object().cloned())
                .unwrap_or_default()
        }
    }

    #[tokio::test]
    async fn builds_catalog_from_three_lists() {
        let transport = FixedTransport {
            results: HashMap::from([
                (
                    methods::TOOLS_LIST,
                    json!({"tools": [
                        {"name": "list_all_wells", "description": "List every well"},
                        {"description": "no name, skipped"},
                        {"name": "get_well"}
                    ]}),
                ),
                (
                    methods::RESOURCES_LIST,
                    json!({"resources": [{"uri": "wells://all", "name": "wells", "description": "All wells"}]}),
                ),
                (
                    methods::PROMPTS_LIST,
                    json!({"prompts": [{"name": "summarize", "description": "Summarize a well"}]}),
                ),
            ]),
            endpoints: Mutex::new(Vec::new()),
        };

        let catalog = discover(&transport, Some("http://registry/mcp/")).await;

        assert_eq!(catalog.tool_names(), vec!["list_all_wells", "get_well"]);
        assert_eq!(catalog.tool("get_well").unwrap().description, "");
        assert_eq!(catalog.resources()[0].uri, "wells://all");
        assert_eq!(catalog.prompts()[0].name, "summarize");
        assert!(
            transport
                .endpoints
                .lock()
                .unwrap()
                .iter()
                .all(|e| e.as_deref() == Some("http://registry/mcp/"))
        );
    }

    #[tokio::test]
    async fn unreachable_registry_gives_empty_catalog() {
        let transport = FixedTransport {
            results: HashMap::new(),
            endpoints: Mutex::new(Vec::new()),
        };
        let catalog = discover(&transport, None).await;
        assert!(catalog.is_empty());
        assert_eq!(transport.endpoints.lock().unwrap().len(), 3);
    }
}
