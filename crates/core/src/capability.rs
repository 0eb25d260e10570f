//! The capability catalog: a session's snapshot of what the registry offers.
//!
//! Built once at session start from `tools/list`, `resources/list` and
//! `prompts/list`, then only read. Each section keeps discovery order and
//! unique keys; tools are also indexed by name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// A tool exposed by the registry.
///
/// Tools carry no callable: invoking one means a `tools/call` request with
/// this tool's name through the session's transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON Schema of the tool's input, when the registry advertises one.
    #[serde(default, alias = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<serde_json::Value>,
}

/// A readable resource exposed by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub uri: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A prompt exposed by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
        }
    }
}

impl Resource {
    pub fn new(
        uri: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

impl PromptInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Tools, resources and prompts discovered for a session.
#[derive(Debug, Clone, Default)]
pub struct CapabilityCatalog {
    tools: Vec<Tool>,
    tool_index: HashMap<String, usize>,
    resources: Vec<Resource>,
    prompts: Vec<PromptInfo>,
}

impl CapabilityCatalog {
    /// Build a catalog, keeping the first entry for any repeated key.
    pub fn new(tools: Vec<Tool>, resources: Vec<Resource>, prompts: Vec<PromptInfo>) -> Self {
        let mut catalog = Self::default();

        for tool in tools {
            if catalog.tool_index.contains_key(&tool.name) {
                warn!(tool = %tool.name, "Duplicate tool name in registry, keeping the first");
                continue;
            }
            catalog.tool_index.insert(tool.name.clone(), catalog.tools.len());
            catalog.tools.push(tool);
        }

        for resource in resources {
            if catalog.resources.iter().any(|r| r.uri == resource.uri) {
                warn!(uri = %resource.uri, "Duplicate resource URI in registry, keeping the first");
                continue;
            }
            catalog.resources.push(resource);
        }

        for prompt in prompts {
            if catalog.prompts.iter().any(|p| p.name == prompt.name) {
                warn!(prompt = %prompt.name, "Duplicate prompt name in registry, keeping the first");
                continue;
            }
            catalog.prompts.push(prompt);
        }

        catalog
    }

    /// Look up a tool by name.
    pub fn tool(&self, name: &str) -> Option<&Tool> {
        self.tool_index.get(name).map(|&i| &self.tools[i])
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn prompts(&self) -> &[PromptInfo] {
        &self.prompts
    }

    /// Tool names in discovery order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.resources.is_empty() && self.prompts.is_empty()
    }
}
