//! Dispatch results: the ordered outputs of executing resolved actions.

use serde::{Deserialize, Serialize};
use crate::transport::JsonMap;

/// One output of a dispatched action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DispatchEntry {
    /// A listing line or an error message.
    Message(String),
    /// A raw registry result.
    Payload(serde_json::Value),
}

/// Ordered outputs of one dispatch pass, in action order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DispatchResult {
    entries: Vec<DispatchEntry>,
}

impl DispatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_message(&mut self, message: impl Into<String>) {
        self.entries.push(DispatchEntry::Message(message.into()));
    }

    pub fn push_payload(&mut self, payload: impl Into<serde_json::Value>) {
        self.entries.push(DispatchEntry::Payload(payload.into()));
    }

    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compact JSON array form, as fed to the formatter and used as the
    /// fallback output.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }
}

impl From<Vec<DispatchEntry>> for DispatchResult {
    fn from(entries: Vec<DispatchEntry>) -> Self {
        Self { entries }
    }
}

/// A tool call the caller must perform through `tools/call`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub name: String,
    pub params: JsonMap,
}

impl ToolInvocation {
    /// The `tools/call` parameters: `{name, params}`.
    pub fn to_call_params(&self) -> JsonMap {
        let mut params = JsonMap::new();
        params.insert("name".into(), self.name.clone().into());
        params.insert("params".into(), serde_json::Value::Object(self.params.clone()));
        params
    }
}

/// What a dispatch pass produced.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A matched tool call short-circuited the pass.
    Invoke(ToolInvocation),
    /// Every record was handled in place.
    Completed(DispatchResult),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_as_heterogeneous_array() {
        let mut result = DispatchResult::new();
        result.push_message("wells: List wells");
        result.push_payload(json!({"contents": [{"text": "hi"}]}));
        assert_eq!(
            result.to_json_string(),
            r#"["wells: List wells",{"contents":[{"text":"hi"}]}]"#
        );
    }

    #[test]
    fn tool_call_params_shape() {
        let invocation = ToolInvocation {
            name: "list_all_wells".into(),
            params: JsonMap::new(),
        };
        assert_eq!(
            serde_json::Value::Object(invocation.to_call_params()),
            json!({"name": "list_all_wells", "params": {}})
        );
    }
}
