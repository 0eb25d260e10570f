//! Typed actions parsed from a model's decision directive.
//!
//! The completion service answers with loosely-typed JSON. It is turned
//! into [`ActionRecord`]s here, at the boundary. A record whose tag is not
//! recognised becomes [`ActionRecord::Unknown`] and is reported by the
//! dispatcher, never dropped.

use serde_json::Value;

/// Which catalog section a `list` action asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListKind {
    Tools,
    Resources,
    Prompts,
    /// Anything else, with the raw value for the error message.
    Other(String),
}

impl ListKind {
    fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("tools") => Self::Tools,
            Some("resources") => Self::Resources,
            Some("prompts") => Self::Prompts,
            _ => Self::Other(describe(value)),
        }
    }
}

/// One action from a decision directive.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRecord {
    List { kind: ListKind },
    InvokeTool { tool_name: String, tool_input: Value },
    ReadResource { resource_uri: String },
    Error { message: String },
    /// A record whose `action` tag is missing or not recognised.
    Unknown { tag: String },
}

impl ActionRecord {
    /// Normalise one directive record.
    ///
    /// Missing fields take defaults: `tool_input` an empty object,
    /// `resource_uri` and `message` the empty string. A `tool_input` that is
    /// present but not an object is kept as-is for the dispatcher to reject.
    pub fn from_value(value: &Value) -> Self {
        let Some(record) = value.as_object() else {
            return Self::Unknown {
                tag: describe(Some(value)),
            };
        };

        let text = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        match record.get("action").and_then(Value::as_str) {
            Some("list") => Self::List {
                kind: ListKind::from_value(record.get("type").or_else(|| record.get("kind"))),
            },
            Some("tool") | Some("invoke_tool") => Self::InvokeTool {
                tool_name: text("tool_name"),
                tool_input: record
                    .get("tool_input")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Default::default())),
            },
            Some("resource") | Some("read_resource") => Self::ReadResource {
                resource_uri: text("resource_uri"),
            },
            Some("error") => Self::Error {
                message: text("message"),
            },
            _ => Self::Unknown {
                tag: describe(record.get("action")),
            },
        }
    }

    /// Short name of the record's tag, for logging.
    pub fn tag(&self) -> &str {
        match self {
            Self::List { .. } => "list",
            Self::InvokeTool { .. } => "tool",
            Self::ReadResource { .. } => "resource",
            Self::Error { .. } => "error",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// What the resolver decided for one query.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Stop with this output; nothing is dispatched.
    Finish(String),
    /// Dispatch these actions in order.
    Actions(Vec<ActionRecord>),
}

impl Decision {
    /// Flatten into action records; a finish becomes a single error action.
    pub fn into_actions(self) -> Vec<ActionRecord> {
        match self {
            Self::Finish(message) => vec![ActionRecord::Error { message }],
            Self::Actions(actions) => actions,
        }
    }
}

/// Render a raw JSON value for an error message.
fn describe(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_tool_record_with_both_spellings() {
        for tag in ["tool", "invoke_tool"] {
            let record = ActionRecord::from_value(&json!({
                "action": tag,
                "tool_name": "list_all_wells",
                "tool_input": {"limit": 5}
            }));
            assert_eq!(
                record,
                ActionRecord::InvokeTool {
                    tool_name: "list_all_wells".into(),
                    tool_input: json!({"limit": 5}),
                }
            );
        }
    }

    #[test]
    fn missing_fields_take_defaults() {
        assert_eq!(
            ActionRecord::from_value(&json!({"action": "tool", "tool_name": "t"})),
            ActionRecord::InvokeTool {
                tool_name: "t".into(),
                tool_input: json!({}),
            }
        );
        assert_eq!(
            ActionRecord::from_value(&json!({"action": "resource"})),
            ActionRecord::ReadResource {
                resource_uri: String::new()
            }
        );
        assert_eq!(
            ActionRecord::from_value(&json!({"action": "error"})),
            ActionRecord::Error {
                message: String::new()
            }
        );
    }

    #[test]
    fn non_object_tool_input_is_preserved() {
        let record = ActionRecord::from_value(&json!({
            "action": "tool",
            "tool_name": "t",
            "tool_input": "not a map"
        }));
        assert!(matches!(
            record,
            ActionRecord::InvokeTool { tool_input: Value::String(_), .. }
        ));
    }

    #[test]
    fn list_kinds() {
        let kind = |v: Value| match ActionRecord::from_value(&v) {
            ActionRecord::List { kind } => kind,
            other => panic!("expected list, got {other:?}"),
        };
        assert_eq!(kind(json!({"action": "list", "type": "tools"})), ListKind::Tools);
        assert_eq!(kind(json!({"action": "list", "kind": "prompts"})), ListKind::Prompts);
        assert_eq!(
            kind(json!({"action": "list", "type": "widgets"})),
            ListKind::Other("widgets".into())
        );
        assert_eq!(kind(json!({"action": "list"})), ListKind::Other("None".into()));
    }

    #[test]
    fn unknown_tags_are_kept() {
        assert_eq!(
            ActionRecord::from_value(&json!({"action": "dance"})),
            ActionRecord::Unknown { tag: "dance".into() }
        );
        assert_eq!(
            ActionRecord::from_value(&json!({"tool_name": "t"})),
            ActionRecord::Unknown { tag: "None".into() }
        );
        assert_eq!(
            ActionRecord::from_value(&json!(42)),
            ActionRecord::Unknown { tag: "42".into() }
        );
    }

    #[test]
    fn finish_flattens_to_error_action() {
        let actions = Decision::Finish("m".into()).into_actions();
        assert_eq!(actions, vec![ActionRecord::Error { message: "m".into() }]);
    }
}
