//! Instruction templates.
//!
//! A template containing any known `{placeholder}` is filled in place.
//! Anything else gets the context appended as labelled sections, so a plain
//! list of instructions works without knowing the placeholder names.

use mcpilot_core::capability::CapabilityCatalog;
use mcpilot_core::dispatch::DispatchResult;
use mcpilot_memory::ConversationMemory;

/// Placeholders understood by [`PromptTemplate::render_decision`].
pub const PLACEHOLDERS: [&str; 7] = [
    "tools",
    "resources",
    "prompts",
    "history",
    "query",
    "tool_names",
    "agent_scratchpad",
];

/// An instruction template, rendered deterministically from its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Whether the template names at least one known placeholder.
    pub fn uses_placeholders(&self) -> bool {
        PLACEHOLDERS
            .iter()
            .any(|name| self.text.contains(&format!("{{{name}}}")))
    }

    /// Render the decision prompt for one query.
    pub fn render_decision(
        &self,
        query: &str,
        catalog: &CapabilityCatalog,
        memory: &ConversationMemory,
    ) -> String {
        let tools = render_tools(catalog);
        let resources = render_resources(catalog);
        let prompts = render_prompts(catalog);
        let history = memory.render();
        let tool_names = render_tool_names(catalog);

        if self.uses_placeholders() {
            return substitute(
                &self.text,
                &[
                    ("tools", tools.as_str()),
                    ("resources", resources.as_str()),
                    ("prompts", prompts.as_str()),
                    ("history", history.as_str()),
                    ("query", query),
                    ("tool_names", tool_names.as_str()),
                    ("agent_scratchpad", ""),
                ],
            );
        }

        let mut prompt = self.text.clone();
        for (label, body) in [
            ("Tools", tools.as_str()),
            ("Resources", resources.as_str()),
            ("Prompts", prompts.as_str()),
            ("Previous conversation", history.as_str()),
            ("Query", query),
            ("Tool names", tool_names.as_str()),
            ("Agent scratchpad", ""),
        ] {
            prompt.push_str(&format!("\n{label}: {body}"));
        }
        prompt
    }

    /// Render the formatting prompt for a dispatch result.
    pub fn render_format(&self, result: &DispatchResult) -> String {
        format!("{}\nOutput: {}", self.text, result.to_json_string())
    }
}

pub fn render_tools(catalog: &CapabilityCatalog) -> String {
    if catalog.tools().is_empty() {
        return "No tools available.".to_string();
    }
    catalog
        .tools()
        .iter()
        .map(|t| format!("- Name: {}, Description: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_resources(catalog: &CapabilityCatalog) -> String {
    if catalog.resources().is_empty() {
        return "No resources available.".to_string();
    }
    catalog
        .resources()
        .iter()
        .map(|r| format!("- URI: {}, Name: {}, Description: {}", r.uri, r.name, r.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_prompts(catalog: &CapabilityCatalog) -> String {
    if catalog.prompts().is_empty() {
        return "No prompts available.".to_string();
    }
    catalog
        .prompts()
        .iter()
        .map(|p| format!("- Name: {}, Description: {}", p.name, p.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_tool_names(catalog: &CapabilityCatalog) -> String {
    let names = catalog.tool_names();
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}

/// Replace `{name}` for each known name. `{{` and `}}` become single
/// braces; any other brace sequence is copied through unchanged.
fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }

        if tail.starts_with('{') {
            if let Some(end) = tail.find('}') {
                let name = &tail[1..end];
                if let Some((_, value)) = values.iter().find(|(key, _)| *key == name) {
                    out.push_str(value);
                    rest = &tail[end + 1..];
                    continue;
                }
            }
        }

        out.push_str(&tail[..1]);
        rest = &tail[1..];
    }

    out.push_str(rest);
    out
}
