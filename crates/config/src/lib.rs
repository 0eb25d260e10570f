//! Configuration loading, validation, and management for mcpilot.
//!
//! Settings are layered, lowest priority first:
//! 1. built-in defaults
//! 2. a `.env` file in the working directory
//! 3. process environment variables
//! 4. the config file (`mcpilot.toml`, or `.json`): every key that is present
//!    and non-empty overwrites the layers below
//!
//! On a hosted deployment (`WEBSITE_HOSTNAME` / `WEBSITE_SITE_NAME` set) only
//! defaults and real environment variables apply.

use mcpilot_core::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables that mark a hosted deployment.
const HOSTED_MARKERS: [&str; 2] = ["WEBSITE_HOSTNAME", "WEBSITE_SITE_NAME"];

/// The root configuration structure.
///
/// Maps directly to `mcpilot.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bearer credential for the completion endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier sent with every completion request
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Capability registry endpoint
    #[serde(default = "default_mcp_server")]
    pub default_mcp_server: String,

    /// Chat-completions endpoint
    #[serde(default = "default_completion_url")]
    pub completion_url: String,

    /// Number of past turns kept in conversation memory
    #[serde(default = "default_memory_window")]
    pub memory_window: usize,

    /// Decision instruction, one line per entry
    #[serde(default = "default_orchestrator_prompts")]
    pub orchestrator_prompts: Vec<String>,

    /// Formatting instruction, one line per entry
    #[serde(default = "default_formatter_prompts")]
    pub formatter_prompts: Vec<String>,

    #[serde(default)]
    pub sampling: SamplingConfig,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub completion: CompletionConfig,
}

fn default_model() -> String {
    "grok-3-latest".into()
}
fn default_mcp_server() -> String {
    "http://0.0.0.0:8000/mcp/".into()
}
fn default_completion_url() -> String {
    "https://api.x.ai/v1/chat/completions".into()
}
fn default_memory_window() -> usize {
    5
}

fn default_orchestrator_prompts() -> Vec<String> {
    [
        "You route a user's query to the tools, resources and prompts of an MCP server.",
        "Answer with exactly one JSON object and nothing else.",
        r#"To list capabilities answer {"action": "list", "type": "tools"}, using "resources" or "prompts" as the type when asked for those."#,
        r#"To call a tool answer {"action": "tool", "tool_name": "<name>", "tool_input": {<arguments>}}."#,
        r#"To read a resource answer {"action": "resource", "resource_uri": "<uri>"}."#,
        r#"Several steps may be combined as {"actions": [<action>, <action>]}."#,
        r#"If nothing fits answer {"action": "error", "message": "<reason>"}."#,
        "Only use tool names from the tool names list. Use the previous conversation to resolve references.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_formatter_prompts() -> Vec<String> {
    [
        "You format the raw output of MCP actions for display.",
        r#"Answer with exactly one JSON object of the form {"tools": [], "resources": [], "prompts": [], "results": []}."#,
        "Always include the tools and resources keys, with empty lists when there is nothing to show.",
        "Keep every value from the output and do not invent entries.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default)]
    pub frequency_penalty: f32,

    #[serde(default)]
    pub presence_penalty: f32,
}

fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    512
}
fn default_top_p() -> f32 {
    1.0
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

/// Retry and timeout settings for the registry transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_attempts")]
    pub max_attempts: u32,

    /// Fixed wait between attempts
    #[serde(default = "default_delay_secs")]
    pub retry_delay_secs: u64,

    /// Per-attempt timeout
    #[serde(default = "default_transport_timeout")]
    pub timeout_secs: u64,
}

fn default_attempts() -> u32 {
    3
}
fn default_delay_secs() -> u64 {
    1
}
fn default_transport_timeout() -> u64 {
    5
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_attempts(),
            retry_delay_secs: default_delay_secs(),
            timeout_secs: default_transport_timeout(),
        }
    }
}

impl TransportConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.max_attempts, Duration::from_secs(self.retry_delay_secs))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Retry and timeout settings for the completion client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_attempts")]
    pub max_attempts: u32,

    /// First backoff delay; doubles after each failure
    #[serde(default = "default_delay_secs")]
    pub base_delay_secs: u64,

    /// Per-attempt timeout
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

fn default_completion_timeout() -> u64 {
    10
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_attempts(),
            base_delay_secs: default_delay_secs(),
            timeout_secs: default_completion_timeout(),
        }
    }
}

impl CompletionConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(self.max_attempts, Duration::from_secs(self.base_delay_secs))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_model", &self.default_model)
            .field("default_mcp_server", &self.default_mcp_server)
            .field("completion_url", &self.completion_url)
            .field("memory_window", &self.memory_window)
            .field("orchestrator_prompts", &self.orchestrator_prompts.len())
            .field("formatter_prompts", &self.formatter_prompts.len())
            .field("sampling", &self.sampling)
            .field("transport", &self.transport)
            .field("completion", &self.completion)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration using the process environment and a `.env` file
    /// in the working directory.
    ///
    /// `path` defaults to `mcpilot.toml` in the working directory.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let default_path = Self::default_path();
        let path = path.unwrap_or(&default_path);
        Self::load_layered(path, Path::new(".env"), |key| std::env::var(key).ok())
    }

    /// Load configuration from `path` with `dotenv` as the `.env` file and
    /// `env` as the process environment.
    ///
    /// A non-empty environment variable wins over the same key in the
    /// `.env` file. On a hosted deployment the `.env` file is not read.
    pub fn load_layered<F>(path: &Path, dotenv: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let hosted = HOSTED_MARKERS.iter().any(|k| env(k).is_some());
        let dotenv_vars = if hosted {
            HashMap::new()
        } else {
            read_dotenv(dotenv)
        };

        Self::load_with(path, |key| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| dotenv_vars.get(key).cloned())
        })
    }

    /// Load configuration from `path`, reading environment variables through
    /// `env`.
    pub fn load_with<F>(path: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(model) = lookup("DEFAULT_MODEL") {
            config.default_model = model;
        }
        if let Some(server) = lookup("DEFAULT_MCP_SERVER") {
            config.default_mcp_server = server;
        }
        if let Some(url) = lookup("MCPILOT_COMPLETION_URL") {
            config.completion_url = url;
        }
        config.api_key = lookup("XAI_API_KEY").or_else(|| lookup("MCPILOT_API_KEY"));

        let hosted = HOSTED_MARKERS.iter().any(|k| lookup(k).is_some());
        if hosted {
            tracing::info!("Hosted environment detected, skipping config file");
        } else if path.exists() {
            config = config.overlay_file(path)?;
        } else {
            tracing::info!("No config file found at {}, using defaults", path.display());
        }

        tracing::debug!(api_key = redact(&config.api_key), model = %config.default_model, "Configuration loaded");
        config.validate()?;
        Ok(config)
    }

    /// Overwrite settings with every present, non-empty key of the file.
    fn overlay_file(self, path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let parse_error = |reason: String| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason,
        };

        let mut file: Value = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
        } else {
            toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
        };

        // Older config files name the credential after the provider.
        if let Some(table) = file.as_object_mut() {
            if let Some(key) = table.remove("xai_api_key") {
                table.entry("api_key").or_insert(key);
            }
        }

        let mut merged = serde_json::to_value(&self).map_err(|e| parse_error(e.to_string()))?;
        merge_non_empty(&mut merged, file);
        serde_json::from_value(merged).map_err(|e| parse_error(e.to_string()))
    }

    /// Default config file path: `mcpilot.toml` in the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("mcpilot.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.orchestrator_prompts.iter().all(|p| p.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "orchestrator_prompts must not be empty".into(),
            ));
        }

        if self.formatter_prompts.iter().all(|p| p.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "formatter_prompts must not be empty".into(),
            ));
        }

        if self.sampling.temperature < 0.0 || self.sampling.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "sampling.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.memory_window == 0 {
            return Err(ConfigError::ValidationError(
                "memory_window must be at least 1".into(),
            ));
        }

        if self.transport.max_attempts == 0 || self.completion.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "max_attempts must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// The API key, or an error when none was configured.
    ///
    /// A missing key is fatal for anything that talks to the completion
    /// endpoint, and is checked once at startup.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    /// The decision instruction template.
    pub fn instruction_template(&self) -> String {
        self.orchestrator_prompts.join("\n")
    }

    /// The formatting instruction template.
    pub fn formatter_template(&self) -> String {
        self.formatter_prompts.join("\n")
    }

    /// Generate a default config TOML string (for `init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            default_mcp_server: default_mcp_server(),
            completion_url: default_completion_url(),
            memory_window: default_memory_window(),
            orchestrator_prompts: default_orchestrator_prompts(),
            formatter_prompts: default_formatter_prompts(),
            sampling: SamplingConfig::default(),
            transport: TransportConfig::default(),
            completion: CompletionConfig::default(),
        }
    }
}

/// Variables of a `.env` file; a missing or unreadable file has none.
fn read_dotenv(path: &Path) -> HashMap<String, String> {
    match dotenvy::from_path_iter(path) {
        Ok(iter) => {
            tracing::debug!(path = %path.display(), "Loaded .env file");
            iter.filter_map(Result::ok).collect()
        }
        Err(_) => HashMap::new(),
    }
}

/// Copy `overlay` into `base`, skipping null, empty-string and empty-array
/// values. Tables merge key by key.
fn merge_non_empty(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                if is_empty(&value) {
                    tracing::debug!(key = %key, "Skipping empty config file value");
                    continue;
                }
                match base.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_non_empty(existing, value);
                    }
                    _ => {
                        tracing::debug!(key = %key, "Overwriting from config file");
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("XAI_API_KEY not set in the environment, .env, or config file")]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_model, "grok-3-latest");
        assert_eq!(config.default_mcp_server, "http://0.0.0.0:8000/mcp/");
        assert_eq!(config.memory_window, 5);
        assert_eq!(config.sampling.max_tokens, 512);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_with(Path::new("/nonexistent/mcpilot.toml"), no_env).unwrap();
        assert_eq!(config.default_model, "grok-3-latest");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn env_overrides_defaults() {
        let env = env_from(&[
            ("DEFAULT_MODEL", "grok-3-mini"),
            ("DEFAULT_MCP_SERVER", "http://registry:9000/mcp"),
            ("XAI_API_KEY", "xai-secret"),
        ]);
        let config = AppConfig::load_with(Path::new("/nonexistent/mcpilot.toml"), env).unwrap();
        assert_eq!(config.default_model, "grok-3-mini");
        assert_eq!(config.default_mcp_server, "http://registry:9000/mcp");
        assert_eq!(config.require_api_key().unwrap(), "xai-secret");
    }

    #[test]
    fn file_overrides_env_when_non_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "mcpilot.toml",
            r#"
default_model = "from-file"
default_mcp_server = ""
memory_window = 3

[transport]
timeout_secs = 2
"#,
        );
        let env = env_from(&[
            ("DEFAULT_MODEL", "from-env"),
            ("DEFAULT_MCP_SERVER", "http://env/mcp/"),
        ]);
        let config = AppConfig::load_with(&path, env).unwrap();
        assert_eq!(config.default_model, "from-file");
        // Empty values in the file are skipped.
        assert_eq!(config.default_mcp_server, "http://env/mcp/");
        assert_eq!(config.memory_window, 3);
        assert_eq!(config.transport.timeout_secs, 2);
        assert_eq!(config.transport.max_attempts, 3);
    }

    #[test]
    fn json_config_file_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "config.json",
            r#"{"xai_api_key": "k", "orchestrator_prompts": ["Decide."], "formatter_prompts": []}"#,
        );
        let env = env_from(&[("XAI_API_KEY", "from-env")]);
        let config = AppConfig::load_with(&path, env).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.instruction_template(), "Decide.");
        // Empty list skipped, default kept.
        assert!(!config.formatter_prompts.is_empty());
    }

    #[test]
    fn hosted_environment_skips_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "mcpilot.toml", r#"default_model = "from-file""#);
        let env = env_from(&[("WEBSITE_HOSTNAME", "app.example.net")]);
        let config = AppConfig::load_with(&path, env).unwrap();
        assert_eq!(config.default_model, "grok-3-latest");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "mcpilot.toml", "default_model = [unterminated");
        let err = AppConfig::load_with(&path, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.sampling.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_orchestrator_prompts_rejected() {
        let config = AppConfig {
            orchestrator_prompts: vec!["  ".into()],
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn missing_api_key_is_reported() {
        let config = AppConfig::default();
        assert!(matches!(config.require_api_key(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("xai-super-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("xai-super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn dotenv_supplies_missing_variables() {
        let dir = tempfile::tempdir().unwrap();
        let dotenv = write_file(&dir, ".env", "XAI_API_KEY=from-dotenv\nDEFAULT_MODEL=grok-dotenv\n");
        let path = dir.path().join("mcpilot.toml");

        let config = AppConfig::load_layered(&path, &dotenv, no_env).unwrap();

        assert_eq!(config.require_api_key().unwrap(), "from-dotenv");
        assert_eq!(config.default_model, "grok-dotenv");
    }

    #[test]
    fn process_env_wins_over_dotenv() {
        let dir = tempfile::tempdir().unwrap();
        let dotenv = write_file(&dir, ".env", "XAI_API_KEY=from-dotenv\nDEFAULT_MODEL=grok-dotenv\n");
        let path = dir.path().join("mcpilot.toml");
        let env = env_from(&[("XAI_API_KEY", "from-env"), ("DEFAULT_MODEL", "  ")]);

        let config = AppConfig::load_layered(&path, &dotenv, env).unwrap();

        assert_eq!(config.require_api_key().unwrap(), "from-env");
        // A blank variable does not hide the .env value.
        assert_eq!(config.default_model, "grok-dotenv");
    }

    #[test]
    fn hosted_environment_ignores_dotenv() {
        let dir = tempfile::tempdir().unwrap();
        let dotenv = write_file(&dir, ".env", "XAI_API_KEY=from-dotenv\n");
        let path = write_file(&dir, "mcpilot.toml", "default_model = \"from-file\"\n");
        let env = env_from(&[("WEBSITE_HOSTNAME", "app.azurewebsites.net")]);

        let config = AppConfig::load_layered(&path, &dotenv, env).unwrap();

        assert!(config.api_key.is_none());
        assert_eq!(config.default_model, "grok-3-latest");
    }

    #[test]
    fn missing_dotenv_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_layered(
            &dir.path().join("mcpilot.toml"),
            &dir.path().join(".env"),
            env_from(&[("XAI_API_KEY", "k")]),
        )
        .unwrap();
        assert_eq!(config.require_api_key().unwrap(), "k");
    }

    #[test]
    fn default_toml_roundtrip() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("grok-3-latest"));
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.orchestrator_prompts, default_orchestrator_prompts());
        assert_eq!(parsed.transport.retry_delay_secs, 1);
    }

    #[test]
    fn retry_policies_follow_settings() {
        let config = AppConfig::default();
        assert_eq!(config.transport.retry_policy().delay_after(3), Duration::from_secs(1));
        assert_eq!(config.completion.retry_policy().delay_after(3), Duration::from_secs(4));
    }
}
