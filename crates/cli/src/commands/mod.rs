pub mod ask;
pub mod catalog;
pub mod chat;
pub mod init;

use mcpilot_agent::QueryPipeline;
use mcpilot_config::AppConfig;
use std::path::Path;

pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load(path).map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Build the session pipeline, explaining how to set a key when none is
/// configured.
pub async fn connect(config: &AppConfig) -> Result<QueryPipeline, Box<dyn std::error::Error>> {
    // Fail early with setup instructions
    if config.require_api_key().is_err() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables (or put it in .env):");
        eprintln!("    XAI_API_KEY=xai-...");
        eprintln!("    MCPILOT_API_KEY=...      (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    api_key = \"xai-...\"      in {}", AppConfig::default_path().display());
        eprintln!();
        eprintln!("  Run `mcpilot init` to create a starter config.");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    Ok(QueryPipeline::connect(config).await?)
}
