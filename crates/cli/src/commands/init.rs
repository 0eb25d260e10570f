//! `mcpilot init` — Write a starter config file.

use mcpilot_config::AppConfig;
use std::path::Path;

pub fn run(config_path: Option<&Path>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default_path = AppConfig::default_path();
    let path = config_path.unwrap_or(&default_path);

    write_config(path, force)?;
    println!("Created config at: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Set XAI_API_KEY (environment or .env), or add api_key to the file");
    println!("  2. Point default_mcp_server at your MCP server");
    println!("  3. Run: mcpilot chat");
    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        )
        .into());
    }
    std::fs::write(path, AppConfig::default_toml())?;
    Ok(())
}
