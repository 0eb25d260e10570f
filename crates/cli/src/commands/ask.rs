//! `mcpilot ask` — Answer a single query.

use std::path::Path;

pub async fn run(config_path: Option<&Path>, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let mut pipeline = super::connect(&config).await?;

    let output = pipeline.run(query).await;
    println!("{output}");
    Ok(())
}
