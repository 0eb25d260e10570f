//! `mcpilot catalog` — Show what the registry offers.

use mcpilot_mcp::{HttpTransport, discover};
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let transport = HttpTransport::from_config(&config);
    let catalog = discover(&transport, None).await;

    println!("Registry: {}", transport.endpoint());
    println!();

    println!("Tools ({}):", catalog.tools().len());
    for tool in catalog.tools() {
        println!("  {:<24} {}", tool.name, tool.description);
    }

    println!();
    println!("Resources ({}):", catalog.resources().len());
    for resource in catalog.resources() {
        println!("  {:<24} {}", resource.uri, resource.description);
    }

    println!();
    println!("Prompts ({}):", catalog.prompts().len());
    for prompt in catalog.prompts() {
        println!("  {:<24} {}", prompt.name, prompt.description);
    }

    if catalog.is_empty() {
        println!();
        println!("Nothing discovered. Is the registry running at {}?", transport.endpoint());
    }

    Ok(())
}
