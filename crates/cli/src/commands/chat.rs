//! `mcpilot chat` — Interactive query loop.

use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

const PROMPT: &str = "mcp-agent > ";

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let mut pipeline = super::connect(&config).await?;

    let catalog = pipeline.catalog();
    println!();
    println!("  mcpilot — interactive mode");
    println!();
    println!("  Model:      {}", config.default_model);
    println!("  Registry:   {}", config.default_mcp_server);
    println!("  Session:    {}", pipeline.session_id());
    println!(
        "  Catalog:    {} tools, {} resources, {} prompts",
        catalog.tools().len(),
        catalog.resources().len(),
        catalog.prompts().len()
    );
    println!();
    println!("  Type a query and press Enter. Type 'exit' to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{PROMPT}");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();
        if is_exit(query) {
            break;
        }
        if query.is_empty() {
            continue;
        }

        let output = pipeline.run(query).await;
        println!("{output}");
    }

    println!();
    Ok(())
}

fn is_exit(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit")
}
