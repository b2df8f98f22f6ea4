//! The `quizloop list` command.

use std::path::PathBuf;

use anyhow::Result;

use quizloop_catalog::{create_catalog, load_config_from};

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let catalog = create_catalog(&config.catalog, config.request_timeout_secs)?;

    let entries = catalog.list().await?;
    if entries.is_empty() {
        println!(
            "No quizzes found in {}. Run `quizloop init` to create a sample quiz.",
            catalog.name()
        );
        return Ok(());
    }

    println!("Catalog: {} ({} quizzes)", catalog.name(), entries.len());
    let width = entries.iter().map(|e| e.file.len()).max().unwrap_or(0);
    for entry in &entries {
        println!("  {:<width$}  {}", entry.file, entry.title);
    }
    println!("\nPlay one with: quizloop play --quiz <file>");

    Ok(())
}
