use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run_export(app: &App, output: Option<PathBuf>, format: &OutputFormat) -> Result<()> {
    let path = match output {
        Some(path) => path,
        None => {
            let dir = app.config.export_dir.clone().unwrap_or_default();
            dir.join(app.tracker.export_file_name())
        }
    };

    let json = app.tracker.export_json().context("Failed to serialize data")?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Exported data to {:?}", path);

    let store = app.tracker.store();
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": path.to_string_lossy(),
                "topics": store.topics().len(),
                "cards": store.cards().len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!(
            "Exported {} topics and {} cards to {}",
            store.topics().len(),
            store.cards().len(),
            path.display()
        ),
    }
    Ok(())
}

pub fn run_import(app: &mut App, path: &Path, format: &OutputFormat) -> Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    app.tracker
        .import_json(&text)
        .with_context(|| format!("Could not import {}", path.display()))?;
    app.save()?;

    let store = app.tracker.store();
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "topics": store.topics().len(),
                "cards": store.cards().len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!(
            "Imported {} topics and {} cards",
            store.topics().len(),
            store.cards().len()
        ),
    }
    Ok(())
}
