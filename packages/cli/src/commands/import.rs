use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use templet_editor::Document;
use tracing::info;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Template file containing %s tokens
    pub file: PathBuf,

    /// Print the document tree as JSON instead of markup
    #[arg(long)]
    pub json: bool,
}

pub fn import(args: ImportArgs, _cwd: &str) -> Result<()> {
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("Cannot read {}", args.file.display()))?;
    let doc = Document::from_template(&raw);
    info!(file = %args.file.display(), blocks = doc.tree().children.len(), "Imported template");

    if args.json {
        println!("{}", serde_json::to_string_pretty(doc.tree())?);
    } else {
        println!("{}", doc.html());
    }
    Ok(())
}
