use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use templet_editor::Document;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Internal markup, as written by the editor
    pub file: PathBuf,

    /// Output file (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Keep whitespace and comments
    #[arg(long)]
    pub no_minify: bool,
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut options = config.export_options();
    if args.no_minify {
        options.minify = false;
    }

    let markup = fs::read_to_string(&args.file)
        .with_context(|| format!("Cannot read {}", args.file.display()))?;
    let doc = Document::from_markup(&markup);

    if args.stdout {
        println!("{}", doc.export(&options));
        return Ok(());
    }

    let output = args.output.unwrap_or_else(|| config.get_output_path(cwd));
    doc.save(&output, &options)
        .with_context(|| format!("Cannot write {}", output.display()))?;

    println!(
        "  {} {} → {}",
        "✓".green(),
        args.file.display(),
        output.display()
    );
    Ok(())
}
