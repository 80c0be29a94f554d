use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use templet_editor::{Command, Document, EditSession, NodePath};

const STARTER_TEMPLATE: &str = "<h1>Welcome</h1><p>Dear %s,</p><ol><li>First point</li><li>Second point</li></ol><p></p>";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Starter template to create next to the config
    #[arg(short, long, default_value = "template.html")]
    pub template: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Templet project...".bright_blue().bold());

    let config = Config::default();
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let template_path = PathBuf::from(cwd).join(&args.template);
    if !template_path.exists() {
        fs::write(&template_path, starter_template(&config)?)?;
        println!("  {} Created {}", "✓".green(), args.template);
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: templet import {} > draft.html", args.template);
    println!("  2. Edit draft.html");
    println!("  3. Run: templet export draft.html");

    Ok(())
}

/// Starter template with a default-sized table in place of its last paragraph
fn starter_template(config: &Config) -> Result<String> {
    let mut session = EditSession::new(Document::from_template(STARTER_TEMPLATE));
    let last = session.document.tree().children.len().saturating_sub(1);
    session.select(NodePath::new(vec![last]))?;
    session.execute(Command::InsertTable {
        rows: config.table.rows,
        cols: config.table.cols,
    })?;
    Ok(session.export(&config.export_options()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_template() {
        let template = starter_template(&Config::default()).unwrap();
        assert!(template.contains("Dear %s,"));
        assert!(template.contains("<strong>Header 2</strong>"));
        assert!(!template.contains("<p class=\"text-xs font-400\"></p><table"));
    }

    #[test]
    fn test_init_writes_config_and_template() {
        let dir = std::env::temp_dir().join(format!("templet-init-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let cwd = dir.display().to_string();

        init(
            InitArgs {
                template: "template.html".to_string(),
                force: false,
            },
            &cwd,
        )
        .unwrap();

        assert_eq!(Config::load(&cwd).unwrap(), Config::default());
        assert!(dir.join("template.html").exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
