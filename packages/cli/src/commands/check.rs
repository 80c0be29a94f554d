use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use templet_codec::placeholder::count_tokens;
use templet_codec::ExportOptions;
use templet_editor::Document;
use templet_parser::ast::NodeVisit;
use templet_parser::{parse, serialize, ListLevel, Node};
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Template file or directory of templates (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: String,
}

/// What a template holds, and whether it survives the editor unchanged
#[derive(Debug, Default, PartialEq)]
pub struct Report {
    pub blocks: usize,
    pub lists: usize,
    pub deepest_level: Option<ListLevel>,
    pub tables: usize,
    pub placeholders: usize,
    pub problems: Vec<String>,
}

impl Report {
    pub fn for_template(raw: &str) -> Self {
        let doc = Document::from_template(raw);
        let tree = doc.tree();
        let mut report = Report {
            blocks: tree.children.len(),
            ..Report::default()
        };

        tree.walk(&mut |visit| match visit {
            NodeVisit::Node(Node::OrderedList { level, .. }) => {
                report.lists += 1;
                report.deepest_level = report.deepest_level.max(Some(*level));
            }
            NodeVisit::Node(Node::BulletList { .. }) => report.lists += 1,
            NodeVisit::Node(Node::Placeholder) => report.placeholders += 1,
            NodeVisit::Node(Node::Table(table)) => {
                report.tables += 1;
                if !table.is_well_formed() {
                    report.problems.push("table columns do not match its rows".to_string());
                }
            }
            _ => {}
        });

        if parse(&serialize(tree)) != *tree {
            report.problems.push("markup does not round trip".to_string());
        }
        let tokens = count_tokens(raw);
        if tokens != report.placeholders {
            report.problems.push(format!(
                "{} %s tokens but {} placeholders survived parsing",
                tokens, report.placeholders
            ));
        }
        let exported = count_tokens(&doc.export(&ExportOptions::default()));
        if exported != report.placeholders {
            report.problems.push(format!("export emits {} %s tokens", exported));
        }
        report
    }
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let root = PathBuf::from(cwd).join(&args.path);
    let files = find_templates(&root)?;

    if files.is_empty() {
        println!("{}", "⚠️  No .html templates found".yellow());
        return Ok(());
    }

    let mut failed = 0;
    for file in &files {
        let raw = fs::read_to_string(file)?;
        let report = Report::for_template(&raw);
        let relative = file.strip_prefix(&root).unwrap_or(file);

        let level = report
            .deepest_level
            .map(|level| format!(", deepest level {}", level))
            .unwrap_or_default();
        let summary = format!(
            "{} blocks, {} lists{}, {} tables, {} placeholders",
            report.blocks, report.lists, level, report.tables, report.placeholders
        );

        if report.problems.is_empty() {
            println!("  {} {} {}", "✓".green(), relative.display(), summary.dimmed());
        } else {
            failed += 1;
            eprintln!("  {} {} {}", "✗".red(), relative.display(), summary.dimmed());
            for problem in &report.problems {
                eprintln!("      {}", problem.red());
            }
        }
    }

    println!();
    if failed == 0 {
        println!("{} Checked {} templates", "✅".green(), files.len());
        Ok(())
    } else {
        Err(anyhow!("{} of {} templates have problems", failed, files.len()))
    }
}

fn find_templates(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.exists() {
        return Err(anyhow!("Path does not exist: {}", path.display()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().map(|ext| ext == "html").unwrap_or(false))
        .collect();
    files.sort();
    Ok(files)
}
