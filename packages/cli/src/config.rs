use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use templet_codec::ExportOptions;
use templet_editor::table::{DEFAULT_COLS, DEFAULT_ROWS};

pub const DEFAULT_CONFIG_NAME: &str = "templet.config.json";

/// Templet configuration file format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Export options
    #[serde(default)]
    pub export: ExportConfig,

    /// Size of tables inserted with the default command
    #[serde(default)]
    pub table: TableConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// File written when no output path is given
    #[serde(default = "default_file_name")]
    pub file_name: String,

    #[serde(default = "default_minify")]
    pub minify: bool,
}

fn default_file_name() -> String {
    "exported.html".to_string()
}

fn default_minify() -> bool {
    true
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            minify: default_minify(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,

    #[serde(default = "default_cols")]
    pub cols: usize,
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}

fn default_cols() -> usize {
    DEFAULT_COLS
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
        }
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            minify: self.export.minify,
        }
    }

    /// Default output path for exports
    pub fn get_output_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.export.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "export": { "fileName": "letter.html", "minify": false },
            "table": { "rows": 3, "cols": 4 }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.export.file_name, "letter.html");
        assert!(!config.export.minify);
        assert_eq!(config.table, TableConfig { rows: 3, cols: 4 });
        assert!(!config.export_options().minify);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "export": { "minify": false } }"#).unwrap();
        assert_eq!(config.export.file_name, "exported.html");
        assert_eq!(config.table, TableConfig::default());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.export.file_name, "exported.html");
        assert!(config.export.minify);
        assert_eq!(config.table.rows, 2);
        assert_eq!(config.table.cols, 2);
        assert_eq!(config.get_output_path("/tmp"), PathBuf::from("/tmp/exported.html"));
    }
}
