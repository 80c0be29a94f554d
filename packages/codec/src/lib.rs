//! # Templet Codec
//!
//! Text-level transforms applied at the boundaries of the editor:
//!
//! ```text
//! raw template ──to_internal──▶ internal markup ──parse──▶ tree
//! tree ──serialize──▶ internal markup ──to_external──▶ minify ──▶ template
//! ```
//!
//! Neither transform parses HTML and neither can fail.

pub mod minifier;
pub mod placeholder;

pub use minifier::minify;
pub use placeholder::{
    to_external, to_internal, PLACEHOLDER_CLASS, PLACEHOLDER_LABEL, PLACEHOLDER_MARKUP, WIRE_TOKEN,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Options for the export direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Run the minifier over the exported markup
    #[serde(default = "default_minify")]
    pub minify: bool,
}

fn default_minify() -> bool {
    true
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

/// Prepare raw template text for parsing
pub fn import(raw: &str) -> String {
    let internal = to_internal(raw);
    debug!(
        placeholders = placeholder::count_tokens(raw),
        bytes = internal.len(),
        "Imported template text"
    );
    internal
}

/// Turn internal markup into the final template text
pub fn export(internal: &str, options: &ExportOptions) -> String {
    let external = to_external(internal);
    let output = if options.minify {
        minify(&external)
    } else {
        external
    };
    debug!(
        before = internal.len(),
        after = output.len(),
        saved_percent = minifier::calculate_compression_ratio(internal.len(), output.len()),
        minified = options.minify,
        "Exported template text"
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_yields_wire_token() {
        let html = "<p class=\"text-xs font-400\">Hi <span class=\"be-variable\">{BE Variable}</span></p>";
        assert_eq!(
            export(html, &ExportOptions::default()),
            "<p class=\"text-xs font-400\">Hi %s</p>"
        );
    }

    #[test]
    fn test_export_without_minify_keeps_whitespace() {
        let options = ExportOptions { minify: false };
        assert_eq!(export("<p>a</p>\n<p>b</p>", &options), "<p>a</p>\n<p>b</p>");
    }

    #[test]
    fn test_import_normalizes_ampersands() {
        assert_eq!(import("A &amp; B %s"), format!("A & B {}", PLACEHOLDER_MARKUP));
    }

    #[test]
    fn test_options_default_from_empty_json() {
        let options: ExportOptions = serde_json::from_str("{}").unwrap();
        assert!(options.minify);
    }
}
