use serde::Serialize;
use templet_codec::ExportOptions;
use templet_editor::{Command, EditSession, Modifiers, NodePath};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Editing surface for the browser host.
///
/// Mutating methods return the new internal markup when the document
/// changed and `undefined` otherwise; this is the host's change event.
#[wasm_bindgen]
pub struct Editor {
    session: EditSession,
    reported_version: u64,
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Editor {
        Editor {
            session: EditSession::default(),
            reported_version: 0,
        }
    }

    /// Replace the document with a template containing `%s` tokens
    pub fn load(&mut self, raw: &str) -> String {
        self.session.load(raw);
        self.take_change().unwrap_or_else(|| self.session.html())
    }

    pub fn html(&self) -> String {
        self.session.html()
    }

    /// Template text for download or clipboard
    pub fn export(&self, minify: bool) -> String {
        self.session.export(&ExportOptions { minify })
    }

    /// Document tree as JSON
    #[wasm_bindgen(js_name = treeJson)]
    pub fn tree_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.document.tree()).map_err(to_js_error)
    }

    pub fn select(&mut self, path: Vec<u32>) -> Result<(), JsValue> {
        let path = NodePath::new(path.into_iter().map(|i| i as usize).collect());
        self.session.select(path).map_err(to_js_error)
    }

    pub fn selection(&self) -> Vec<u32> {
        self.session.selection().indices().iter().map(|&i| i as u32).collect()
    }

    /// Returns true when the key was consumed; call `takeChange` afterwards
    #[wasm_bindgen(js_name = handleKeyDown)]
    pub fn handle_key_down(&mut self, key: &str, ctrl: bool, alt: bool, shift: bool, meta: bool) -> bool {
        self.session
            .handle_key_down(key, Modifiers { ctrl, alt, shift, meta })
    }

    /// Markup if the document changed since the last report
    #[wasm_bindgen(js_name = takeChange)]
    pub fn take_change(&mut self) -> Option<String> {
        let version = self.session.document.version;
        if version == self.reported_version {
            return None;
        }
        self.reported_version = version;
        Some(self.session.html())
    }

    /// Run a command given as JSON, e.g. `{"type":"InsertTable","rows":2,"cols":2}`
    pub fn execute(&mut self, command: &str) -> Result<Option<String>, JsValue> {
        let command = Command::from_json(command).map_err(to_js_error)?;
        self.run(command)
    }

    /// Outcome of the last command as JSON, for hosts that want the reason
    /// a command was rejected
    #[wasm_bindgen(js_name = executeWithOutcome)]
    pub fn execute_with_outcome(&mut self, command: &str) -> Result<String, JsValue> {
        let command = Command::from_json(command).map_err(to_js_error)?;
        let outcome = self.session.execute(command).map_err(to_js_error)?;
        let html = self.take_change();
        serde_json::to_string(&OutcomeReport { outcome, html }).map_err(to_js_error)
    }

    pub fn undo(&mut self) -> Option<String> {
        self.session.undo();
        self.take_change()
    }

    pub fn redo(&mut self) -> Option<String> {
        self.session.redo();
        self.take_change()
    }

    pub fn indent(&mut self) -> Result<Option<String>, JsValue> {
        self.run(Command::Indent)
    }

    pub fn outdent(&mut self) -> Result<Option<String>, JsValue> {
        self.run(Command::Outdent)
    }

    #[wasm_bindgen(js_name = startOrderedListAt)]
    pub fn start_ordered_list_at(&mut self, start: u32) -> Result<Option<String>, JsValue> {
        self.run(Command::StartOrderedListAt { start })
    }

    #[wasm_bindgen(js_name = insertPlaceholder)]
    pub fn insert_placeholder(&mut self) -> Result<Option<String>, JsValue> {
        self.run(Command::InsertPlaceholder)
    }

    #[wasm_bindgen(js_name = insertTable)]
    pub fn insert_table(&mut self, rows: u32, cols: u32) -> Result<Option<String>, JsValue> {
        self.run(Command::InsertTable {
            rows: rows as usize,
            cols: cols as usize,
        })
    }

    #[wasm_bindgen(js_name = inOrderedList)]
    pub fn in_ordered_list(&self) -> bool {
        self.session.in_ordered_list()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }
}

impl Editor {
    fn run(&mut self, command: Command) -> Result<Option<String>, JsValue> {
        self.session.execute(command).map_err(to_js_error)?;
        Ok(self.take_change())
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct OutcomeReport {
    #[serde(flatten)]
    outcome: templet_editor::CommandOutcome,
    html: Option<String>,
}

/// Replace `%s` tokens with placeholder markup
#[wasm_bindgen(js_name = toInternal)]
pub fn to_internal_js(raw: &str) -> String {
    templet_codec::import(raw)
}

/// Replace placeholder markup with `%s` tokens and minify
#[wasm_bindgen(js_name = toExternal)]
pub fn to_external_js(markup: &str, minify: bool) -> String {
    templet_codec::export(markup, &ExportOptions { minify })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_reports_changes_once() {
        let mut editor = Editor::new();
        let loaded = editor.load("<ol><li>a</li><li>b</li></ol>");
        assert!(loaded.starts_with("<ol data-level=\"1\""));
        assert_eq!(editor.take_change(), None);

        editor.select(vec![0, 1, 0]).unwrap();
        assert!(editor.handle_key_down("Tab", false, false, false, false));
        let html = editor.take_change().unwrap();
        assert!(html.contains("data-level=\"2\""));
        assert_eq!(editor.selection(), vec![0, 0, 1, 0, 0]);

        assert!(editor.undo().is_some());
        assert!(editor.undo().is_none());
    }

    #[test]
    fn test_unchanged_command_returns_none() {
        let mut editor = Editor::new();
        assert_eq!(editor.indent().unwrap(), None);
        let html = editor.insert_table(2, 2).unwrap().unwrap();
        assert!(html.contains("Header 1"));
    }

    #[test]
    fn test_outcome_report() {
        let mut editor = Editor::new();
        editor.insert_table(1, 1).unwrap();
        let report = editor.execute_with_outcome(r#"{"type":"DeleteRow"}"#).unwrap();
        assert_eq!(
            report,
            r#"{"outcome":"Rejected","reason":"Cannot delete the last row of a table","html":null}"#
        );
    }

    #[test]
    fn test_codec_functions() {
        let internal = to_internal_js("<p>%s</p>");
        assert_eq!(to_external_js(&internal, true), "<p>%s</p>");
    }
}
