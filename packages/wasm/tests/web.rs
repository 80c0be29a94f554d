//! Browser tests, run with `wasm-pack test --headless --firefox`

use templet_wasm::Editor;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_execute_json_command() {
    let mut editor = Editor::new();
    let html = editor
        .execute(r#"{"type":"InsertText","text":"Hello"}"#)
        .unwrap()
        .unwrap();
    assert_eq!(html, "<p class=\"text-xs font-400\">Hello</p>");
}

#[wasm_bindgen_test]
fn test_invalid_command_is_an_exception() {
    let mut editor = Editor::new();
    assert!(editor.execute(r#"{"type":"Nope"}"#).is_err());
    assert!(editor.select(vec![7]).is_err());
}

#[wasm_bindgen_test]
fn test_export_wire_token() {
    let mut editor = Editor::new();
    editor.load("<p>Hi %s</p>");
    assert_eq!(editor.export(true), "<p class=\"text-xs font-400\">Hi %s</p>");
}
