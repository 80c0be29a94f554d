//! Integration tests for editor crate

use templet_editor::{Command, CommandOutcome, Document, EditSession, ExportOptions, Modifiers, NodePath};
use templet_parser::{ListLevel, Node};

#[test]
fn test_document_lifecycle() {
    let raw = "<p>Dear %s,</p><ol><li>first</li><li>second</li></ol>";
    let mut session = EditSession::new(Document::from_template(raw));
    assert_eq!(session.document.version, 0);

    session.select(NodePath::new(vec![1, 1, 0])).unwrap();
    assert_eq!(session.execute(Command::Indent).unwrap(), CommandOutcome::Applied);
    assert_eq!(session.document.version, 1);

    let exported = session.export(&ExportOptions::default());
    assert!(exported.starts_with("<p class=\"text-xs font-400\">Dear %s,</p>"));
    assert!(exported.contains("data-level=\"2\""));
    assert!(!exported.contains("be-variable"));
}

#[test]
fn test_indent_nested_item_switches_to_lower_alpha() {
    let mut session = EditSession::new(Document::from_template(
        "<ol><li>a<ol><li>b</li><li>c</li></ol></li></ol>",
    ));
    session.select(NodePath::new(vec![0, 0, 1, 1, 0])).unwrap();

    assert!(session.handle_key_down("Tab", Modifiers::NONE));

    let html = session.html();
    assert!(html.contains("data-level=\"2\""));
    assert!(html.contains("list-style-type: lower-alpha"));
    assert_eq!(session.selection(), &NodePath::new(vec![0, 0, 1, 0, 1, 0, 0]));
}

#[test]
fn test_indent_twice_reaches_lower_roman_then_stops() {
    let mut session = EditSession::new(Document::from_markup(
        "<ol><li>a</li><li>b</li><li>c</li></ol>",
    ));

    // b under a, then c under a's sublist, then c under b
    session.select(NodePath::new(vec![0, 1, 0])).unwrap();
    session.execute(Command::Indent).unwrap();
    session.select(NodePath::new(vec![0, 1, 0])).unwrap();
    session.execute(Command::Indent).unwrap();
    assert_eq!(session.execute(Command::Indent).unwrap(), CommandOutcome::Applied);

    let html = session.html();
    assert!(html.contains("data-level=\"3\""));
    assert!(html.contains("list-style-type: lower-roman"));
    assert!(html.contains("margin-left: 3em"));

    // Nothing deeper than level 3
    let before = session.html();
    assert_eq!(session.execute(Command::Indent).unwrap(), CommandOutcome::Unchanged);
    assert_eq!(session.html(), before);
}

#[test]
fn test_import_ampersand_and_list() {
    let doc = Document::from_template("A & B <ol><li>x</li></ol>");
    let children = &doc.tree().children;

    assert_eq!(children[0].text_content(), "A & B ");
    match &children[1] {
        Node::OrderedList { level, items, .. } => {
            assert_eq!(*level, ListLevel::One);
            assert_eq!(items.len(), 1);
        }
        other => panic!("Expected ordered list, got {:?}", other),
    }
    assert!(doc.export(&ExportOptions::default()).starts_with("<p class=\"text-xs font-400\">A & B </p>"));
}

#[test]
fn test_placeholder_exports_as_wire_token() {
    let doc = Document::from_markup("<p><span class=\"be-variable\">{BE Variable}</span></p>");
    assert_eq!(
        doc.export(&ExportOptions::default()),
        "<p class=\"text-xs font-400\">%s</p>"
    );
}

#[test]
fn test_export_without_minify_keeps_markup() {
    let doc = Document::from_template("<p>a</p><p>b</p>");
    let options = ExportOptions { minify: false };
    assert_eq!(doc.export(&options), doc.html());
}

#[test]
fn test_command_serialization() {
    let command = Command::MergeCells { count: 2 };
    let json = serde_json::to_string(&command).unwrap();
    let deserialized: Command = serde_json::from_str(&json).unwrap();
    assert_eq!(command, deserialized);

    let outcome = serde_json::to_string(&CommandOutcome::Rejected("no".to_string())).unwrap();
    assert_eq!(outcome, r#"{"outcome":"Rejected","reason":"no"}"#);
}

#[test]
fn test_commands_from_json_payloads() -> anyhow::Result<()> {
    let mut session = EditSession::default();
    session.execute(Command::from_json(r#"{"type":"InsertText","text":"Hi "}"#)?)?;
    session.execute(Command::from_json(r#"{"type":"InsertPlaceholder"}"#)?)?;
    session.execute(Command::from_json(r#"{"type":"SetHeading","level":1}"#)?)?;

    assert_eq!(
        session.export(&ExportOptions::default()),
        "<h1 class=\"text-xs font-bold\">Hi %s</h1>"
    );
    assert!(Command::from_json(r#"{"type":"Explode"}"#).is_err());
    Ok(())
}
