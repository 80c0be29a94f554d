//! Lexer for template markup using logos
//!
//! The lexer never fails: anything it cannot classify comes back as text.

use crate::entities::decode;
use logos::{Lexer, Logos};

/// Raw token types for HTML markup
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    #[token("<!--", comment)]
    Comment,

    #[regex(r"<![a-zA-Z][^>]*>")]
    #[regex(r"<\?[^>]*>")]
    Declaration,

    /// Full `<name ...>` slice, attributes included
    #[regex(r"<[a-zA-Z][a-zA-Z0-9-]*", start_tag)]
    StartTag(&'src str),

    /// Element name of a `</name>` tag
    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\r\n]*>", |lex| {
        let s = lex.slice();
        s[2..s.len() - 1].trim_end()
    })]
    EndTag(&'src str),

    #[regex(r"[^<]+")]
    Text(&'src str),

    /// A `<` that opens nothing
    #[token("<")]
    Lt,
}

/// Skip to the end of a comment; an unterminated comment runs to end of input
fn comment<'src>(lex: &mut Lexer<'src, Token<'src>>) {
    let rest = lex.remainder();
    let consumed = rest.find("-->").map(|i| i + 3).unwrap_or(rest.len());
    lex.bump(consumed);
}

/// Extend a start tag to its closing `>`, skipping over quoted attribute values
fn start_tag<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Option<&'src str> {
    let rest = lex.remainder();
    let mut quote: Option<char> = None;

    for (index, ch) in rest.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '>' => {
                    lex.bump(index + 1);
                    return Some(lex.slice());
                }
                '<' => return None,
                _ => {}
            },
        }
    }

    None
}

/// Start tag with its attributes parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Lowercased element name
    pub name: String,
    /// Attributes in source order, names lowercased, values decoded
    pub attributes: Vec<(String, String)>,
    pub self_closing: bool,
}

impl StartTag {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Value of one declaration inside the `style` attribute
    pub fn style(&self, property: &str) -> Option<String> {
        self.attr("style").and_then(|style| style_property(style, property))
    }
}

/// Look up a property in an inline style declaration list
pub fn style_property(style: &str, property: &str) -> Option<String> {
    style.split(';').find_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        if name.trim().eq_ignore_ascii_case(property) {
            let value = value.trim();
            let value = value.strip_suffix("!important").unwrap_or(value).trim();
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Token stream item consumed by the tree builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme {
    Open(StartTag),
    Close(String),
    Text(String),
}

/// Tokenize markup into open tags, close tags and decoded text.
///
/// Comments and declarations are dropped. Adjacent text pieces (including
/// stray `<` characters and unlexable input) are merged before entity
/// decoding so a comment between two words leaves a single text run.
pub fn tokenize(source: &str) -> Vec<Lexeme> {
    let mut lexemes = Vec::new();
    let mut pending_text = String::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        match result {
            Ok(Token::Comment) | Ok(Token::Declaration) => {}
            Ok(Token::Text(text)) => pending_text.push_str(text),
            Ok(Token::Lt) | Err(()) => pending_text.push_str(lexer.slice()),
            Ok(Token::StartTag(slice)) => {
                flush_text(&mut pending_text, &mut lexemes);
                lexemes.push(Lexeme::Open(parse_start_tag(slice)));
            }
            Ok(Token::EndTag(name)) => {
                flush_text(&mut pending_text, &mut lexemes);
                lexemes.push(Lexeme::Close(name.to_ascii_lowercase()));
            }
        }
    }

    flush_text(&mut pending_text, &mut lexemes);
    lexemes
}

fn flush_text(pending: &mut String, lexemes: &mut Vec<Lexeme>) {
    if !pending.is_empty() {
        lexemes.push(Lexeme::Text(decode(pending).into_owned()));
        pending.clear();
    }
}

/// Parse a `<name attr="value" ...>` slice
pub fn parse_start_tag(slice: &str) -> StartTag {
    let inner = slice
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(slice);
    let self_closing = inner.ends_with('/');
    let inner = inner.strip_suffix('/').unwrap_or(inner);

    let name_end = inner
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();

    StartTag {
        name,
        attributes: parse_attributes(&inner[name_end..]),
        self_closing,
    }
}

fn parse_attributes(source: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();
    let bytes = source.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        while pos < bytes.len() && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b'/') {
            pos += 1;
        }
        let name_start = pos;
        while pos < bytes.len()
            && !bytes[pos].is_ascii_whitespace()
            && bytes[pos] != b'='
            && bytes[pos] != b'/'
        {
            pos += 1;
        }
        if pos == name_start {
            break;
        }
        let name = source[name_start..pos].to_ascii_lowercase();

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let mut value = String::new();
        if pos < bytes.len() && bytes[pos] == b'=' {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos < bytes.len() && (bytes[pos] == b'"' || bytes[pos] == b'\'') {
                let quote = bytes[pos];
                let value_start = pos + 1;
                let value_end = source[value_start..]
                    .find(quote as char)
                    .map(|i| value_start + i)
                    .unwrap_or(source.len());
                value = decode(&source[value_start..value_end]).into_owned();
                pos = (value_end + 1).min(source.len());
            } else {
                let value_start = pos;
                while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                value = decode(&source[value_start..pos]).into_owned();
            }
        }

        attributes.push((name, value));
    }

    attributes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic_markup() {
        let lexemes = tokenize("<p class=\"a\">Hi</p>");
        assert_eq!(lexemes.len(), 3);
        match &lexemes[0] {
            Lexeme::Open(tag) => {
                assert_eq!(tag.name, "p");
                assert_eq!(tag.attr("class"), Some("a"));
            }
            other => panic!("Expected open tag, got {:?}", other),
        }
        assert_eq!(lexemes[1], Lexeme::Text("Hi".to_string()));
        assert_eq!(lexemes[2], Lexeme::Close("p".to_string()));
    }

    #[test]
    fn test_quoted_attribute_may_contain_gt() {
        let lexemes = tokenize("<span title=\"a > b\">x</span>");
        match &lexemes[0] {
            Lexeme::Open(tag) => assert_eq!(tag.attr("title"), Some("a > b")),
            other => panic!("Expected open tag, got {:?}", other),
        }
    }

    #[test]
    fn test_comments_and_doctype_are_dropped() {
        let lexemes = tokenize("<!DOCTYPE html>a<!-- note -->b");
        assert_eq!(lexemes, vec![Lexeme::Text("ab".to_string())]);
    }

    #[test]
    fn test_unterminated_comment_swallows_rest() {
        let lexemes = tokenize("a<!-- open <p>b</p>");
        assert_eq!(lexemes, vec![Lexeme::Text("a".to_string())]);
    }

    #[test]
    fn test_stray_lt_degrades_to_text() {
        let lexemes = tokenize("1 < 2 &amp; 3");
        assert_eq!(lexemes, vec![Lexeme::Text("1 < 2 & 3".to_string())]);
    }

    #[test]
    fn test_unclosed_start_tag_degrades_to_text() {
        let lexemes = tokenize("<p class=\"x\"");
        assert!(lexemes.iter().all(|l| matches!(l, Lexeme::Text(_))));
    }

    #[test]
    fn test_close_tag_is_lowercased() {
        assert_eq!(tokenize("</OL >"), vec![Lexeme::Close("ol".to_string())]);
    }

    #[test]
    fn test_self_closing_and_bare_attributes() {
        let tag = parse_start_tag("<col span=2 hidden/>");
        assert_eq!(tag.name, "col");
        assert!(tag.self_closing);
        assert_eq!(tag.attr("span"), Some("2"));
        assert_eq!(tag.attr("hidden"), Some(""));
    }

    #[test]
    fn test_style_property_lookup() {
        let style = "list-style-type: lower-alpha !important; margin-left: 1.5em !important;";
        assert_eq!(style_property(style, "list-style-type").as_deref(), Some("lower-alpha"));
        assert_eq!(style_property(style, "margin-left").as_deref(), Some("1.5em"));
        assert_eq!(style_property(style, "width"), None);
    }

    #[test]
    fn test_has_class() {
        let tag = parse_start_tag("<span class=\"chip be-variable\">");
        assert!(tag.has_class("be-variable"));
        assert!(!tag.has_class("be"));
    }
}
