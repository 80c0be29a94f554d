//! # Templet Parser
//!
//! Document tree model for template markup: a tolerant HTML parser that
//! builds the tree, and a serializer that projects it back to markup.
//!
//! ```text
//! markup ──tokenize──▶ lexemes ──Parser──▶ Document ──Serializer──▶ markup
//! ```

pub mod ast;
pub mod entities;
pub mod level;
pub mod parser;
pub mod path;
pub mod serializer;
pub mod tokenizer;

#[cfg(test)]
mod tests_serializer;

pub use ast::{
    ColumnSpec, Document, HeadingLevel, ListItem, Mark, Marks, Node, Table, TableCell, TableRow,
    TextAlign,
};
pub use level::{InvalidLevel, ListLevel, NumberingStyle, Presentation};
pub use parser::{parse, Parser};
pub use path::{NodeKind, NodePath};
pub use serializer::{serialize, Serializer};
pub use tokenizer::{tokenize, Lexeme, Token};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_then_serialize() {
        let html = serialize(&parse("<p>Hello <b>world</b></p>"));
        assert_eq!(
            html,
            "<p class=\"text-xs font-400\">Hello <strong>world</strong></p>"
        );
    }
}
