//! HTML minification - textual canonicalization of exported markup

use regex::Regex;
use std::sync::LazyLock;

/// The whitespace class of browser regular expressions (`\s`), spelled out
/// because the `regex` crate's `\s` includes U+0085 and excludes U+FEFF
const WHITESPACE_CLASS: &str =
    r"[\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]";

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!("{WHITESPACE_CLASS}+")).unwrap());

static BETWEEN_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!(">{WHITESPACE_CLASS}+<")).unwrap());

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Minify exported markup.
///
/// Whitespace runs collapse to one space, whitespace between a `>` and the
/// following `<` is dropped, and complete comments are removed. Removing a
/// comment can leave two spaces side by side, so the passes repeat until the
/// text stops changing. Each round never grows the text, which bounds the loop.
pub fn minify(markup: &str) -> String {
    let mut current = minify_pass(markup);
    loop {
        let next = minify_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn minify_pass(markup: &str) -> String {
    let collapsed = collapse_whitespace(markup);
    let tight = remove_whitespace_between_tags(&collapsed);
    strip_comments(&tight).trim_matches(is_markup_whitespace).to_string()
}

/// Membership test for the same class as [`WHITESPACE_CLASS`]
pub fn is_markup_whitespace(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n' | '\u{b}' | '\u{c}' | '\r' | ' ' | '\u{a0}' | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}' | '\u{2029}' | '\u{202f}' | '\u{205f}' | '\u{3000}' | '\u{feff}'
    )
}

/// Collapse every run of whitespace into a single space
pub fn collapse_whitespace(markup: &str) -> String {
    WHITESPACE_RUN.replace_all(markup, " ").into_owned()
}

/// Drop whitespace found directly between `>` and `<`
pub fn remove_whitespace_between_tags(markup: &str) -> String {
    BETWEEN_TAGS.replace_all(markup, "><").into_owned()
}

/// Remove every complete `<!-- ... -->` span. An unterminated comment is kept.
pub fn strip_comments(markup: &str) -> String {
    COMMENT.replace_all(markup, "").into_owned()
}

/// Calculate compression ratio
pub fn calculate_compression_ratio(original_size: usize, minified_size: usize) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    (original_size.saturating_sub(minified_size) as f64 / original_size as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a  \n\t b"), "a b");
        assert_eq!(collapse_whitespace("\n\n"), " ");
    }

    #[test]
    fn test_whitespace_class_follows_browsers() {
        assert_eq!(collapse_whitespace("a\u{feff}\u{3000}b"), "a b");
        assert_eq!(collapse_whitespace("a\u{85}b"), "a\u{85}b");
        assert_eq!(minify("\u{feff}<p>x</p>\u{2028}"), "<p>x</p>");
        assert_eq!(minify("<p>x</p>\u{85}"), "<p>x</p>\u{85}");
    }

    #[test]
    fn test_whitespace_between_tags() {
        assert_eq!(remove_whitespace_between_tags("<p>a</p>   <p>b</p>"), "<p>a</p><p>b</p>");
        assert_eq!(remove_whitespace_between_tags("<b>a</b> c"), "<b>a</b> c");
        assert_eq!(remove_whitespace_between_tags("a > <b>"), "a ><b>");
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("a<!-- x -->b"), "ab");
        assert_eq!(strip_comments("<!---->"), "");
        assert_eq!(strip_comments("a<!-- never closed"), "a<!-- never closed");
        assert_eq!(strip_comments("<!-- a --><!-- b -->c"), "c");
    }

    #[test]
    fn test_minify_document() {
        let input = "<ol>\n  <li>one</li>\n  <!-- note -->\n  <li>two</li>\n</ol>\n";
        assert_eq!(minify(input), "<ol><li>one</li><li>two</li></ol>");
    }

    #[test]
    fn test_comment_between_words_leaves_single_space() {
        assert_eq!(minify("a <!-- c --> b"), "a b");
    }

    #[test]
    fn test_minify_is_idempotent() {
        let inputs = [
            "",
            "   ",
            "a <!-- c --> b",
            "<p> x </p> <!--y--> <p>z</p>",
            "<b> <!--x--> <!--y-->z",
            "<!-- unterminated <p>  a </p>",
            "<<>> < >",
            "text\u{a0}with\u{2003}unicode   spaces",
            "<p>%s</p>\n\n<ul>\n<li>x</li>\n</ul>",
        ];

        for input in inputs {
            let once = minify(input);
            assert_eq!(minify(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_malformed_markup_is_tolerated() {
        assert_eq!(minify("<p  <b>"), "<p <b>");
        assert_eq!(minify(">>  <<"), ">><<");
    }

    #[test]
    fn test_compression_ratio() {
        assert_eq!(calculate_compression_ratio(0, 0), 0.0);
        assert_eq!(calculate_compression_ratio(100, 50), 50.0);
    }
}
