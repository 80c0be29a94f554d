//! Character reference decoding and escaping

use std::borrow::Cow;

const NBSP: char = '\u{a0}';

/// Decode character references in text or an attribute value.
///
/// Unknown or malformed references are kept literally, so a bare `&` in
/// imported text survives unchanged.
pub fn decode(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    html_escape::decode_html_entities(text)
}

/// Escape text content for HTML output. Non-breaking spaces are written
/// back as `&nbsp;` so they stay visible in the markup.
pub fn escape_text(text: &str, output: &mut String) {
    let mut segments = text.split(NBSP);
    if let Some(first) = segments.next() {
        output.push_str(html_escape::encode_text(first).as_ref());
    }
    for segment in segments {
        output.push_str("&nbsp;");
        output.push_str(html_escape::encode_text(segment).as_ref());
    }
}

/// Escape an attribute value for a double-quoted HTML attribute
pub fn escape_attribute(value: &str, output: &mut String) {
    output.push_str(html_escape::encode_double_quoted_attribute(value).as_ref());
}
