//! Placeholder substitution between the wire token and the internal
//! atomic placeholder markup.

/// Two-character marker used in imported and exported templates.
pub const WIRE_TOKEN: &str = "%s";

/// Class that marks a `<span>` as the atomic placeholder node.
pub const PLACEHOLDER_CLASS: &str = "be-variable";

/// Fixed label rendered inside the placeholder node.
pub const PLACEHOLDER_LABEL: &str = "{BE Variable}";

/// Canonical internal form of the placeholder.
pub const PLACEHOLDER_MARKUP: &str = "<span class=\"be-variable\">{BE Variable}</span>";

const ESCAPED_AMPERSAND: &str = "&amp;";

/// Rewrite raw template text into internal markup.
///
/// Escaped ampersands are normalized first, then every wire token becomes the
/// canonical placeholder fragment.
pub fn to_internal(markup: &str) -> String {
    unescape_ampersands(markup).replace(WIRE_TOKEN, PLACEHOLDER_MARKUP)
}

/// Rewrite internal markup back into template text.
///
/// Only the exact canonical fragment is recognized; anything else that merely
/// resembles a placeholder passes through untouched.
pub fn to_external(markup: &str) -> String {
    unescape_ampersands(&markup.replace(PLACEHOLDER_MARKUP, WIRE_TOKEN))
}

/// Count the wire tokens in template text.
pub fn count_tokens(markup: &str) -> usize {
    markup.matches(WIRE_TOKEN).count()
}

fn unescape_ampersands(markup: &str) -> String {
    markup.replace(ESCAPED_AMPERSAND, "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_becomes_fragment() {
        assert_eq!(
            to_internal("Hello %s!"),
            "Hello <span class=\"be-variable\">{BE Variable}</span>!"
        );
    }

    #[test]
    fn test_fragment_becomes_token() {
        assert_eq!(
            to_external("<p><span class=\"be-variable\">{BE Variable}</span></p>"),
            "<p>%s</p>"
        );
    }

    #[test]
    fn test_round_trip_on_well_formed_input() {
        let inputs = [
            "",
            "%s",
            "%s%s",
            "<p>Dear %s, your order %s shipped.</p>",
            "<ol><li>%s</li></ol>",
            "no placeholders at all",
            "100% sure",
        ];

        for input in inputs {
            assert_eq!(to_external(&to_internal(input)), input, "input: {input}");
        }
    }

    #[test]
    fn test_malformed_fragments_pass_through() {
        let partial = "<span class=\"be-variable\">{BE Var</span>";
        assert_eq!(to_external(partial), partial);

        let other_label = "<span class=\"be-variable\">custom</span>";
        assert_eq!(to_external(other_label), other_label);

        assert_eq!(to_internal("% s and %"), "% s and %");
    }

    #[test]
    fn test_ampersands_are_normalized_not_reescaped() {
        assert_eq!(to_internal("A &amp; B"), "A & B");
        assert_eq!(to_external("A &amp; B"), "A & B");
        assert_eq!(to_external("A & B"), "A & B");
    }

    #[test]
    fn test_count_tokens() {
        assert_eq!(count_tokens("%s and %s"), 2);
        assert_eq!(count_tokens("none"), 0);
    }
}
