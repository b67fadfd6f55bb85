//! Search-term highlighting for markdown previews.

use regex::RegexBuilder;
use std::borrow::Cow;

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Wraps every case-insensitive occurrence of `term` in `<mark>` tags.
///
/// The term is matched literally; regex metacharacters carry no meaning.
/// Blank terms return the text unchanged.
pub fn highlight_matches<'t>(text: &'t str, term: &str) -> Cow<'t, str> {
    let needle = term.trim();
    if needle.is_empty() || text.is_empty() {
        return Cow::Borrowed(text);
    }
    match RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern.replace_all(text, format!("{MARK_OPEN}$0{MARK_CLOSE}").as_str()),
        Err(_) => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::highlight_matches;

    #[test]
    fn wraps_matches_preserving_original_case() {
        assert_eq!(
            highlight_matches("Kubectl and kubectl", "KUBECTL"),
            "<mark>Kubectl</mark> and <mark>kubectl</mark>"
        );
    }

    #[test]
    fn metacharacters_are_literal() {
        assert_eq!(highlight_matches("a.b axb", "a.b"), "<mark>a.b</mark> axb");
    }

    #[test]
    fn blank_term_is_noop() {
        assert_eq!(highlight_matches("text", "  "), "text");
    }
}
