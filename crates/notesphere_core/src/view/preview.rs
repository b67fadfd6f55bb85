//! Plain-text preview of a note body.
//!
//! Rules:
//! - markdown images are removed, links keep their label;
//! - markdown symbols are stripped and whitespace collapsed;
//! - the first 100 chars are kept.

use crate::model::note::Note;
use once_cell::sync::Lazy;
use regex::Regex;

const PREVIEW_MAX_CHARS: usize = 100;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// One-line summary used by compact list renderings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub preview: Option<String>,
    pub image_count: usize,
}

impl NoteSummary {
    pub fn of(note: &Note) -> Self {
        Self {
            preview: preview_text(&note.notes_area),
            image_count: note.images.len(),
        }
    }
}

/// Derives the plain-text preview of a markdown body.
pub fn preview_text(markdown: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(markdown, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::preview_text;

    #[test]
    fn strips_markdown_and_keeps_link_labels() {
        let text = preview_text("# Setup\n\n- see [docs](https://x.io) ![](a.png)\n**bold** `code`")
            .expect("preview should exist");
        assert_eq!(text, "Setup see docs bold code");
    }

    #[test]
    fn caps_length_and_handles_empty_bodies() {
        let long = "word ".repeat(50);
        assert_eq!(preview_text(&long).unwrap().chars().count(), 100);
        assert_eq!(preview_text("  ** ## "), None);
    }
}
