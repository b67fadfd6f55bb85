//! List view: search filter plus pinned-then-recency ordering.

use crate::model::note::Note;
use crate::service::note_state::default_order;

/// What the list view should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<'a> {
    /// The collection has no notes at all.
    Empty,
    /// Notes exist but none matches the search term.
    NoResults { term: String },
    Notes(Vec<&'a Note>),
}

/// Case-insensitive substring match over id, title, objective and body.
///
/// A blank term matches every note.
pub fn matches_search(note: &Note, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [
        note.id.as_str(),
        note.title.as_str(),
        note.objective.as_str(),
        note.notes_area.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Notes matching `term`, pinned first, newest first.
pub fn filter_notes<'a>(notes: &'a [Note], term: &str) -> Vec<&'a Note> {
    let mut matching = notes
        .iter()
        .filter(|note| matches_search(note, term))
        .collect::<Vec<_>>();
    matching.sort_by(|a, b| default_order(a, b));
    matching
}

/// Builds the list view state for `term`.
pub fn list_view<'a>(notes: &'a [Note], term: &str) -> ListView<'a> {
    if notes.is_empty() {
        return ListView::Empty;
    }
    let matching = filter_notes(notes, term);
    if matching.is_empty() {
        ListView::NoResults {
            term: term.trim().to_string(),
        }
    } else {
        ListView::Notes(matching)
    }
}
