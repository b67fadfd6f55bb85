//! Table view: column sorting and multi-row selection.
//!
//! # Invariants
//! - Without a column sort the table uses the list ordering.
//! - Equal column values fall back to `createdAt` descending, except when
//!   the column itself is `createdAt`.
//! - Selection only ever contains ids visible under the current filter.

use crate::model::note::{Note, NoteId};
use crate::service::note_state::default_order;
use crate::view::list::matches_search;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Objective,
    CreatedAt,
    Pinned,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "objective" => Ok(Self::Objective),
            "created" | "createdat" | "created_at" | "date" => Ok(Self::CreatedAt),
            "pinned" | "ispinned" => Ok(Self::Pinned),
            other => Err(format!(
                "unknown sort column `{other}`; expected title|objective|created|pinned"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Active column sort of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl TableSort {
    pub fn asc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    /// Column header click: same column ascending flips to descending,
    /// anything else starts ascending.
    pub fn toggle(current: Option<Self>, key: SortKey) -> Self {
        match current {
            Some(sort) if sort.key == key && sort.direction == SortDirection::Asc => Self {
                key,
                direction: SortDirection::Desc,
            },
            _ => Self::asc(key),
        }
    }

    fn compare(&self, a: &Note, b: &Note) -> Ordering {
        let by_column = match self.key {
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortKey::Objective => a.objective.to_lowercase().cmp(&b.objective.to_lowercase()),
            SortKey::CreatedAt => a.created_at_millis().cmp(&b.created_at_millis()),
            SortKey::Pinned => a.is_pinned.cmp(&b.is_pinned),
        };
        let directed = match self.direction {
            SortDirection::Asc => by_column,
            SortDirection::Desc => by_column.reverse(),
        };
        if directed == Ordering::Equal && self.key != SortKey::CreatedAt {
            return b.created_at_millis().cmp(&a.created_at_millis());
        }
        directed
    }
}

/// Filters by `filter` and orders rows by `sort` (or the list order).
pub fn table_view<'a>(notes: &'a [Note], filter: &str, sort: Option<TableSort>) -> Vec<&'a Note> {
    let mut rows = notes
        .iter()
        .filter(|note| matches_search(note, filter))
        .collect::<Vec<_>>();
    match sort {
        Some(sort) => rows.sort_by(|a, b| sort.compare(a, b)),
        None => rows.sort_by(|a, b| default_order(a, b)),
    }
    rows
}

/// Multi-row selection feeding bulk pin/unpin/delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSelection {
    selected: BTreeSet<NoteId>,
}

impl TableSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips selection of one row.
    pub fn toggle(&mut self, id: &NoteId) {
        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }
    }

    /// Selects every visible row, or clears when all are already selected.
    pub fn toggle_all(&mut self, visible: &[&Note]) {
        let all_selected = !visible.is_empty()
            && visible.iter().all(|note| self.selected.contains(&note.id));
        if all_selected {
            self.selected.clear();
        } else {
            self.selected = visible.iter().map(|note| note.id.clone()).collect();
        }
    }

    /// Drops ids no longer visible after filtering or deletion.
    pub fn retain_visible(&mut self, visible: &[&Note]) {
        let visible_ids = visible.iter().map(|note| &note.id).collect::<BTreeSet<_>>();
        self.selected.retain(|id| visible_ids.contains(id));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn ids(&self) -> Vec<NoteId> {
        self.selected.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// True when at least one selected note is currently unpinned.
    pub fn can_pin(&self, notes: &[Note]) -> bool {
        self.any_selected(notes, |note| !note.is_pinned)
    }

    /// True when at least one selected note is currently pinned.
    pub fn can_unpin(&self, notes: &[Note]) -> bool {
        self.any_selected(notes, |note| note.is_pinned)
    }

    fn any_selected(&self, notes: &[Note], predicate: impl Fn(&Note) -> bool) -> bool {
        notes
            .iter()
            .filter(|note| self.selected.contains(&note.id))
            .any(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, title: &str, created_at: &str, pinned: bool) -> Note {
        Note {
            id: NoteId::new(id),
            title: title.to_string(),
            objective: "objective".to_string(),
            notes_area: "body".to_string(),
            created_at: created_at.to_string(),
            is_pinned: pinned,
            images: Vec::new(),
        }
    }

    fn ids(rows: &[&Note]) -> Vec<String> {
        rows.iter().map(|note| note.id.to_string()).collect()
    }

    fn sample() -> Vec<Note> {
        vec![
            note("1", "beta", "2024-05-01T10:00:00.000Z", false),
            note("2", "Alpha", "2024-05-02T10:00:00.000Z", true),
            note("3", "alpha", "2024-05-03T10:00:00.000Z", false),
        ]
    }

    #[test]
    fn toggle_cycles_direction_per_column() {
        let first = TableSort::toggle(None, SortKey::Title);
        assert_eq!(first.direction, SortDirection::Asc);
        let second = TableSort::toggle(Some(first), SortKey::Title);
        assert_eq!(second.direction, SortDirection::Desc);
        let third = TableSort::toggle(Some(second), SortKey::Title);
        assert_eq!(third.direction, SortDirection::Asc);
        let other = TableSort::toggle(Some(second), SortKey::Objective);
        assert_eq!(other, TableSort::asc(SortKey::Objective));
    }

    #[test]
    fn title_sort_is_case_insensitive_with_recency_tiebreak() {
        let notes = sample();
        let rows = table_view(&notes, "", Some(TableSort::asc(SortKey::Title)));
        assert_eq!(ids(&rows), vec!["3", "2", "1"]);
    }

    #[test]
    fn pinned_sort_descending_puts_pinned_first() {
        let notes = sample();
        let sort = TableSort {
            key: SortKey::Pinned,
            direction: SortDirection::Desc,
        };
        let rows = table_view(&notes, "", Some(sort));
        assert_eq!(ids(&rows), vec!["2", "3", "1"]);
    }

    #[test]
    fn no_sort_uses_list_order() {
        let notes = sample();
        let rows = table_view(&notes, "", None);
        assert_eq!(ids(&rows), vec!["2", "3", "1"]);
    }

    #[test]
    fn selection_tracks_visible_rows_and_pin_capabilities() {
        let notes = sample();
        let mut selection = TableSelection::new();
        let visible = table_view(&notes, "alpha", None);
        selection.toggle_all(&visible);
        assert_eq!(selection.len(), 2);
        assert!(selection.can_pin(&notes));
        assert!(selection.can_unpin(&notes));

        let narrowed = table_view(&notes, "beta", None);
        selection.retain_visible(&narrowed);
        assert!(selection.is_empty());

        selection.toggle(&NoteId::new("1"));
        assert!(selection.can_pin(&notes));
        assert!(!selection.can_unpin(&notes));
    }
}
