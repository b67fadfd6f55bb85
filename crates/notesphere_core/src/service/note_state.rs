//! Pure note collection state transitions.
//!
//! # Responsibility
//! - Express every collection mutation as `(state, action) -> new state`.
//! - Own the canonical ordering of the collection.
//!
//! # Invariants
//! - After every transition notes are ordered pinned-first, then by
//!   `createdAt` descending; equal keys keep their previous relative order.
//! - `reduce` performs no I/O and never reads the clock.

use crate::model::note::{id_day, next_note_id, Note, NoteDraft, NoteId};
use chrono::{DateTime, Local, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Sorted, id-unique note collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteState {
    notes: Vec<Note>,
}

impl NoteState {
    /// Builds a state from loaded notes, dropping later duplicates of an id.
    pub fn from_notes(notes: Vec<Note>) -> Self {
        let mut seen = HashSet::new();
        let mut notes = notes
            .into_iter()
            .filter(|note| seen.insert(note.id.clone()))
            .collect::<Vec<_>>();
        sort_notes(&mut notes);
        Self { notes }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|note| &note.id == id)
    }
}

/// One requested mutation of the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteAction {
    /// Creates a note; `now` drives both the id day and `createdAt`.
    Add {
        draft: NoteDraft,
        now: DateTime<Local>,
    },
    /// Full replacement by id.
    Update(Note),
    Delete(NoteId),
    DeleteMany(Vec<NoteId>),
    TogglePin(NoteId),
    SetPinMany {
        ids: Vec<NoteId>,
        pinned: bool,
    },
    /// Upserts already-validated notes by id.
    Import(Vec<Note>),
    Clear,
}

/// What a transition did, for notifications and persistence decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Added(Note),
    Updated(Note),
    /// Action matched nothing; state is unchanged.
    Unchanged,
    Deleted(Vec<Note>),
    PinToggled(Note),
    PinSet { count: usize, pinned: bool },
    Imported { created: usize, updated: usize },
    /// Every note that was in the collection.
    Cleared(Vec<Note>),
}

impl Effect {
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduced {
    pub state: NoteState,
    pub effect: Effect,
}

/// Applies `action` to `state` and returns the next state.
pub fn reduce(state: &NoteState, action: NoteAction) -> Reduced {
    let mut next = state.clone();
    let effect = match action {
        NoteAction::Add { draft, now } => {
            let id = next_note_id(&next.notes, id_day(now));
            let note = draft.into_note(id, now.with_timezone(&Utc));
            next.notes.insert(0, note.clone());
            Effect::Added(note)
        }
        NoteAction::Update(note) => match next.position(&note.id) {
            Some(index) => {
                next.notes[index] = note.clone();
                Effect::Updated(note)
            }
            None => Effect::Unchanged,
        },
        NoteAction::Delete(id) => remove_ids(&mut next, &HashSet::from([id])),
        NoteAction::DeleteMany(ids) => remove_ids(&mut next, &ids.into_iter().collect()),
        NoteAction::TogglePin(id) => match next.position(&id) {
            Some(index) => {
                let note = &mut next.notes[index];
                note.is_pinned = !note.is_pinned;
                Effect::PinToggled(note.clone())
            }
            None => Effect::Unchanged,
        },
        NoteAction::SetPinMany { ids, pinned } => {
            let ids = ids.into_iter().collect::<HashSet<_>>();
            let mut count = 0;
            for note in next.notes.iter_mut().filter(|note| ids.contains(&note.id)) {
                note.is_pinned = pinned;
                count += 1;
            }
            if count == 0 {
                Effect::Unchanged
            } else {
                Effect::PinSet { count, pinned }
            }
        }
        NoteAction::Import(notes) => {
            let (mut created, mut updated) = (0, 0);
            for note in notes {
                match next.position(&note.id) {
                    Some(index) => {
                        next.notes[index] = note;
                        updated += 1;
                    }
                    None => {
                        next.notes.push(note);
                        created += 1;
                    }
                }
            }
            if created + updated == 0 {
                Effect::Unchanged
            } else {
                Effect::Imported { created, updated }
            }
        }
        NoteAction::Clear => {
            Effect::Cleared(std::mem::take(&mut next.notes))
        }
    };

    if !effect.changed() {
        return Reduced {
            state: state.clone(),
            effect,
        };
    }
    sort_notes(&mut next.notes);
    Reduced {
        state: next,
        effect,
    }
}

fn remove_ids(state: &mut NoteState, ids: &HashSet<NoteId>) -> Effect {
    let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.notes)
        .into_iter()
        .partition(|note| ids.contains(&note.id));
    state.notes = kept;
    if removed.is_empty() {
        Effect::Unchanged
    } else {
        Effect::Deleted(removed)
    }
}

/// Default ordering: pinned first, then newest first.
pub fn default_order(a: &Note, b: &Note) -> Ordering {
    b.is_pinned
        .cmp(&a.is_pinned)
        .then_with(|| b.created_at_millis().cmp(&a.created_at_millis()))
}

/// Stable sort by [`default_order`].
pub fn sort_notes(notes: &mut [Note]) {
    notes.sort_by(default_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn add(state: &NoteState, title: &str, hour: u32) -> NoteState {
        reduce(
            state,
            NoteAction::Add {
                draft: NoteDraft::new(title, "objective", "body"),
                now: at(hour),
            },
        )
        .state
    }

    #[test]
    fn add_assigns_sequential_ids_and_newest_first() {
        let state = add(&NoteState::default(), "first", 8);
        let state = add(&state, "second", 9);
        let ids = state
            .notes()
            .iter()
            .map(|note| note.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["24050102", "24050101"]);
        assert!(state.notes().iter().all(|note| !note.is_pinned));
    }

    #[test]
    fn pinned_notes_sort_before_newer_unpinned() {
        let state = add(&NoteState::default(), "old", 8);
        let state = add(&state, "new", 9);
        let old_id = NoteId::new("24050101");
        let state = reduce(&state, NoteAction::TogglePin(old_id.clone())).state;
        assert_eq!(state.notes()[0].id, old_id);
        assert!(state.notes()[0].is_pinned);
    }

    #[test]
    fn unknown_ids_leave_state_untouched() {
        let state = add(&NoteState::default(), "only", 8);
        let missing = NoteId::new("99999999");
        for action in [
            NoteAction::Delete(missing.clone()),
            NoteAction::TogglePin(missing.clone()),
            NoteAction::SetPinMany {
                ids: vec![missing.clone()],
                pinned: true,
            },
        ] {
            let reduced = reduce(&state, action);
            assert_eq!(reduced.effect, Effect::Unchanged);
            assert_eq!(reduced.state, state);
        }
    }

    #[test]
    fn import_upserts_by_id() {
        let state = add(&NoteState::default(), "local", 8);
        let mut replacement = state.notes()[0].clone();
        replacement.title = "from file".to_string();
        let mut fresh = replacement.clone();
        fresh.id = NoteId::new("23010101");

        let reduced = reduce(&state, NoteAction::Import(vec![replacement, fresh]));
        assert_eq!(
            reduced.effect,
            Effect::Imported {
                created: 1,
                updated: 1
            }
        );
        assert_eq!(reduced.state.len(), 2);
        assert_eq!(
            reduced.state.get(&NoteId::new("24050101")).unwrap().title,
            "from file"
        );
    }

    #[test]
    fn from_notes_drops_duplicate_ids() {
        let state = add(&NoteState::default(), "a", 8);
        let note = state.notes()[0].clone();
        let rebuilt = NoteState::from_notes(vec![note.clone(), note]);
        assert_eq!(rebuilt.len(), 1);
    }
}
