//! Latest-request guard for the selected note's suggestions.
//!
//! # Invariants
//! - Only the most recently issued ticket may change the display state.
//! - Deselecting or deleting the selected note drops its pending ticket.

use super::client::{SuggestionClient, SuggestionOutcome};
use super::model::SuggestionModel;
use crate::model::note::{Note, NoteId};
use crate::model::suggestion::SuggestionItem;
use log::debug;
use std::sync::Mutex;

/// Handle of one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub note_id: NoteId,
    seq: u64,
}

/// Display state of the suggestion panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SuggestionState {
    #[default]
    Idle,
    Loading { note_id: NoteId },
    Ready {
        note_id: NoteId,
        items: Vec<SuggestionItem>,
    },
    Failed { note_id: NoteId, message: String },
}

#[derive(Debug, Default)]
pub struct SuggestionSession {
    next_seq: u64,
    current: Option<RequestTicket>,
    state: SuggestionState,
}

impl SuggestionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    pub fn selected(&self) -> Option<&NoteId> {
        self.current.as_ref().map(|ticket| &ticket.note_id)
    }

    /// Selects `note_id` and issues a ticket, superseding any earlier one.
    pub fn begin(&mut self, note_id: NoteId) -> RequestTicket {
        self.next_seq += 1;
        let ticket = RequestTicket {
            note_id: note_id.clone(),
            seq: self.next_seq,
        };
        self.current = Some(ticket.clone());
        self.state = SuggestionState::Loading { note_id };
        ticket
    }

    /// Applies a finished request; returns `false` for stale tickets.
    pub fn complete(&mut self, ticket: &RequestTicket, outcome: SuggestionOutcome) -> bool {
        if self.current.as_ref() != Some(ticket) {
            debug!(
                "event=ai_session module=ai status=stale note_id={} seq={}",
                ticket.note_id, ticket.seq
            );
            return false;
        }
        let note_id = ticket.note_id.clone();
        self.state = match outcome.error {
            Some(message) => SuggestionState::Failed { note_id, message },
            None => SuggestionState::Ready {
                note_id,
                items: outcome.items,
            },
        };
        true
    }

    /// Clears the selection; any pending ticket becomes stale.
    pub fn deselect(&mut self) {
        self.current = None;
        self.state = SuggestionState::Idle;
    }

    /// Deselects when the selected note is among `removed`.
    pub fn clear_if(&mut self, removed: &[NoteId]) -> bool {
        let hit = self.selected().is_some_and(|id| removed.contains(id));
        if hit {
            self.deselect();
        }
        hit
    }
}

/// Runs one request for `note` against a shared session.
///
/// The lock is only held to issue and settle the ticket, never across the
/// model call. Returns whether the result was applied.
pub async fn refresh_suggestions<M: SuggestionModel>(
    session: &Mutex<SuggestionSession>,
    client: &SuggestionClient<M>,
    note: &Note,
) -> bool {
    let ticket = match session.lock() {
        Ok(mut guard) => guard.begin(note.id.clone()),
        Err(poisoned) => poisoned.into_inner().begin(note.id.clone()),
    };
    let outcome = client.suggest(note).await;
    match session.lock() {
        Ok(mut guard) => guard.complete(&ticket, outcome),
        Err(poisoned) => poisoned.into_inner().complete(&ticket, outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(items: usize) -> SuggestionOutcome {
        SuggestionOutcome {
            items: (0..items)
                .map(|idx| SuggestionItem::new(format!("t{idx}"), "d"))
                .collect(),
            error: None,
        }
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut session = SuggestionSession::new();
        let first = session.begin(NoteId::new("a"));
        let second = session.begin(NoteId::new("b"));

        assert!(!session.complete(&first, ready(3)));
        assert_eq!(
            session.state(),
            &SuggestionState::Loading {
                note_id: NoteId::new("b")
            }
        );

        assert!(session.complete(&second, ready(1)));
        assert!(matches!(session.state(), SuggestionState::Ready { items, .. } if items.len() == 1));
    }

    #[test]
    fn reselecting_same_note_still_supersedes() {
        let mut session = SuggestionSession::new();
        let first = session.begin(NoteId::new("a"));
        let _second = session.begin(NoteId::new("a"));
        assert!(!session.complete(&first, ready(2)));
    }

    #[test]
    fn failure_outcome_sets_failed_state() {
        let mut session = SuggestionSession::new();
        let ticket = session.begin(NoteId::new("a"));
        let outcome = SuggestionOutcome {
            items: Vec::new(),
            error: Some("boom".to_string()),
        };
        assert!(session.complete(&ticket, outcome));
        assert!(matches!(session.state(), SuggestionState::Failed { .. }));
    }

    #[test]
    fn deleting_selected_note_clears_selection() {
        let mut session = SuggestionSession::new();
        let ticket = session.begin(NoteId::new("a"));
        assert!(!session.clear_if(&[NoteId::new("b")]));
        assert!(session.clear_if(&[NoteId::new("a")]));
        assert_eq!(session.state(), &SuggestionState::Idle);
        assert!(!session.complete(&ticket, ready(1)));
    }
}
