//! Note service: the single owner of the note collection.
//!
//! # Responsibility
//! - Hold the in-memory collection and apply mutations through [`reduce`].
//! - Mirror every change to the storage adapter.
//! - Resolve every operation to a user-facing [`Notification`].
//!
//! # Invariants
//! - The store is written after every state change, never on no-ops.
//! - Persistence failures never roll back in-memory state; they only add a
//!   warning to the outcome.
//! - Import applies the valid subset of a file; a file with no valid
//!   record leaves the collection untouched.

use crate::codec::{export_notes, parse_import, ExportFormat};
use crate::model::note::{validate_note_shape, Note, NoteDraft, NoteId};
use crate::notify::Notification;
use crate::repo::note_store::{load_notes, persist_notes, NoteStore};
use crate::service::note_state::{reduce, Effect, NoteAction, NoteState};
use chrono::{DateTime, Local};
use log::{info, warn};

/// Result of one service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub notification: Notification,
    /// Present when the change could not be written to the store.
    pub persistence_warning: Option<Notification>,
}

impl<T> Outcome<T> {
    fn new(value: T, notification: Notification) -> Self {
        Self {
            value,
            notification,
            persistence_warning: None,
        }
    }
}

/// Counters reported by an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// New ids inserted.
    pub created: usize,
    /// Existing ids overwritten.
    pub updated: usize,
    /// Records or rows that failed parsing or shape validation.
    pub skipped: usize,
    /// Whether the collection was mutated.
    pub applied: bool,
}

/// State container for notes, backed by a [`NoteStore`].
pub struct NoteService<S: NoteStore> {
    store: S,
    state: NoteState,
}

impl<S: NoteStore> NoteService<S> {
    /// Loads the collection from `store`; unreadable content yields an empty
    /// collection.
    pub fn open(store: S) -> Self {
        let state = NoteState::from_notes(load_notes(&store));
        info!("event=service_open module=service status=ok count={}", state.len());
        Self { store, state }
    }

    pub fn notes(&self) -> &[Note] {
        self.state.notes()
    }

    pub fn get_by_id(&self, id: &NoteId) -> Option<&Note> {
        self.state.get(id)
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a note stamped with the current local time.
    pub fn add(&mut self, draft: NoteDraft) -> Outcome<Note> {
        self.add_at(draft, Local::now())
    }

    /// Creates a note as if it were `now`.
    pub fn add_at(&mut self, draft: NoteDraft, now: DateTime<Local>) -> Outcome<Note> {
        let effect = self.apply(NoteAction::Add { draft, now });
        let Effect::Added(note) = effect else {
            unreachable!("add always produces Effect::Added");
        };
        info!("event=note_add module=service status=ok id={}", note.id);
        let notification = Notification::success(
            "Note created",
            format!("Note \"{}\" was created.", note.title),
        );
        self.finish(note, notification)
    }

    /// Replaces a note by id. Unknown ids are a silent no-op (`false`).
    pub fn update(&mut self, note: Note) -> Outcome<bool> {
        let id = note.id.clone();
        match self.apply(NoteAction::Update(note)) {
            Effect::Updated(note) => {
                info!("event=note_update module=service status=ok id={id}");
                let notification = Notification::success(
                    "Note updated",
                    format!("Note \"{}\" was updated.", note.title),
                );
                self.finish(true, notification)
            }
            _ => {
                warn!("event=note_update module=service status=skip reason=not_found id={id}");
                Outcome::new(
                    false,
                    Notification::info("Note not found", format!("No note with id {id}.")),
                )
            }
        }
    }

    /// Deletes one note; returns the removed ids (empty when unknown).
    pub fn delete(&mut self, id: &NoteId) -> Outcome<Vec<NoteId>> {
        self.delete_action(NoteAction::Delete(id.clone()))
    }

    /// Deletes every listed note; unknown ids are ignored.
    pub fn delete_many(&mut self, ids: &[NoteId]) -> Outcome<Vec<NoteId>> {
        self.delete_action(NoteAction::DeleteMany(ids.to_vec()))
    }

    /// Flips the pin flag; returns the note after the change.
    pub fn toggle_pin(&mut self, id: &NoteId) -> Outcome<Option<Note>> {
        match self.apply(NoteAction::TogglePin(id.clone())) {
            Effect::PinToggled(note) => {
                info!(
                    "event=note_pin module=service status=ok id={} pinned={}",
                    note.id, note.is_pinned
                );
                let (title, verb) = if note.is_pinned {
                    ("Note pinned", "pinned")
                } else {
                    ("Note unpinned", "unpinned")
                };
                let notification =
                    Notification::success(title, format!("Note \"{}\" was {verb}.", note.title));
                self.finish(Some(note), notification)
            }
            _ => Outcome::new(
                None,
                Notification::info("Note not found", format!("No note with id {id}.")),
            ),
        }
    }

    /// Sets the pin flag on every listed note; returns how many matched.
    pub fn set_pin_many(&mut self, ids: &[NoteId], pinned: bool) -> Outcome<usize> {
        let verb = if pinned { "pinned" } else { "unpinned" };
        match self.apply(NoteAction::SetPinMany {
            ids: ids.to_vec(),
            pinned,
        }) {
            Effect::PinSet { count, .. } => {
                info!("event=note_pin_many module=service status=ok count={count} pinned={pinned}");
                let notification = Notification::success(
                    format!("Notes {verb}"),
                    format!("{count} notes were {verb}."),
                );
                self.finish(count, notification)
            }
            _ => Outcome::new(
                0,
                Notification::info("Nothing to change", "None of the selected notes exist."),
            ),
        }
    }

    /// Imports a serialized file, upserting every valid record by id.
    pub fn import(&mut self, text: &str, format: ExportFormat) -> Outcome<ImportReport> {
        let parsed = match parse_import(text, format) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("event=notes_import module=service status=error format={format} error={err}");
                return Outcome::new(
                    ImportReport::default(),
                    Notification::error("Import failed", err.to_string()),
                );
            }
        };

        let mut report = ImportReport {
            skipped: parsed.malformed_rows,
            ..ImportReport::default()
        };
        let mut valid = Vec::with_capacity(parsed.candidates.len());
        for (index, candidate) in parsed.candidates.iter().enumerate() {
            match validate_note_shape(candidate) {
                Ok(note) => valid.push(note),
                Err(err) => {
                    warn!("event=notes_import module=service status=skip index={index} reason={err}");
                    report.skipped += 1;
                }
            }
        }

        if valid.is_empty() {
            let notification = if report.skipped > 0 {
                Notification::error(
                    "Import failed",
                    format!(
                        "No valid notes could be imported. {} records were skipped due to format errors.",
                        report.skipped
                    ),
                )
            } else {
                Notification::error("No notes found", "The file does not contain any notes.")
            };
            info!(
                "event=notes_import module=service status=skip format={format} skipped={}",
                report.skipped
            );
            return Outcome::new(report, notification);
        }

        if let Effect::Imported { created, updated } = self.apply(NoteAction::Import(valid)) {
            report.created = created;
            report.updated = updated;
        }
        report.applied = true;
        info!(
            "event=notes_import module=service status=ok format={format} created={} updated={} skipped={}",
            report.created, report.updated, report.skipped
        );

        let mut summary = format!(
            "{} notes imported, {} notes updated.",
            report.created, report.updated
        );
        if report.skipped > 0 {
            summary.push_str(&format!(
                " {} records were skipped due to format errors.",
                report.skipped
            ));
        }
        let notification = if report.skipped > 0 {
            Notification::warning("Import completed with warnings", summary)
        } else {
            Notification::success("Import completed", summary)
        };
        self.finish(report, notification)
    }

    /// Serializes the collection; `None` when there is nothing to export.
    pub fn export(&self, format: ExportFormat) -> Outcome<Option<String>> {
        if self.state.is_empty() {
            return Outcome::new(
                None,
                Notification::info("No notes to export", "There are no notes to export."),
            );
        }
        match export_notes(self.state.notes(), format) {
            Ok(text) => {
                info!(
                    "event=notes_export module=service status=ok format={format} count={}",
                    self.state.len()
                );
                Outcome::new(
                    Some(text),
                    Notification::success(
                        "Export successful",
                        format!("{} notes exported as {format}.", self.state.len()),
                    ),
                )
            }
            Err(err) => {
                warn!("event=notes_export module=service status=error format={format} error={err}");
                Outcome::new(
                    None,
                    Notification::error("Export failed", "Could not export notes."),
                )
            }
        }
    }

    /// Removes every note; returns the removed ids.
    pub fn clear(&mut self) -> Outcome<Vec<NoteId>> {
        let Effect::Cleared(removed) = self.apply(NoteAction::Clear) else {
            unreachable!("clear always produces Effect::Cleared");
        };
        let ids = removed.into_iter().map(|note| note.id).collect::<Vec<_>>();
        info!("event=notes_clear module=service status=ok count={}", ids.len());
        self.finish(
            ids,
            Notification::error("All notes deleted", "Your notebook is now empty."),
        )
    }

    fn delete_action(&mut self, action: NoteAction) -> Outcome<Vec<NoteId>> {
        match self.apply(action) {
            Effect::Deleted(removed) => {
                let ids = removed.iter().map(|note| note.id.clone()).collect::<Vec<_>>();
                info!("event=note_delete module=service status=ok count={}", ids.len());
                let notification = match removed.as_slice() {
                    [single] => Notification::error(
                        "Note deleted",
                        format!("Note \"{}\" was deleted.", single.title),
                    ),
                    many => Notification::error(
                        format!("{} notes deleted", many.len()),
                        format!("{} notes were deleted.", many.len()),
                    ),
                };
                self.finish(ids, notification)
            }
            _ => Outcome::new(
                Vec::new(),
                Notification::info("Nothing deleted", "No matching notes were found."),
            ),
        }
    }

    fn apply(&mut self, action: NoteAction) -> Effect {
        let reduced = reduce(&self.state, action);
        self.state = reduced.state;
        reduced.effect
    }

    /// Persists the current state and attaches any write warning.
    fn finish<T>(&self, value: T, notification: Notification) -> Outcome<T> {
        let mut outcome = Outcome::new(value, notification);
        if persist_notes(&self.store, self.state.notes()).is_err() {
            outcome.persistence_warning = Some(Notification::warning(
                "Changes not saved",
                "Notes could not be written to storage; they will be lost on restart.",
            ));
        }
        outcome
    }
}
