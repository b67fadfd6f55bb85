pub mod notes;
pub mod suggest;
pub mod transfer;

use anyhow::{bail, Result};
use notesphere_core::{Note, NoteId, NoteService, NoteStore};

/// Looks up a note by id or fails with a user-facing error.
pub fn require_note<S: NoteStore>(service: &NoteService<S>, id: &str) -> Result<Note> {
    match service.get_by_id(&NoteId::new(id)) {
        Some(note) => Ok(note.clone()),
        None => bail!("no note with id `{id}`"),
    }
}
