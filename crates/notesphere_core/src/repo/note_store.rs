//! Storage adapter: durable mirror of the note collection.
//!
//! # Responsibility
//! - Keep one keyed entry holding the JSON array of all notes.
//! - Reload that entry on startup, failing open to an empty collection.
//!
//! # Invariants
//! - Writes are full replacements of the entry (last writer wins).
//! - `load_notes` never returns an error to the caller.
//! - The store is a dumb mirror; the note service owns the collection.

use crate::db::DbError;
use crate::model::note::{validate_note_shape, Note};
use log::{debug, error, info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Entry key used when no key is configured.
pub const DEFAULT_STORAGE_KEY: &str = "notesphere-notes-json";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage adapter failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialize(serde_json::Error),
    /// Connection is not migrated for note storage.
    MissingRequiredTable(&'static str),
    /// Store refused the write (quota, simulated failure).
    WriteRejected(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize notes: {err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::WriteRejected(reason) => write!(f, "write rejected: {reason}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::MissingRequiredTable(_) | Self::WriteRejected(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Keyed text entry persistence used by the note service.
pub trait NoteStore {
    /// Reads the raw serialized entry, `None` when it was never written.
    fn load(&self) -> StoreResult<Option<String>>;
    /// Replaces the serialized entry.
    fn save(&self, payload: &str) -> StoreResult<()>;
}

/// SQLite-backed store writing to the `kv_entries` table.
pub struct SqliteNoteStore {
    conn: Connection,
    key: String,
}

impl SqliteNoteStore {
    /// Wraps a migrated connection; rejects connections without `kv_entries`.
    pub fn try_new(conn: Connection, key: impl Into<String>) -> StoreResult<Self> {
        if !table_exists(&conn, "kv_entries")? {
            return Err(StoreError::MissingRequiredTable("kv_entries"));
        }
        Ok(Self {
            conn,
            key: key.into(),
        })
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }
}

impl NoteStore for SqliteNoteStore {
    fn load(&self) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, payload: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), payload],
        )?;
        Ok(())
    }
}

/// In-process store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    entry: RefCell<Option<String>>,
    reject_writes: Cell<bool>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw entry (possibly corrupt).
    pub fn with_entry(payload: impl Into<String>) -> Self {
        Self {
            entry: RefCell::new(Some(payload.into())),
            reject_writes: Cell::new(false),
        }
    }

    /// Makes every following `save` fail, like a full quota.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    pub fn raw_entry(&self) -> Option<String> {
        self.entry.borrow().clone()
    }
}

impl NoteStore for MemoryNoteStore {
    fn load(&self) -> StoreResult<Option<String>> {
        Ok(self.entry.borrow().clone())
    }

    fn save(&self, payload: &str) -> StoreResult<()> {
        if self.reject_writes.get() {
            return Err(StoreError::WriteRejected("quota exceeded".to_string()));
        }
        *self.entry.borrow_mut() = Some(payload.to_string());
        Ok(())
    }
}

/// Reloads the note collection from `store`.
///
/// Absent, unreadable or unparseable entries yield an empty collection.
/// Individual records failing shape validation are dropped.
pub fn load_notes(store: &impl NoteStore) -> Vec<Note> {
    let raw = match store.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("event=notes_load module=store status=ok source=empty count=0");
            return Vec::new();
        }
        Err(err) => {
            warn!("event=notes_load module=store status=error fallback=empty error={err}");
            return Vec::new();
        }
    };

    let candidates = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!("event=notes_load module=store status=error fallback=empty error=not_an_array");
            return Vec::new();
        }
        Err(err) => {
            warn!("event=notes_load module=store status=error fallback=empty error={err}");
            return Vec::new();
        }
    };

    let total = candidates.len();
    let notes = candidates
        .iter()
        .filter_map(|candidate| match validate_note_shape(candidate) {
            Ok(note) => Some(note),
            Err(err) => {
                debug!("event=notes_load module=store status=skip reason={err}");
                None
            }
        })
        .collect::<Vec<_>>();

    if notes.len() < total {
        warn!(
            "event=notes_load module=store status=ok count={} dropped={}",
            notes.len(),
            total - notes.len()
        );
    } else {
        info!("event=notes_load module=store status=ok count={}", notes.len());
    }
    notes
}

/// Writes the full collection to `store`.
///
/// # Errors
/// - Serialization or backend failures; the caller reports them and moves on.
pub fn persist_notes(store: &impl NoteStore, notes: &[Note]) -> StoreResult<()> {
    let result = serde_json::to_string(notes)
        .map_err(StoreError::from)
        .and_then(|payload| store.save(&payload));
    match &result {
        Ok(()) => debug!("event=notes_persist module=store status=ok count={}", notes.len()),
        Err(err) => error!(
            "event=notes_persist module=store status=error count={} error={err}",
            notes.len()
        ),
    }
    result
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_entry_falls_back_to_empty() {
        let store = MemoryNoteStore::with_entry("{not json");
        assert!(load_notes(&store).is_empty());
    }

    #[test]
    fn non_array_entry_falls_back_to_empty() {
        let store = MemoryNoteStore::with_entry(r#"{"id":"1"}"#);
        assert!(load_notes(&store).is_empty());
    }

    #[test]
    fn invalid_records_are_dropped_individually() {
        let store = MemoryNoteStore::with_entry(
            r#"[
                {"id":"24050101","title":"a","objective":"b","notesArea":"c",
                 "createdAt":"2024-05-01T10:00:00.000Z","isPinned":false,"images":[]},
                {"id":"24050102","title":"a"}
            ]"#,
        );
        let notes = load_notes(&store);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id.as_str(), "24050101");
    }

    #[test]
    fn rejected_write_surfaces_error() {
        let store = MemoryNoteStore::new();
        store.reject_writes(true);
        let err = persist_notes(&store, &[]).unwrap_err();
        assert!(matches!(err, StoreError::WriteRejected(_)));
        assert!(store.raw_entry().is_none());
    }
}
