//! Persistence layer for the note collection.
//!
//! # Responsibility
//! - Define the keyed-entry storage contract used by the note service.
//! - Isolate SQLite details from state management.
//!
//! # Invariants
//! - Stores persist whole collections; there are no partial writes.

pub mod note_store;
