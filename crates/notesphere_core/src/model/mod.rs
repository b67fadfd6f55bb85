//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical persisted note record and its identifier scheme.
//! - Define the ephemeral AI suggestion item shape.
//!
//! # Invariants
//! - `NoteId` is unique within one stored collection.
//! - `Note::created_at` always parses as a timestamp.
//! - Suggestion items are never persisted.

pub mod note;
pub mod suggestion;
