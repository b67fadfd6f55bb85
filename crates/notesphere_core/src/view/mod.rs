//! Read-side projections of the note collection.
//!
//! # Responsibility
//! - Search filtering and default ordering for the list view.
//! - Column sorting and multi-row selection for the table view.
//! - Text helpers for rendering (search highlight, body preview).
//!
//! # Invariants
//! - Projections borrow notes; they never mutate the collection.

pub mod highlight;
pub mod list;
pub mod preview;
pub mod table;
