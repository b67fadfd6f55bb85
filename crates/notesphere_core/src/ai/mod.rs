//! AI suggestion client.
//!
//! # Responsibility
//! - Build the model request from one note and a configurable template.
//! - Call an externally hosted model and validate its structured output.
//! - Keep only the latest request's result for the selected note.
//!
//! # Invariants
//! - Callers never see transport or parse errors; they get an empty list
//!   plus a display message.
//! - Nothing here touches persisted note state.

pub mod client;
pub mod model;
pub mod parse;
pub mod prompt;
pub mod session;
