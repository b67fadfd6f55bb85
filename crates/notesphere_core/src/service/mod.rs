//! Note use-case services.
//!
//! # Responsibility
//! - Keep collection semantics in a pure reducer (`note_state`).
//! - Wrap the reducer with persistence and notifications (`note_service`).

pub mod note_service;
pub mod note_state;
