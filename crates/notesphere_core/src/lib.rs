//! Core domain logic for NoteSphere.
//! This crate owns the note collection, its persistence, import/export,
//! view derivations, editor validation and AI suggestions.

pub mod ai;
pub mod codec;
pub mod config;
pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod view;

pub use ai::client::{SuggestionClient, SuggestionOutcome};
pub use ai::model::{AiError, HttpSuggestionModel, ModelSettings, SuggestionModel};
pub use ai::prompt::PromptTemplate;
pub use ai::session::{refresh_suggestions, SuggestionSession, SuggestionState};
pub use codec::{ExportFormat, ImportError};
pub use config::{AppConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError};
pub use editor::form::{FieldError, FormSubmission, NoteForm};
pub use editor::images::ImageFile;
pub use editor::EditorLimits;
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::note::{Note, NoteDraft, NoteId};
pub use model::suggestion::SuggestionItem;
pub use notify::{Notification, NotificationLevel};
pub use repo::note_store::{MemoryNoteStore, NoteStore, SqliteNoteStore, StoreError};
pub use service::note_service::{ImportReport, NoteService, Outcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
