//! Suggestion client: never-failing facade over a [`SuggestionModel`].

use super::model::SuggestionModel;
use super::parse::parse_suggestions;
use super::prompt::{build_note_content, is_direct_query, PromptTemplate};
use crate::model::note::Note;
use crate::model::suggestion::SuggestionItem;
use log::{error, info, warn};
use std::time::Instant;

/// Message shown when suggestions could not be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Could not load suggestions. Try selecting the note again.";

/// Display-ready result of one suggestion request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionOutcome {
    pub items: Vec<SuggestionItem>,
    /// User-facing failure message; `None` on success (even with no items).
    pub error: Option<String>,
}

impl SuggestionOutcome {
    fn failed() -> Self {
        Self {
            items: Vec::new(),
            error: Some(LOAD_FAILED_MESSAGE.to_string()),
        }
    }
}

pub struct SuggestionClient<M: SuggestionModel> {
    model: M,
    template: PromptTemplate,
}

impl<M: SuggestionModel> SuggestionClient<M> {
    pub fn new(model: M, template: PromptTemplate) -> Self {
        Self { model, template }
    }

    /// Requests suggestions for one note.
    pub async fn suggest(&self, note: &Note) -> SuggestionOutcome {
        self.suggest_content(&build_note_content(note)).await
    }

    /// Requests suggestions for pre-built note content.
    ///
    /// Blank content (all fields empty) is not sent to the model.
    pub async fn suggest_content(&self, note_content: &str) -> SuggestionOutcome {
        if is_blank_content(note_content) {
            info!("event=ai_suggest module=ai status=skip reason=blank_content");
            return SuggestionOutcome::default();
        }

        let started_at = Instant::now();
        let prompt = self.template.render(note_content);
        let output = match self.model.generate(&prompt).await {
            Ok(output) => output,
            Err(err) => {
                error!(
                    "event=ai_suggest module=ai status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                return SuggestionOutcome::failed();
            }
        };

        let items = parse_suggestions(&output);
        if items.is_empty() {
            let case = if is_direct_query(note_content) {
                "direct_query"
            } else {
                "elaborate_note"
            };
            warn!("event=ai_suggest module=ai status=empty case={case}");
        } else {
            info!(
                "event=ai_suggest module=ai status=ok count={} duration_ms={}",
                items.len(),
                started_at.elapsed().as_millis()
            );
        }
        SuggestionOutcome { items, error: None }
    }
}

fn is_blank_content(note_content: &str) -> bool {
    note_content.lines().all(|line| {
        let value = line.split_once(':').map_or(line, |(_, value)| value);
        value.trim().is_empty()
    })
}
