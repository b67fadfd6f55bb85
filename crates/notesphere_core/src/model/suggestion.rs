//! AI suggestion item.

use serde::{Deserialize, Serialize};

/// One AI-generated idea related to a note. Presentation-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    /// Short heading.
    pub title: String,
    /// Markdown body.
    pub details: String,
    /// Optional category such as "Comando" or "Fragmento de Código".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl SuggestionItem {
    pub fn new(title: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            details: details.into(),
            kind: None,
        }
    }
}
