//! JSON encoding: pretty-printed array of note objects.

use super::{ImportError, ParsedImport};
use crate::model::note::Note;
use serde_json::Value;

pub fn to_json(notes: &[Note]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(notes)
}

/// Parses a JSON import file. Every array element becomes a candidate.
pub fn parse_json(text: &str) -> Result<ParsedImport, ImportError> {
    let value: Value =
        serde_json::from_str(text.trim_start_matches('\u{feff}')).map_err(ImportError::Malformed)?;
    match value {
        Value::Array(candidates) => Ok(ParsedImport {
            candidates,
            malformed_rows: 0,
        }),
        _ => Err(ImportError::NotAnArray),
    }
}
