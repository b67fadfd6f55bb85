//! Import/export serializer.
//!
//! # Responsibility
//! - Map the note collection to a portable text file (JSON or CSV).
//! - Parse such files back into candidate records for shape validation.
//!
//! # Invariants
//! - Parsing never validates note shape; that is the note service's job.
//! - Format-level problems reject the whole file; row-level problems only
//!   count the row as malformed.

pub mod csv;
pub mod json;

use crate::model::note::Note;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Json => "notesphere_notes.json",
            Self::Csv => "notesphere_pro_export.csv",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }

    /// Picks the format of an import file.
    ///
    /// Known extensions win; otherwise content starting with `[` is JSON and
    /// anything else is treated as CSV.
    pub fn detect(path: Option<&Path>, content: &str) -> Self {
        let by_extension = path
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse::<Self>().ok());
        if let Some(format) = by_extension {
            return format;
        }
        if content.trim_start_matches('\u{feff}').trim_start().starts_with('[') {
            Self::Json
        } else {
            Self::Csv
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" | "txt" => Ok(Self::Csv),
            other => Err(format!("unsupported format `{other}`; expected json|csv")),
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Csv => "csv",
        })
    }
}

/// Whole-file import rejection.
#[derive(Debug)]
pub enum ImportError {
    /// File has no content besides whitespace.
    Empty,
    /// JSON text does not parse.
    Malformed(serde_json::Error),
    /// JSON top level is not an array.
    NotAnArray,
    /// CSV header line does not match the export header.
    UnrecognizedHeader(String),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "the selected file is empty"),
            Self::Malformed(err) => write!(f, "file is not valid JSON: {err}"),
            Self::NotAnArray => write!(f, "file does not contain a JSON array of notes"),
            Self::UnrecognizedHeader(found) => write!(
                f,
                "unrecognized CSV header `{found}`; expected `{}`",
                csv::CSV_HEADER.join(",")
            ),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

/// Parsed import file: candidate records plus rows that could not even
/// become a candidate (wrong column count, unterminated quote).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedImport {
    pub candidates: Vec<Value>,
    pub malformed_rows: usize,
}

/// Serializes the full collection in `format`.
pub fn export_notes(notes: &[Note], format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => json::to_json(notes),
        ExportFormat::Csv => Ok(csv::to_csv(notes)),
    }
}

/// Parses an import file in `format` into candidate records.
pub fn parse_import(text: &str, format: ExportFormat) -> Result<ParsedImport, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::Empty);
    }
    match format {
        ExportFormat::Json => json::parse_json(text),
        ExportFormat::Csv => csv::parse_csv(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_extension_then_content() {
        assert_eq!(
            ExportFormat::detect(Some(Path::new("notes.JSON")), "ID,Title"),
            ExportFormat::Json
        );
        assert_eq!(
            ExportFormat::detect(Some(Path::new("export.txt")), "[]"),
            ExportFormat::Csv
        );
        assert_eq!(ExportFormat::detect(None, "  [ {} ]"), ExportFormat::Json);
        assert_eq!(
            ExportFormat::detect(Some(Path::new("notes")), "ID,Title"),
            ExportFormat::Csv
        );
    }

    #[test]
    fn blank_input_is_rejected_as_empty() {
        assert!(matches!(
            parse_import("  \n ", ExportFormat::Json),
            Err(ImportError::Empty)
        ));
    }
}
