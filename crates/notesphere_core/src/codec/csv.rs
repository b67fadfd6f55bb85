//! CSV encoding with a fixed six-column header.
//!
//! # Invariants
//! - Fields containing `,` `"` CR or LF are quoted; inner quotes are doubled.
//! - The tokenizer reads the whole buffer in one pass: line breaks inside a
//!   quoted field are data, line breaks outside quotes end the record.
//! - There is no images column; imported rows get an empty image list.

use super::{ImportError, ParsedImport};
use crate::model::note::Note;
use log::debug;
use serde_json::{json, Value};
use std::iter::Peekable;
use std::str::Chars;

/// Header line written on export and required on import.
pub const CSV_HEADER: [&str; 6] = [
    "ID",
    "Title",
    "Objective",
    "NotesArea",
    "CreatedAt",
    "IsPinned",
];

/// One tokenized record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    pub fields: Vec<String>,
    /// 1-based line on which the record starts.
    pub line: usize,
    /// Input ended inside a quoted field.
    pub unterminated: bool,
}

pub fn to_csv(notes: &[Note]) -> String {
    let mut lines = Vec::with_capacity(notes.len() + 1);
    lines.push(CSV_HEADER.join(","));
    for note in notes {
        let pinned = if note.is_pinned { "true" } else { "false" };
        let row = [
            note.id.as_str(),
            note.title.as_str(),
            note.objective.as_str(),
            note.notes_area.as_str(),
            note.created_at.as_str(),
            pinned,
        ]
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(",");
        lines.push(row);
    }
    lines.join("\n")
}

/// Quotes a field when it contains a delimiter, quote or line break.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Parses a CSV import file into candidate records.
///
/// # Errors
/// - `UnrecognizedHeader` when the first record is not [`CSV_HEADER`].
/// - `Empty` when the buffer holds no records at all.
pub fn parse_csv(text: &str) -> Result<ParsedImport, ImportError> {
    let mut records = tokenize_csv(text.trim_start_matches('\u{feff}')).into_iter();
    let header = records.next().ok_or(ImportError::Empty)?;
    if !is_expected_header(&header.fields) {
        return Err(ImportError::UnrecognizedHeader(header.fields.join(",")));
    }

    let mut parsed = ParsedImport::default();
    for record in records {
        if record.unterminated || record.fields.len() != CSV_HEADER.len() {
            debug!(
                "event=csv_row module=codec status=skip line={} fields={} unterminated={}",
                record.line,
                record.fields.len(),
                record.unterminated
            );
            parsed.malformed_rows += 1;
            continue;
        }
        parsed.candidates.push(record_to_candidate(record.fields));
    }
    Ok(parsed)
}

fn is_expected_header(fields: &[String]) -> bool {
    fields.len() == CSV_HEADER.len()
        && fields
            .iter()
            .zip(CSV_HEADER)
            .all(|(found, expected)| found.trim().eq_ignore_ascii_case(expected))
}

fn record_to_candidate(fields: Vec<String>) -> Value {
    let mut fields = fields.into_iter();
    let mut next = || fields.next().unwrap_or_default();
    let id = next();
    let title = next();
    let objective = next();
    let notes_area = next();
    let created_at = next();
    let is_pinned = next();
    json!({
        "id": id,
        "title": title,
        "objective": objective,
        "notesArea": notes_area,
        "createdAt": created_at,
        "isPinned": is_pinned,
        "images": [],
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    /// Saw a quote while inside a quoted field: either an escaped quote or
    /// the closing quote.
    QuoteInQuoted,
}

/// Splits a whole CSV buffer into records.
///
/// Blank lines are skipped; a trailing line break does not produce an empty
/// record. Text after a closing quote is kept as part of the field.
pub fn tokenize_csv(input: &str) -> Vec<CsvRecord> {
    let mut tokenizer = Tokenizer::default();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match (tokenizer.state, ch) {
            (State::Quoted, '"') => tokenizer.state = State::QuoteInQuoted,
            (State::Quoted, _) => {
                if ch == '\n' {
                    tokenizer.line += 1;
                }
                tokenizer.field.push(ch);
            }
            (State::QuoteInQuoted, '"') => {
                tokenizer.field.push('"');
                tokenizer.state = State::Quoted;
            }
            (State::FieldStart, '"') => {
                tokenizer.saw_quote = true;
                tokenizer.state = State::Quoted;
            }
            (_, ',') => tokenizer.end_field(),
            (_, '\r' | '\n') => {
                consume_crlf(ch, &mut chars);
                tokenizer.end_record(false);
                tokenizer.line += 1;
            }
            (_, _) => {
                tokenizer.field.push(ch);
                tokenizer.state = State::Unquoted;
            }
        }
    }

    let unterminated = tokenizer.state == State::Quoted;
    tokenizer.end_record(unterminated);
    tokenizer.records
}

fn consume_crlf(ch: char, chars: &mut Peekable<Chars<'_>>) {
    if ch == '\r' && chars.peek() == Some(&'\n') {
        chars.next();
    }
}

struct Tokenizer {
    records: Vec<CsvRecord>,
    fields: Vec<String>,
    field: String,
    state: State,
    saw_quote: bool,
    line: usize,
    record_line: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            fields: Vec::new(),
            field: String::new(),
            state: State::FieldStart,
            saw_quote: false,
            line: 1,
            record_line: 1,
        }
    }
}

impl Tokenizer {
    fn end_field(&mut self) {
        self.fields.push(std::mem::take(&mut self.field));
        self.state = State::FieldStart;
    }

    fn end_record(&mut self, unterminated: bool) {
        let blank = self.fields.is_empty() && self.field.is_empty() && !self.saw_quote;
        if blank {
            self.state = State::FieldStart;
        } else {
            self.end_field();
            self.records.push(CsvRecord {
                fields: std::mem::take(&mut self.fields),
                line: self.record_line,
                unterminated,
            });
        }
        self.saw_quote = false;
        self.record_line = self.line + 1;
    }
}
