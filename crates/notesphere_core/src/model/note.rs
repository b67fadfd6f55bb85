//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted `Note` record with its external JSON field names.
//! - Generate day-sequence note ids.
//! - Validate untrusted candidate records (import, storage reload).
//!
//! # Invariants
//! - `id` is immutable after creation.
//! - `created_at` is an RFC 3339 (or plain date/time) string that parses.
//! - `images` is serialized as an array, never omitted.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ID_DATE_FORMAT: &str = "%y%m%d";
const ID_DATE_LEN: usize = 6;
const ID_SEQUENCE_LEN: usize = 2;
/// Longest suffix still read as a day sequence; longer digit runs are foreign ids.
const ID_SEQUENCE_MAX_LEN: usize = 9;

/// Identifier of a note: `YYMMDD` followed by a per-day sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Wraps an existing id value (import, storage reload, CLI input).
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the per-day sequence when this id follows the day scheme
    /// for `day_prefix`.
    fn sequence_for_day(&self, day_prefix: &str) -> Option<u64> {
        let value = self.0.as_str();
        if !value.starts_with(day_prefix) {
            return None;
        }
        let suffix = &value[day_prefix.len()..];
        if !(ID_SEQUENCE_LEN..=ID_SEQUENCE_MAX_LEN).contains(&suffix.len())
            || !suffix.chars().all(|ch| ch.is_ascii_digit())
        {
            return None;
        }
        suffix.parse().ok()
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Canonical persisted note record.
///
/// Field order matches the export layout:
/// `id,title,objective,notesArea,createdAt,isPinned,images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub objective: String,
    /// Markdown body.
    pub notes_area: String,
    /// Creation timestamp, default sort key.
    pub created_at: String,
    pub is_pinned: bool,
    /// Inline `data:` URIs, in attachment order.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Note {
    /// Creation time in epoch milliseconds.
    ///
    /// Stored notes are validated on entry, so the fallback only applies to
    /// records built by hand with a bad timestamp; those sort last.
    pub fn created_at_millis(&self) -> i64 {
        parse_timestamp(&self.created_at).map_or(i64::MIN, |ts| ts.timestamp_millis())
    }
}

/// Editor payload for a note that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub objective: String,
    pub notes_area: String,
    pub images: Vec<String>,
}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        objective: impl Into<String>,
        notes_area: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            objective: objective.into(),
            notes_area: notes_area.into(),
            images: Vec::new(),
        }
    }

    /// Materializes the draft into a note with the given identity.
    pub fn into_note(self, id: NoteId, created_at: DateTime<Utc>) -> Note {
        Note {
            id,
            title: self.title,
            objective: self.objective,
            notes_area: self.notes_area,
            created_at: format_timestamp(created_at),
            is_pinned: false,
            images: self.images,
        }
    }
}

/// Computes the next id for a note created on `today`.
///
/// Sequence is `1 + max(sequence)` over existing ids carrying today's prefix;
/// collisions across runs are avoided by scanning current state only.
/// Suffixes longer than nine digits are not counted as sequences.
pub fn next_note_id<'a>(existing: impl IntoIterator<Item = &'a Note>, today: NaiveDate) -> NoteId {
    let prefix = today.format(ID_DATE_FORMAT).to_string();
    let max_sequence = existing
        .into_iter()
        .filter_map(|note| note.id.sequence_for_day(&prefix))
        .max()
        .unwrap_or(0);
    let next_sequence = max_sequence.checked_add(1).unwrap_or(u64::MAX);
    NoteId(format!(
        "{prefix}{:0width$}",
        next_sequence,
        width = ID_SEQUENCE_LEN
    ))
}

/// Local calendar day used as the id prefix for `now`.
pub fn id_day(now: DateTime<Local>) -> NaiveDate {
    now.date_naive()
}

/// Formats a timestamp the way notes store it (`2024-05-01T10:00:00.000Z`).
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a stored/imported timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) and a
/// bare `YYYY-MM-DD` date.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Shape validation failure for one candidate note record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Candidate is not a JSON object.
    NotAnObject,
    MissingField(&'static str),
    /// Field exists but has the wrong JSON type.
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    EmptyId,
    InvalidTimestamp(String),
    InvalidPinned(String),
    /// `images` is neither absent nor an array of strings.
    InvalidImages,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "note record must be an object"),
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::WrongType { field, expected } => {
                write!(f, "field `{field}` must be {expected}")
            }
            Self::EmptyId => write!(f, "field `id` cannot be empty"),
            Self::InvalidTimestamp(value) => write!(f, "invalid createdAt value `{value}`"),
            Self::InvalidPinned(value) => write!(f, "invalid isPinned value `{value}`"),
            Self::InvalidImages => write!(f, "field `images` must be an array of strings"),
        }
    }
}

impl Error for NoteValidationError {}

/// Validates an untrusted candidate record and converts it into a `Note`.
///
/// # Contract
/// - `id,title,objective,notesArea,createdAt` must be strings.
/// - `createdAt` must parse via [`parse_timestamp`]; the original text is kept.
/// - `isPinned` accepts a bool or a bool-like string (`true/false/1/0/yes/no`).
/// - `images` may be absent or null; otherwise every entry must be a string.
pub fn validate_note_shape(candidate: &Value) -> Result<Note, NoteValidationError> {
    let object = candidate
        .as_object()
        .ok_or(NoteValidationError::NotAnObject)?;

    let id = required_string(object, "id")?;
    if id.trim().is_empty() {
        return Err(NoteValidationError::EmptyId);
    }
    let title = required_string(object, "title")?;
    let objective = required_string(object, "objective")?;
    let notes_area = required_string(object, "notesArea")?;
    let created_at = required_string(object, "createdAt")?;
    if parse_timestamp(&created_at).is_none() {
        return Err(NoteValidationError::InvalidTimestamp(created_at));
    }
    let is_pinned = parse_pinned(object.get("isPinned"))?;
    let images = parse_images(object.get("images"))?;

    Ok(Note {
        id: NoteId(id),
        title,
        objective,
        notes_area,
        created_at,
        is_pinned,
        images,
    })
}

fn required_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<String, NoteValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(NoteValidationError::MissingField(field)),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(NoteValidationError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

fn parse_pinned(value: Option<&Value>) -> Result<bool, NoteValidationError> {
    match value {
        None | Some(Value::Null) => Err(NoteValidationError::MissingField("isPinned")),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(Value::String(text)) => parse_bool_like(text)
            .ok_or_else(|| NoteValidationError::InvalidPinned(text.clone())),
        Some(other) => Err(NoteValidationError::InvalidPinned(other.to_string())),
    }
}

/// Parses the textual boolean spellings seen in exported files.
pub fn parse_bool_like(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_images(value: Option<&Value>) -> Result<Vec<String>, NoteValidationError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(NoteValidationError::InvalidImages)
            })
            .collect(),
        Some(_) => Err(NoteValidationError::InvalidImages),
    }
}
