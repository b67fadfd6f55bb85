//! Note editor form state and validation.

use super::images::{accept_batch, ImageFile, IntakeReport};
use super::EditorLimits;
use crate::model::note::{Note, NoteDraft};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Objective,
    NotesArea,
    Images,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Objective => "objective",
            Self::NotesArea => "notesArea",
            Self::Images => "images",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    TooLong { max: usize, actual: usize },
    TooMany { max: usize, actual: usize },
}

/// One failing editor field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub kind: FieldErrorKind,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let field = self.field.as_str();
        match &self.kind {
            FieldErrorKind::Required => write!(f, "{field} is required"),
            FieldErrorKind::TooLong { max, actual } => {
                write!(f, "{field} must be {max} characters or fewer (got {actual})")
            }
            FieldErrorKind::TooMany { max, actual } => {
                write!(f, "{field} allows at most {max} entries (got {actual})")
            }
        }
    }
}

/// Validates a draft against editor limits, reporting every failing field.
///
/// Required fields must contain something other than whitespace; lengths
/// are counted in chars.
pub fn validate_draft(draft: &NoteDraft, limits: &EditorLimits) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_text(&mut errors, FormField::Title, &draft.title, Some(limits.title_max_chars));
    check_text(
        &mut errors,
        FormField::Objective,
        &draft.objective,
        Some(limits.objective_max_chars),
    );
    check_text(&mut errors, FormField::NotesArea, &draft.notes_area, None);
    if draft.images.len() > limits.max_images {
        errors.push(FieldError {
            field: FormField::Images,
            kind: FieldErrorKind::TooMany {
                max: limits.max_images,
                actual: draft.images.len(),
            },
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_text(errors: &mut Vec<FieldError>, field: FormField, value: &str, max: Option<usize>) {
    if value.trim().is_empty() {
        errors.push(FieldError {
            field,
            kind: FieldErrorKind::Required,
        });
        return;
    }
    let actual = value.chars().count();
    if let Some(max) = max.filter(|max| actual > *max) {
        errors.push(FieldError {
            field,
            kind: FieldErrorKind::TooLong { max, actual },
        });
    }
}

/// Validated payload ready for the note service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSubmission {
    Create(NoteDraft),
    /// Full replacement keeping id, `createdAt` and pin state.
    Update(Note),
}

/// Open editor: either a new note or an existing one being edited.
#[derive(Debug, Clone)]
pub struct NoteForm {
    editing: Option<Note>,
    draft: NoteDraft,
    limits: EditorLimits,
}

impl NoteForm {
    pub fn new(limits: EditorLimits) -> Self {
        Self {
            editing: None,
            draft: NoteDraft::default(),
            limits,
        }
    }

    /// Opens the editor pre-filled with `note`.
    pub fn edit(note: Note, limits: EditorLimits) -> Self {
        let draft = NoteDraft {
            title: note.title.clone(),
            objective: note.objective.clone(),
            notes_area: note.notes_area.clone(),
            images: note.images.clone(),
        };
        Self {
            editing: Some(note),
            draft,
            limits,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_objective(&mut self, objective: impl Into<String>) {
        self.draft.objective = objective.into();
    }

    pub fn set_notes_area(&mut self, notes_area: impl Into<String>) {
        self.draft.notes_area = notes_area.into();
    }

    /// Attaches a batch of image files, keeping whatever fits.
    pub fn attach_images(&mut self, files: Vec<ImageFile>) -> IntakeReport {
        let report = accept_batch(self.draft.images.len(), files, &self.limits);
        self.draft.images.extend(report.accepted.iter().cloned());
        report
    }

    /// Removes the image at `index`; out-of-range indexes are ignored.
    pub fn remove_image(&mut self, index: usize) {
        if index < self.draft.images.len() {
            self.draft.images.remove(index);
        }
    }

    /// Validates and produces the payload for the note service.
    pub fn submit(&self) -> Result<FormSubmission, Vec<FieldError>> {
        validate_draft(&self.draft, &self.limits)?;
        let draft = self.draft.clone();
        Ok(match &self.editing {
            Some(original) => FormSubmission::Update(Note {
                id: original.id.clone(),
                title: draft.title,
                objective: draft.objective,
                notes_area: draft.notes_area,
                created_at: original.created_at.clone(),
                is_pinned: original.is_pinned,
                images: draft.images,
            }),
            None => FormSubmission::Create(draft),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::note::NoteId;

    #[test]
    fn reports_every_failing_field() {
        let draft = NoteDraft::new("x".repeat(101), " ", "");
        let errors = validate_draft(&draft, &EditorLimits::default()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError {
                    field: FormField::Title,
                    kind: FieldErrorKind::TooLong {
                        max: 100,
                        actual: 101
                    }
                },
                FieldError {
                    field: FormField::Objective,
                    kind: FieldErrorKind::Required
                },
                FieldError {
                    field: FormField::NotesArea,
                    kind: FieldErrorKind::Required
                },
            ]
        );
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let draft = NoteDraft::new("ñ".repeat(100), "objetivo", "notas");
        assert!(validate_draft(&draft, &EditorLimits::default()).is_ok());
    }

    #[test]
    fn editing_keeps_identity_fields() {
        let original = Note {
            id: NoteId::new("24050101"),
            title: "old".to_string(),
            objective: "goal".to_string(),
            notes_area: "body".to_string(),
            created_at: "2024-05-01T10:00:00.000Z".to_string(),
            is_pinned: true,
            images: Vec::new(),
        };
        let mut form = NoteForm::edit(original.clone(), EditorLimits::default());
        form.set_title("new");
        let FormSubmission::Update(updated) = form.submit().unwrap() else {
            panic!("editing form must submit an update");
        };
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.is_pinned);
        assert_eq!(updated.title, "new");
    }
}
