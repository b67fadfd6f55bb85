//! Note editor: field validation and image attachment intake.
//!
//! # Responsibility
//! - Validate editor input before it reaches the note service.
//! - Turn attached image files into inline `data:` URIs within limits.
//!
//! # Invariants
//! - Submission never bypasses `validate_draft`.
//! - A rejected image never aborts the rest of its batch.

pub mod form;
pub mod images;

/// Field and attachment limits enforced by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorLimits {
    pub title_max_chars: usize,
    pub objective_max_chars: usize,
    pub max_images: usize,
    pub max_image_bytes: u64,
}

impl Default for EditorLimits {
    fn default() -> Self {
        Self {
            title_max_chars: 100,
            objective_max_chars: 200,
            max_images: 5,
            max_image_bytes: 2 * 1024 * 1024,
        }
    }
}
