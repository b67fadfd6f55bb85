//! Image attachment intake.

use super::EditorLimits;
use crate::notify::Notification;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use log::{debug, warn};
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Raw image file picked or pasted by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing the mime type from its extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        Ok(Self::new(name, mime_type_from_extension(&ext), bytes))
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.bytes))
    }
}

/// Mime type for common image extensions; unknown extensions are octet streams.
pub fn mime_type_from_extension(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The note already holds the maximum number of images.
    LimitReached,
    TooLarge { bytes: u64, max: u64 },
    NotAnImage,
}

impl Display for RejectionReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LimitReached => write!(f, "image limit reached"),
            Self::TooLarge { bytes, max } => write!(
                f,
                "{:.2}MB exceeds the {:.0}MB limit",
                megabytes(*bytes),
                megabytes(*max)
            ),
            Self::NotAnImage => write!(f, "not an image file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRejection {
    pub name: String,
    pub reason: RejectionReason,
}

/// Outcome of one attachment batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeReport {
    /// Accepted images as `data:` URIs, in batch order.
    pub accepted: Vec<String>,
    pub rejected: Vec<ImageRejection>,
    pub notifications: Vec<Notification>,
}

/// Accepts a batch of files given `existing_count` images already attached.
///
/// Files are taken in order while under the count limit; oversize or
/// non-image files are rejected individually; once the limit is hit the
/// remaining files are rejected with a single notice.
pub fn accept_batch(existing_count: usize, files: Vec<ImageFile>, limits: &EditorLimits) -> IntakeReport {
    let mut report = IntakeReport::default();
    let available = limits.max_images.saturating_sub(existing_count);
    if files.len() > available {
        report.notifications.push(Notification::warning(
            "Image limit",
            format!(
                "You can attach at most {} images per note. Tried to add {}; currently {}/{}.",
                limits.max_images,
                files.len(),
                existing_count,
                limits.max_images
            ),
        ));
    }

    let mut limit_hit = false;
    for file in files {
        if existing_count + report.accepted.len() >= limits.max_images {
            limit_hit = true;
            report.rejected.push(ImageRejection {
                name: file.name,
                reason: RejectionReason::LimitReached,
            });
            continue;
        }
        if !file.mime_type.starts_with("image/") {
            warn!("event=image_intake module=editor status=skip reason=not_image");
            report.notifications.push(Notification::warning(
                "Unsupported file",
                format!("\"{}\" is not an image and was not added.", file.name),
            ));
            report.rejected.push(ImageRejection {
                name: file.name,
                reason: RejectionReason::NotAnImage,
            });
            continue;
        }
        if file.size() > limits.max_image_bytes {
            let reason = RejectionReason::TooLarge {
                bytes: file.size(),
                max: limits.max_image_bytes,
            };
            warn!(
                "event=image_intake module=editor status=skip reason=too_large bytes={}",
                file.size()
            );
            report.notifications.push(Notification::warning(
                "Image too large",
                format!("\"{}\" ({reason}) was not added.", file.name),
            ));
            report.rejected.push(ImageRejection {
                name: file.name,
                reason,
            });
            continue;
        }
        debug!("event=image_intake module=editor status=ok bytes={}", file.size());
        report.accepted.push(file.to_data_uri());
    }

    if limit_hit {
        report.notifications.push(Notification::warning(
            "Image limit reached",
            format!(
                "Only {} images per note; the remaining files were not added.",
                limits.max_images
            ),
        ));
    }
    report
}

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str, size: usize) -> ImageFile {
        ImageFile::new(name, "image/png", vec![0u8; size])
    }

    #[test]
    fn oversize_file_is_rejected_but_batch_continues() {
        let limits = EditorLimits::default();
        let files = vec![
            png("a.png", 10),
            png("big.png", 3 * 1024 * 1024),
            png("c.png", 10),
        ];
        let report = accept_batch(0, files, &limits);
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        assert!(matches!(
            report.rejected[0].reason,
            RejectionReason::TooLarge { .. }
        ));
        assert!(report.accepted[0].starts_with("data:image/png;base64,"));
    }

    #[test]
    fn count_limit_stops_the_batch() {
        let limits = EditorLimits::default();
        let files = (0..4).map(|idx| png(&format!("{idx}.png"), 4)).collect();
        let report = accept_batch(3, files, &limits);
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.rejected.len(), 2);
        assert!(report
            .rejected
            .iter()
            .all(|rejection| rejection.reason == RejectionReason::LimitReached));
        assert_eq!(report.notifications.len(), 2);
    }

    #[test]
    fn non_images_are_rejected() {
        let report = accept_batch(
            0,
            vec![ImageFile::new("doc.pdf", "application/pdf", vec![1])],
            &EditorLimits::default(),
        );
        assert!(report.accepted.is_empty());
        assert_eq!(report.rejected[0].reason, RejectionReason::NotAnImage);
    }

    #[test]
    fn mime_guess_covers_common_extensions() {
        assert_eq!(mime_type_from_extension("jpeg"), "image/jpeg");
        assert_eq!(mime_type_from_extension("txt"), "application/octet-stream");
    }
}
