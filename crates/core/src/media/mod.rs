//! Media storage for article screenshots and videos.
//!
//! Uploaded files are owned by a [`MediaStorage`] backend; article rows only
//! hold the URL-path references it hands back. Stored names are generated
//! (`<uuid>.<ext>`), so the client filename contributes nothing but its
//! extension and cannot collide with or escape the media directory.

pub mod local;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

pub use local::LocalMediaStorage;

// ---------------------------------------------------------------------------
// Media kinds
// ---------------------------------------------------------------------------

/// Media partitions. Each kind is stored under its own directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Image, MediaKind::Video];

    /// Directory name under the media root, also the URL segment.
    pub fn dir_name(self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }

    /// Admin form field that carries uploads of this kind.
    pub fn form_field(self) -> &'static str {
        match self {
            MediaKind::Image => "screenshots",
            MediaKind::Video => "video",
        }
    }

    pub fn from_dir_name(dir: &str) -> Option<Self> {
        MediaKind::ALL.into_iter().find(|k| k.dir_name() == dir)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => f.write_str("image"),
            MediaKind::Video => f.write_str("video"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Media-domain error type.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Invalid media reference: {0}")]
    InvalidReference(String),

    #[error("Media I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Storage backend
// ---------------------------------------------------------------------------

/// Backend holding uploaded media bytes.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Persist `bytes` under a generated name and return its reference.
    async fn store(
        &self,
        kind: MediaKind,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, MediaError>;

    /// Remove the file behind `reference`.
    ///
    /// Returns `Ok(false)` when the file was already gone; callers treat that
    /// as a no-op.
    async fn delete(&self, reference: &str) -> Result<bool, MediaError>;

    /// Map a reference back to the file it names.
    fn resolve(&self, reference: &str) -> Result<PathBuf, MediaError>;
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// Lowercase extension of a client-supplied filename.
///
/// Only the final path component is considered; extensions that are empty or
/// contain anything but ASCII alphanumerics yield `None`.
pub fn file_extension(original_name: &str) -> Option<String> {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Generate a unique stored filename, keeping `extension` when present.
pub fn generate_file_name(extension: Option<&str>) -> String {
    let id = uuid::Uuid::new_v4().simple();
    match extension {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}

/// Whether `name` is a single, plain path component we could have generated.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// Split `<prefix>/<kind dir>/<name>` into its kind and file name.
pub fn parse_reference<'a>(
    url_prefix: &str,
    reference: &'a str,
) -> Result<(MediaKind, &'a str), MediaError> {
    let invalid = || MediaError::InvalidReference(reference.to_string());

    let rest = reference
        .strip_prefix(url_prefix)
        .and_then(|r| r.strip_prefix('/'))
        .ok_or_else(invalid)?;
    let (dir, name) = rest.split_once('/').ok_or_else(invalid)?;
    let kind = MediaKind::from_dir_name(dir).ok_or_else(invalid)?;
    if !is_safe_file_name(name) {
        return Err(invalid());
    }
    Ok((kind, name))
}

// ---------------------------------------------------------------------------
// Upload policy
// ---------------------------------------------------------------------------

pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_MAX_VIDEO_BYTES: u64 = 200 * 1024 * 1024;
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

/// Size and type limits applied to uploads before anything is written.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_image_bytes: u64,
    pub max_video_bytes: u64,
    pub image_extensions: Vec<String>,
    pub video_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_video_bytes: DEFAULT_MAX_VIDEO_BYTES,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            video_extensions: DEFAULT_VIDEO_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl UploadPolicy {
    pub fn max_bytes(&self, kind: MediaKind) -> u64 {
        match kind {
            MediaKind::Image => self.max_image_bytes,
            MediaKind::Video => self.max_video_bytes,
        }
    }

    pub fn allowed_extensions(&self, kind: MediaKind) -> &[String] {
        match kind {
            MediaKind::Image => &self.image_extensions,
            MediaKind::Video => &self.video_extensions,
        }
    }

    /// Largest request body an admin submission can legitimately need:
    /// one video plus a generous allowance of screenshots and form text.
    pub fn max_request_bytes(&self) -> usize {
        let total = self
            .max_video_bytes
            .saturating_add(self.max_image_bytes.saturating_mul(10))
            .saturating_add(1024 * 1024);
        usize::try_from(total).unwrap_or(usize::MAX)
    }

    /// Check one upload, returning a user-facing message on rejection.
    pub fn check(&self, kind: MediaKind, original_name: &str, size: u64) -> Result<(), String> {
        let allowed = self.allowed_extensions(kind);
        let ext = file_extension(original_name).ok_or_else(|| {
            format!(
                "'{original_name}' has no file extension. Allowed {kind} types: {}",
                allowed.join(", ")
            )
        })?;
        if !allowed.iter().any(|a| a == &ext) {
            return Err(format!(
                "'{original_name}': unsupported {kind} type '.{ext}'. Allowed: {}",
                allowed.join(", ")
            ));
        }
        let max = self.max_bytes(kind);
        if size > max {
            return Err(format!(
                "'{original_name}' is {size} bytes; the {kind} limit is {max} bytes"
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn extension_is_lowercased_and_taken_from_last_component() {
        assert_eq!(file_extension("Screen Shot.PNG"), Some("png".into()));
        assert_eq!(file_extension("../../etc/passwd.jpg"), Some("jpg".into()));
        assert_eq!(file_extension("C:\\Users\\me\\clip.MP4"), Some("mp4".into()));
    }

    #[test]
    fn extension_rejects_odd_names() {
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension(".bashrc"), None);
        assert_eq!(file_extension("trailing."), None);
        assert_eq!(file_extension("weird.p/ng"), None);
        assert_eq!(file_extension("evil.ph p"), None);
    }

    #[test]
    fn generated_names_are_unique_and_safe() {
        let a = generate_file_name(Some("png"));
        let b = generate_file_name(Some("png"));
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
        assert!(is_safe_file_name(&a));
        assert!(is_safe_file_name(&generate_file_name(None)));
    }

    #[test]
    fn safe_file_name_rules() {
        assert!(is_safe_file_name("0f3a.png"));
        assert!(!is_safe_file_name(""));
        assert!(!is_safe_file_name(".hidden"));
        assert!(!is_safe_file_name("a/b.png"));
        assert!(!is_safe_file_name("a..png"));
        assert!(!is_safe_file_name("a b.png"));
    }

    #[test]
    fn parse_reference_accepts_generated_paths() {
        let (kind, name) = parse_reference("/uploads", "/uploads/images/abc123.png").unwrap();
        assert_eq!(kind, MediaKind::Image);
        assert_eq!(name, "abc123.png");

        let (kind, _) = parse_reference("/uploads", "/uploads/videos/abc123.mp4").unwrap();
        assert_eq!(kind, MediaKind::Video);
    }

    #[test]
    fn parse_reference_rejects_traversal_and_foreign_paths() {
        for bad in [
            "/uploads/images/../../secret.txt",
            "/uploads/images/sub/dir.png",
            "/uploads/docs/file.pdf",
            "/static/images/a.png",
            "/uploadsimages/a.png",
            "/uploads/images/",
            "https://example.com/a.png",
        ] {
            assert_matches!(
                parse_reference("/uploads", bad),
                Err(MediaError::InvalidReference(_)),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn policy_accepts_allowed_types_within_limits() {
        let policy = UploadPolicy::default();
        assert!(policy.check(MediaKind::Image, "shot.PNG", 1024).is_ok());
        assert!(policy.check(MediaKind::Video, "demo.webm", 1024).is_ok());
    }

    #[test]
    fn policy_rejects_wrong_type_for_kind() {
        let policy = UploadPolicy::default();
        let msg = policy.check(MediaKind::Image, "demo.mp4", 10).unwrap_err();
        assert!(msg.contains("unsupported image type '.mp4'"), "{msg}");
        assert!(policy.check(MediaKind::Video, "shot.png", 10).is_err());
        assert!(policy.check(MediaKind::Image, "README", 10).is_err());
    }

    #[test]
    fn policy_rejects_oversized_files() {
        let policy = UploadPolicy {
            max_image_bytes: 100,
            ..UploadPolicy::default()
        };
        assert!(policy.check(MediaKind::Image, "a.png", 100).is_ok());
        let msg = policy.check(MediaKind::Image, "a.png", 101).unwrap_err();
        assert!(msg.contains("limit is 100 bytes"), "{msg}");
    }

    #[test]
    fn request_limit_covers_a_full_submission() {
        let policy = UploadPolicy::default();
        assert!(policy.max_request_bytes() as u64 > policy.max_video_bytes);
    }
}
