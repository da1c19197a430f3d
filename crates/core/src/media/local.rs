//! Filesystem media backend.
//!
//! Layout: `{root}/{images|videos}/{uuid}.{ext}`, referenced as
//! `{url_prefix}/{images|videos}/{uuid}.{ext}`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::{
    file_extension, generate_file_name, parse_reference, MediaError, MediaKind, MediaStorage,
};

/// Stores media as plain files below a root directory.
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    root: PathBuf,
    url_prefix: String,
}

impl LocalMediaStorage {
    /// `url_prefix` is the public path the root is served under (e.g. `/uploads`).
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Create the per-kind directories. Called once at startup.
    pub async fn ensure_dirs(&self) -> Result<(), MediaError> {
        for kind in MediaKind::ALL {
            fs::create_dir_all(self.root.join(kind.dir_name())).await?;
        }
        Ok(())
    }

    fn reference_for(&self, kind: MediaKind, name: &str) -> String {
        format!("{}/{}/{}", self.url_prefix, kind.dir_name(), name)
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn store(
        &self,
        kind: MediaKind,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, MediaError> {
        let ext = file_extension(original_name);
        let name = generate_file_name(ext.as_deref());
        let dir = self.root.join(kind.dir_name());
        fs::create_dir_all(&dir).await?;

        let final_path = dir.join(&name);
        let temp_path = dir.join(format!(".{name}.tmp"));

        // Temp file, then rename into place.
        let mut file = fs::File::create(&temp_path).await?;
        if let Err(e) = write_all_synced(&mut file, bytes).await {
            drop(file);
            discard_temp(&temp_path).await;
            return Err(e.into());
        }
        drop(file);
        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            warn!(from = %temp_path.display(), to = %final_path.display(), error = %e, "media: rename failed");
            discard_temp(&temp_path).await;
            return Err(e.into());
        }

        let reference = self.reference_for(kind, &name);
        debug!(%kind, original_name, %reference, size = bytes.len(), "media: stored");
        Ok(reference)
    }

    async fn delete(&self, reference: &str) -> Result<bool, MediaError> {
        let path = self.resolve(reference)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(%reference, "media: deleted");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(%reference, "media: already absent");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, reference: &str) -> Result<PathBuf, MediaError> {
        let (kind, name) = parse_reference(&self.url_prefix, reference)?;
        Ok(self.root.join(kind.dir_name()).join(name))
    }
}

async fn write_all_synced(file: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.sync_all().await
}

/// Remove a leftover temp file. A failure is logged, never returned.
async fn discard_temp(path: &Path) -> bool {
    match fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "media: temp file cleanup failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn storage(dir: &tempfile::TempDir) -> LocalMediaStorage {
        LocalMediaStorage::new(dir.path(), "/uploads/")
    }

    fn leftover_temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
                    .count()
            })
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn store_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let media = storage(&dir);

        media
            .store(MediaKind::Video, "clip.mp4", b"video-bytes")
            .await
            .unwrap();

        assert_eq!(leftover_temp_files(&dir.path().join("videos")), 0);
    }

    #[tokio::test]
    async fn discard_temp_removes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let temp = dir.path().join(".partial.png.tmp");
        std::fs::write(&temp, b"half").unwrap();

        assert!(discard_temp(&temp).await);
        assert!(!temp.exists());
        assert!(!discard_temp(&temp).await);
    }

    #[tokio::test]
    async fn store_writes_file_under_kind_dir() {
        let dir = tempfile::tempdir().unwrap();
        let media = storage(&dir);

        let reference = media
            .store(MediaKind::Image, "Login Error.PNG", b"png-bytes")
            .await
            .unwrap();

        assert!(reference.starts_with("/uploads/images/"), "{reference}");
        assert!(reference.ends_with(".png"), "{reference}");

        let path = media.resolve(&reference).unwrap();
        assert!(path.starts_with(dir.path().join("images")));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn store_never_reuses_client_filename() {
        let dir = tempfile::tempdir().unwrap();
        let media = storage(&dir);

        let a = media
            .store(MediaKind::Video, "../../clip.mp4", b"one")
            .await
            .unwrap();
        let b = media
            .store(MediaKind::Video, "../../clip.mp4", b"two")
            .await
            .unwrap();

        assert_ne!(a, b);
        assert!(!a.contains(".."));
        assert_eq!(tokio::fs::read(media.resolve(&a).unwrap()).await.unwrap(), b"one");
        assert_eq!(tokio::fs::read(media.resolve(&b).unwrap()).await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn delete_removes_file_then_reports_absent() {
        let dir = tempfile::tempdir().unwrap();
        let media = storage(&dir);
        let reference = media
            .store(MediaKind::Image, "a.jpg", b"jpg")
            .await
            .unwrap();

        assert!(media.delete(&reference).await.unwrap());
        assert!(!media.resolve(&reference).unwrap().exists());
        // Already gone: tolerated no-op.
        assert!(!media.delete(&reference).await.unwrap());
    }

    #[tokio::test]
    async fn delete_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let media = storage(&dir);
        assert_matches!(
            media.delete("/uploads/images/../../etc/passwd").await,
            Err(MediaError::InvalidReference(_))
        );
    }

    #[tokio::test]
    async fn ensure_dirs_creates_partitions() {
        let dir = tempfile::tempdir().unwrap();
        let media = LocalMediaStorage::new(dir.path().join("nested"), "/uploads");
        media.ensure_dirs().await.unwrap();
        assert!(dir.path().join("nested/images").is_dir());
        assert!(dir.path().join("nested/videos").is_dir());
        assert_eq!(media.url_prefix(), "/uploads");
    }
}
