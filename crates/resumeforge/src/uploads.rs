//! Upload and output directories.
//!
//! Photos are stored as `{YYYYmmddHHMMSS}_{original name}`. Two uploads with
//! the same name in the same second overwrite each other.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, Local};
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};

/// URL prefix under which uploaded photos are served.
pub const UPLOADS_URL_PREFIX: &str = "/static/uploads";

/// Timestamp prefix format for stored photo names.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

fn unsafe_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").expect("static pattern is valid"))
}

/// Reduce a client-supplied file name to a safe final path component.
#[must_use]
pub fn sanitize_filename(original: &str) -> String {
    let last = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();
    let cleaned = unsafe_chars().replace_all(last, "_");
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "photo".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Build the stored name for a photo uploaded at `now`.
#[must_use]
pub fn stored_photo_name(original: &str, now: DateTime<Local>) -> String {
    format!(
        "{}_{}",
        now.format(TIMESTAMP_FORMAT),
        sanitize_filename(original)
    )
}

/// The uploads and generated-documents directories.
#[derive(Debug, Clone)]
pub struct UploadStore {
    uploads_dir: PathBuf,
    generated_dir: PathBuf,
}

impl UploadStore {
    /// Create a store over the given directories.
    #[must_use]
    pub fn new(uploads_dir: impl Into<PathBuf>, generated_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            generated_dir: generated_dir.into(),
        }
    }

    /// Directory holding uploaded photos.
    #[must_use]
    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Directory holding generated documents.
    #[must_use]
    pub fn generated_dir(&self) -> &Path {
        &self.generated_dir
    }

    /// Create both directories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.uploads_dir, &self.generated_dir] {
            std::fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Path of a stored photo.
    #[must_use]
    pub fn photo_path(&self, name: &str) -> PathBuf {
        self.uploads_dir.join(name)
    }

    /// Store an uploaded photo and return its stored name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save_photo(
        &self,
        original: &str,
        data: &[u8],
        now: DateTime<Local>,
    ) -> Result<String> {
        let name = stored_photo_name(original, now);
        let path = self.photo_path(&name);
        tokio::fs::write(&path, data).await?;
        debug!(photo = %name, bytes = data.len(), "Stored uploaded photo");
        Ok(name)
    }

    /// Read a stored photo.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PhotoRead`] if the file is missing or unreadable.
    pub async fn read_photo(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.photo_path(name);
        tokio::fs::read(&path)
            .await
            .map_err(|source| Error::PhotoRead { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 17, 8, 30, 2).unwrap()
    }

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("me.jpg"), "me.jpg");
        assert_eq!(sanitize_filename("head-shot_2.PNG"), "head-shot_2.PNG");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename(r"C:\Users\ada\me.jpg"), "me.jpg");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
    }

    #[test]
    fn test_sanitize_empty_and_dotfiles() {
        assert_eq!(sanitize_filename(""), "photo");
        assert_eq!(sanitize_filename(".."), "photo");
        assert_eq!(sanitize_filename(".hidden.jpg"), "hidden.jpg");
    }

    #[test]
    fn test_stored_photo_name() {
        assert_eq!(
            stored_photo_name("me.jpg", fixed_now()),
            "20240517083002_me.jpg"
        );
    }

    #[tokio::test]
    async fn test_save_and_read_photo() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"), dir.path().join("generated"));
        store.ensure_dirs().unwrap();
        assert!(store.generated_dir().is_dir());

        let name = store
            .save_photo("me.jpg", b"jpeg-bytes", fixed_now())
            .await
            .unwrap();
        assert_eq!(name, "20240517083002_me.jpg");
        assert!(store.photo_path(&name).is_file());
        assert_eq!(store.read_photo(&name).await.unwrap(), b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_same_name_same_second_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), dir.path());

        let a = store.save_photo("me.jpg", b"first", fixed_now()).await.unwrap();
        let b = store.save_photo("me.jpg", b"second", fixed_now()).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.read_photo(&a).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_read_missing_photo() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), dir.path());

        let err = store.read_photo("nope.jpg").await.unwrap_err();
        assert!(matches!(err, Error::PhotoRead { .. }));
        assert!(err.is_render_error());
    }
}
