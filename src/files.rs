//! File access used by the pipeline.
//!
//! Everything that reads or writes post sources, templates and published
//! artifacts goes through `FileAccess`, so the processors never touch the
//! disk directly and tests can observe exactly which operations ran.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// The file operations the pipeline needs.
#[async_trait]
pub trait FileAccess: Send + Sync {
    /// Read a whole file as UTF-8 text.
    async fn read(&self, path: &Path) -> io::Result<String>;

    /// Write `content` to `path`, replacing any existing file.
    ///
    /// Implementations must not leave a truncated file at `path` when the
    /// write fails.
    async fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Create `path` and its parents. Succeeds if it already exists.
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// `FileAccess` backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

#[async_trait]
impl FileAccess for LocalFiles {
    async fn read(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        // Write next to the target then rename, so readers only ever see a
        // complete file.
        let staging = staging_path(path);
        if let Err(e) = tokio::fs::write(&staging, content).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e);
        }
        if let Err(e) = tokio::fs::rename(&staging, path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e);
        }
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_replaces_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("post.html");

        LocalFiles.write(&path, "first").await.unwrap();
        LocalFiles.write(&path, "second").await.unwrap();

        assert_eq!(LocalFiles.read(&path).await.unwrap(), "second");
        assert!(!staging_path(&path).exists());
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails_cleanly() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing").join("post.html");

        let err = LocalFiles.write(&path, "content").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = LocalFiles
            .read(&temp_dir.path().join("nope.md"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_create_dir_all_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("a").join("b");

        LocalFiles.create_dir_all(&dir).await.unwrap();
        LocalFiles.create_dir_all(&dir).await.unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_staging_path() {
        assert_eq!(
            staging_path(Path::new("/out/date-released-a.html")),
            PathBuf::from("/out/date-released-a.html.partial")
        );
    }
}
