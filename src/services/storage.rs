use crate::error::AppError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Filesystem-backed storage. Every uploaded file lives directly under the
/// root directory; callers are responsible for passing sanitized names.
///
/// Concurrent writes to the same name race at the filesystem level and
/// resolve to last-writer-wins. There is no locking or atomic rename.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the storage root if it does not exist yet
    pub async fn ensure_root(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Writes the full content under the given name, replacing any
    /// existing file of the same name.
    pub async fn save(&self, name: &str, data: &[u8]) -> Result<(), AppError> {
        fs::write(self.root.join(name), data).await?;
        Ok(())
    }

    /// Reads the full content of a stored file
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, AppError> {
        match fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists regular files directly under the root, sorted lexicographically.
    /// Subdirectories are not entered.
    pub async fn list(&self) -> Result<Vec<String>, AppError> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                files.push(name.to_string());
            }
        }

        files.sort();
        Ok(files)
    }
}
