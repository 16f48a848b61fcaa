use crate::harvester::PageCursor;
use crate::{StorageError, StorageResult};
use std::path::{Path, PathBuf};

/// Writes downloaded pages under the download root
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    /// Opens the store, creating the download root if absent
    pub async fn create(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| StorageError::CreateRoot {
                path: root.clone(),
                source,
            })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file for the cursor's page
    pub fn page_path(&self, cursor: &PageCursor) -> PathBuf {
        self.root.join(cursor.file_name())
    }

    /// Writes the page bytes, replacing any earlier download of the same page
    pub async fn save(&self, cursor: &PageCursor, bytes: &[u8]) -> StorageResult<PathBuf> {
        let path = self.page_path(cursor);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}
