use crate::harvester::PageCursor;
use crate::{StorageError, StorageResult};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// chrono format for the bracketed log timestamp, e.g. `02 Jan 2006 - 15:04:05`
pub const LOG_TIMESTAMP_FORMAT: &str = "%d %b %Y - %H:%M:%S";

/// One successful page download
#[derive(Debug, Clone)]
pub struct DownloadRecord {
    pub identifier: String,
    pub page_number: u32,
    pub timestamp: DateTime<Local>,
}

impl DownloadRecord {
    /// Records the cursor's page as downloaded now
    pub fn now(cursor: &PageCursor) -> Self {
        Self {
            identifier: cursor.identifier.to_string(),
            page_number: cursor.page_number,
            timestamp: Local::now(),
        }
    }

    /// `[DD Mon YYYY - HH:MM:SS] Downloaded: <identifier> page <pageNumber>\n`
    pub fn to_log_line(&self) -> String {
        format!(
            "[{}] Downloaded: {} page {}\n",
            self.timestamp.format(LOG_TIMESTAMP_FORMAT),
            self.identifier,
            self.page_number
        )
    }
}

/// Append-only download log
///
/// Each record is written with a single `write_all`, so lines from concurrent
/// writers in append mode never interleave.
#[derive(Debug)]
pub struct DownloadLog {
    path: PathBuf,
    file: File,
}

impl DownloadLog {
    /// Opens the log in append mode, creating it if needed
    pub async fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| StorageError::LogAppend {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record
    pub async fn append(&mut self, record: &DownloadRecord) -> StorageResult<()> {
        let line = record.to_log_line();
        let map_err = |source: std::io::Error| StorageError::LogAppend {
            path: self.path.clone(),
            source,
        };
        self.file.write_all(line.as_bytes()).await.map_err(map_err)?;
        self.file.flush().await.map_err(map_err)
    }
}
