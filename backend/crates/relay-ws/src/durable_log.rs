use crate::{Result as WsErrorResult, WsError};

use relay_core::Record;

use std::io::ErrorKind;
use std::panic::Location;
use std::path::{Path, PathBuf};

use error_location::ErrorLocation;

/// Outcome of reading the history file at startup
#[derive(Debug)]
pub enum LoadStatus {
    /// File decoded; history holds `count` records
    Loaded { count: usize },
    /// No file yet; history starts empty
    NoHistory,
    /// File present but unusable; history starts empty and the file is left as is
    Corrupt(WsError),
}

/// Ordered, disk-backed history of accepted records.
///
/// Every append rewrites the whole file as a pretty-printed JSON array.
/// The write goes to a sibling temp file first and is renamed into place,
/// so the file on disk is always some complete earlier version.
#[derive(Debug)]
pub struct DurableLog {
    path: PathBuf,
    records: Vec<Record>,
}

impl DurableLog {
    /// An empty log that will persist to `path` on first append
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }

    /// Read the history file. Never fails: absent or unreadable files yield an empty log.
    pub async fn load(path: impl Into<PathBuf>) -> (Self, LoadStatus) {
        let path = path.into();

        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return (Self::empty(path), LoadStatus::NoHistory);
            }
            Err(source) => {
                let error = WsError::LogRead {
                    path: path.clone(),
                    source,
                    location: ErrorLocation::from(Location::caller()),
                };
                return (Self::empty(path), LoadStatus::Corrupt(error));
            }
        };

        match serde_json::from_slice::<Vec<Record>>(&raw) {
            Ok(records) => {
                let count = records.len();
                (Self { path, records }, LoadStatus::Loaded { count })
            }
            Err(source) => {
                let error = WsError::CorruptLog {
                    path: path.clone(),
                    source,
                    location: ErrorLocation::from(Location::caller()),
                };
                (Self::empty(path), LoadStatus::Corrupt(error))
            }
        }
    }

    /// Append in memory, then rewrite the file.
    ///
    /// The record stays in memory even when the write fails.
    pub async fn append(&mut self, record: Record) -> WsErrorResult<()> {
        self.records.push(record);
        self.persist().await
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self) -> WsErrorResult<()> {
        let encoded = serde_json::to_vec_pretty(&self.records).map_err(|e| WsError::Persist {
            path: self.path.clone(),
            source: e.into(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = self.temp_path();
        let result = async {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&temp_path, &encoded).await?;
            tokio::fs::rename(&temp_path, &self.path).await
        }
        .await;

        result.map_err(|source| {
            // Best effort; a stale temp file is replaced by the next append
            let _ = std::fs::remove_file(&temp_path);
            WsError::Persist {
                path: self.path.clone(),
                source,
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("history"));
        self.path.with_file_name(format!(".{file_name}.tmp"))
    }
}
