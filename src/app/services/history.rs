use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

use crate::app::infrastructure::error::{AppError, Result};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// One previously imported file. Older history files used `content` and
/// `fileType` for the text and the language tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub file_name: String,
    #[serde(alias = "content")]
    pub text: String,
    #[serde(alias = "fileType")]
    pub language_tag: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

pub trait HistoryStore {
    /// Record an import. Replaces any record with the same file name and
    /// moves it to the front.
    fn save(&mut self, file_name: &str, text: &str, language_tag: &str) -> Result<()>;

    /// Most recent first.
    fn records(&self) -> &[HistoryRecord];

    fn get(&self, index: usize) -> Option<&HistoryRecord> {
        self.records().get(index)
    }

    fn remove(&mut self, index: usize) -> Result<Option<HistoryRecord>>;
}

/// History persisted as a pretty-printed JSON array.
pub struct FileHistory {
    path: PathBuf,
    records: Vec<HistoryRecord>,
    limit: usize,
}

/// Returns the history file path: data_dir/revealpad/history.json
pub fn history_path() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("revealpad");
    path.push("history.json");
    path
}

impl FileHistory {
    /// Open the history at `path`. Missing or unreadable files start empty.
    pub fn open(path: impl Into<PathBuf>, limit: usize) -> Self {
        let path = path.into();
        let mut records = read_records(&path);
        records.truncate(limit);
        Self { path, records, limit }
    }

    pub fn open_default(limit: usize) -> Self {
        Self::open(history_path(), limit)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.records)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

fn read_records(path: &Path) -> Vec<HistoryRecord> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read history");
            return Vec::new();
        }
    };
    match serde_json::from_str(&contents) {
        Ok(records) => records,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "history file is corrupt, starting empty");
            Vec::new()
        }
    }
}

impl HistoryStore for FileHistory {
    fn save(&mut self, file_name: &str, text: &str, language_tag: &str) -> Result<()> {
        self.records.retain(|r| r.file_name != file_name);
        self.records.insert(
            0,
            HistoryRecord {
                file_name: file_name.to_string(),
                text: text.to_string(),
                language_tag: language_tag.to_string(),
                timestamp: now_millis(),
            },
        );
        self.records.truncate(self.limit);
        self.persist()
    }

    fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    fn remove(&mut self, index: usize) -> Result<Option<HistoryRecord>> {
        if index >= self.records.len() {
            return Ok(None);
        }
        let removed = self.records.remove(index);
        self.persist()
            .map_err(|e| AppError::History(format!("failed to persist removal of {}: {}", removed.file_name, e)))?;
        Ok(Some(removed))
    }
}

pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Short label for a history entry's age.
pub fn format_relative_time(timestamp: i64, now: i64) -> String {
    let diff = now - timestamp;
    if diff < MINUTE_MS {
        "just now".to_string()
    } else if diff < HOUR_MS {
        format!("{} min ago", diff / MINUTE_MS)
    } else if diff < DAY_MS {
        format!("{} h ago", diff / HOUR_MS)
    } else {
        match DateTime::from_timestamp_millis(timestamp) {
            Some(utc) => {
                let local = utc.with_timezone(&Local);
                format!("{}/{}", local.month(), local.day())
            }
            None => "?".to_string(),
        }
    }
}
