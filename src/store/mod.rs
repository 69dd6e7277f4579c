//! JSON-file persistence for the daily log store.
//!
//! The store maps ISO `YYYY-MM-DD` date keys to [`DailyLog`] entries. A
//! missing, empty, or unparseable file loads as an empty store: the tracker
//! always starts, even over a corrupt log. Saves rewrite the whole file;
//! last write wins.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::config::Config;
use crate::models::{DailyLog, SubjectRecord};

/// Map of ISO date key to that day's log. This is the exact on-disk shape.
pub type LogData = BTreeMap<String, DailyLog>;

/// The log store: in-memory data plus the file backing it.
///
/// The running process owns the in-memory copy exclusively for the
/// session's duration; the file is the source of truth across restarts.
pub struct LogStore {
    path: Option<PathBuf>,
    data: LogData,
}

impl LogStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = load(&path);
        Ok(Self {
            path: Some(path),
            data,
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "studytrack")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let path = dirs.data_dir().join("study_log.json");
        Self::open(path)
    }

    /// A store with no backing file. [`LogStore::save`] becomes a no-op.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: LogData::new(),
        }
    }

    // ============================================================
    // Day operations
    // ============================================================

    /// Get the day's log, creating it zeroed if absent. Every configured
    /// subject gets a record with its default goal; subjects added to the
    /// config after the day was first created are backfilled without
    /// touching existing records. Idempotent.
    pub fn ensure_day(&mut self, date_key: &str, config: &Config) -> &mut DailyLog {
        let day = self.data.entry(date_key.to_string()).or_default();
        for key in config.subjects.keys() {
            let goal = config.default_goals.get(key).copied().unwrap_or(0);
            day.subjects
                .entry(key.clone())
                .or_insert_with(|| SubjectRecord::with_goal(goal));
        }
        day
    }

    pub fn day(&self, date_key: &str) -> Option<&DailyLog> {
        self.data.get(date_key)
    }

    pub fn day_mut(&mut self, date_key: &str) -> Option<&mut DailyLog> {
        self.data.get_mut(date_key)
    }

    /// The full date-keyed map, for aggregation.
    pub fn data(&self) -> &LogData {
        &self.data
    }

    /// Persist the full store to the backing file, if there is one.
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => save_to(&self.data, path),
            None => Ok(()),
        }
    }
}

// ============================================================
// Persistence adapter
// ============================================================

/// Read a date-keyed record file. Missing, empty, and corrupt files all
/// load as an empty map; availability wins over flagging corruption here.
pub fn load(path: &Path) -> LogData {
    let Ok(content) = fs::read_to_string(path) else {
        return LogData::new();
    };
    if content.trim().is_empty() {
        return LogData::new();
    }
    match serde_json::from_str(&content) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(
                "log store at {} is unreadable, starting empty: {}",
                path.display(),
                e
            );
            LogData::new()
        }
    }
}

/// Serialize the store and rewrite the file. Pretty-printed, with stable
/// key order from the `BTreeMap`s underneath.
pub fn save_to(data: &LogData, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(data).context("Failed to serialize log store")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Today's store key, in the local timezone.
pub fn today_key() -> String {
    chrono::Local::now().date_naive().to_string()
}

/// Parse a store key back into a date. Store keys are plain ISO dates.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}
