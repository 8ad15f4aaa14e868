//! Nuke Record Store
//!
//! Flat CSV store holding one row per uploader contribution to a nuked
//! release. The file carries a header row and a fixed column order; rows are
//! append-only except for retention pruning, which rewrites the whole file.
//!
//! Failure taxonomy:
//! - missing store file: treated as empty, not an error
//! - malformed row (bad timestamp, multiplier, or size): the whole read
//!   errors, no partial recovery
//! - pruning rewrites through a temp file and an atomic rename; the store is
//!   never left truncated

use crate::models::{NukeKey, NukeRecord};
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Store timestamp layout, e.g. `Mon Jan 02 15:04:05 2006`. Matches the site
/// log's own timestamp tokens, so rows keep the log's exact wording.
pub const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

const STORE_HEADER: [&str; 6] = [
    "Timestamp",
    "Username",
    "Release",
    "Nuke Reason",
    "Multiplier",
    "Total GB",
];

/// Parse a store/log timestamp into a naive local datetime.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .with_context(|| format!("Unparseable store timestamp: {raw}"))
}

pub struct NukeStore {
    path: PathBuf,
}

impl NukeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row of the store. A missing file is an empty store; a
    /// malformed row fails the whole read.
    pub fn load(&self) -> Result<Vec<NukeRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .with_context(|| format!("Failed to open store: {}", self.path.display()))?;

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: NukeRecord =
                row.with_context(|| format!("Malformed row in {}", self.path.display()))?;
            records.push(record);
        }
        Ok(records)
    }

    /// Composite keys of every row currently in the store.
    pub fn existing_keys(&self) -> Result<HashSet<NukeKey>> {
        Ok(self.load()?.iter().map(NukeRecord::key).collect())
    }

    /// Append rows to the store, creating it (with header) on first write.
    pub fn append(&self, records: &[NukeRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let needs_header = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open store for append: {}", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record(STORE_HEADER)?;
        }
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().context("Failed to flush store")?;

        Ok(records.len())
    }

    /// Drop rows older than the retention window, rewriting the store.
    ///
    /// Returns the number of surviving rows, or `None` when the store does
    /// not exist yet. Any read or timestamp parse error aborts before the
    /// rewrite, leaving the store untouched.
    pub fn prune(&self, now: NaiveDateTime, retention_days: i64) -> Result<Option<usize>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let cutoff = now - Duration::days(retention_days);
        let mut kept = Vec::new();
        for record in self.load()? {
            if parse_timestamp(&record.timestamp)? > cutoff {
                kept.push(record);
            }
        }

        self.rewrite(&kept)?;
        Ok(Some(kept.len()))
    }

    /// Replace the store contents via temp file + atomic rename.
    fn rewrite(&self, records: &[NukeRecord]) -> Result<()> {
        let tmp_path = self.path.with_extension("tmp");

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&tmp_path)
            .with_context(|| format!("Failed to create temp store: {}", tmp_path.display()))?;
        writer.write_record(STORE_HEADER)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().context("Failed to flush temp store")?;
        drop(writer);

        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace store: {}", self.path.display()))?;
        Ok(())
    }
}
