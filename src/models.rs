//! Core Data Models
//!
//! The data flows through these models in the following sequence:
//!
//! 1. **Raw Data**: [`NukeEvent`] - One NUKE line parsed from the site log,
//!    carrying the per-uploader size contributions
//! 2. **Storage**: [`NukeRecord`] - One CSV row per uploader contribution,
//!    keyed by [`NukeKey`] for deduplication
//! 3. **Reports**: [`UserStats`], [`NukeDetail`] - Per-user aggregation over
//!    the store
//!
//! All store types round-trip through the CSV header
//! `Timestamp,Username,Release,Nuke Reason,Multiplier,Total GB`; the
//! `Total GB` column always carries exactly two decimal places.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kilobytes per gigabyte (1024 * 1024), matching the site's accounting unit.
pub const KB_PER_GB: f64 = 1_048_576.0;

/// One row of the nuke store.
///
/// `total_gb` is the uploader's share of the nuked release, already converted
/// from kilobytes and rounded to two decimals. Uniqueness is on the other
/// five fields; `total_gb` is not part of [`NukeKey`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NukeRecord {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Release")]
    pub release: String,
    #[serde(rename = "Nuke Reason")]
    pub nuke_reason: String,
    #[serde(rename = "Multiplier")]
    pub multiplier: u32,
    #[serde(rename = "Total GB", with = "gb_column")]
    pub total_gb: f64,
}

impl NukeRecord {
    pub fn key(&self) -> NukeKey {
        NukeKey {
            timestamp: self.timestamp.clone(),
            username: self.username.clone(),
            release: self.release.clone(),
            nuke_reason: self.nuke_reason.clone(),
            multiplier: self.multiplier,
        }
    }
}

/// Composite uniqueness key for a [`NukeRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NukeKey {
    pub timestamp: String,
    pub username: String,
    pub release: String,
    pub nuke_reason: String,
    pub multiplier: u32,
}

/// Uploader share of a nuked release, in kilobytes as logged.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub username: String,
    pub kilobytes: f64,
}

/// A single NUKE line from the site log, before expansion into store rows.
#[derive(Debug, Clone, PartialEq)]
pub struct NukeEvent {
    pub timestamp: String,
    /// Final path segment of the nuked release.
    pub release: String,
    /// The operator who issued the nuke. Not stored per row; the rows carry
    /// the penalized uploaders instead.
    pub nuker: String,
    pub multiplier: u32,
    pub reason: String,
    pub contributions: Vec<Contribution>,
}

impl NukeEvent {
    /// Expand into one store row per uploader contribution, converting
    /// kilobytes to gigabytes.
    pub fn records(&self) -> Vec<NukeRecord> {
        self.contributions
            .iter()
            .map(|c| NukeRecord {
                timestamp: self.timestamp.clone(),
                username: c.username.clone(),
                release: self.release.clone(),
                nuke_reason: self.reason.clone(),
                multiplier: self.multiplier,
                total_gb: kb_to_gb(c.kilobytes),
            })
            .collect()
    }
}

/// Convert kilobytes to gigabytes, rounded to two decimals.
pub fn kb_to_gb(kilobytes: f64) -> f64 {
    ((kilobytes / KB_PER_GB) * 100.0).round() / 100.0
}

/// Per-user aggregation over the store, in store (append) order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub username: String,
    pub total_gb: f64,
    pub count: u32,
    /// Frequency of each nuke reason. Tracked for the aggregate but not part
    /// of any report output.
    #[serde(skip)]
    pub reason_counts: HashMap<String, u32>,
    pub details: Vec<NukeDetail>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NukeDetail {
    pub timestamp: String,
    pub release: String,
    pub nuke_reason: String,
    pub multiplier: u32,
    pub total_gb: f64,
}

/// CSV column codec for `Total GB`: always written with two decimal places,
/// read back as a plain float.
mod gb_column {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:.2}", value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim().parse::<f64>().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> NukeEvent {
        NukeEvent {
            timestamp: "Mon Jan 02 03:04:05 2024".to_string(),
            release: "REL.NAME-GROUP".to_string(),
            nuker: "nukerX".to_string(),
            multiplier: 2,
            reason: "bad_format".to_string(),
            contributions: vec![
                Contribution {
                    username: "userA".to_string(),
                    kilobytes: 512000.0,
                },
                Contribution {
                    username: "userB".to_string(),
                    kilobytes: 1024.50,
                },
            ],
        }
    }

    #[test]
    fn test_kb_to_gb_rounding() {
        assert_eq!(kb_to_gb(1_048_576.00), 1.00);
        assert_eq!(kb_to_gb(512000.0), 0.49);
        assert_eq!(kb_to_gb(1024.50), 0.00);
    }

    #[test]
    fn test_event_expands_per_contribution() {
        let records = sample_event().records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].username, "userA");
        assert_eq!(records[0].total_gb, 0.49);
        assert_eq!(records[1].username, "userB");
        assert_eq!(records[1].total_gb, 0.00);

        // Everything except username and size is shared between siblings.
        assert_eq!(records[0].timestamp, records[1].timestamp);
        assert_eq!(records[0].release, records[1].release);
        assert_eq!(records[0].nuke_reason, records[1].nuke_reason);
        assert_eq!(records[0].multiplier, records[1].multiplier);
    }

    #[test]
    fn test_key_excludes_total_gb() {
        let records = sample_event().records();
        let mut resized = records[0].clone();
        resized.total_gb = 123.45;

        assert_eq!(records[0].key(), resized.key());
        assert_ne!(records[0].key(), records[1].key());
    }
}
