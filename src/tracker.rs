//! Nuke Tracking Engine
//!
//! Orchestrates the pipeline: retention pruning, log ingestion with
//! deduplication, and per-user reporting. This is the single error boundary
//! of the crate. Every fallible step below returns `Result`, and the tracker
//! decides whether to log-and-degrade or log-and-continue; nothing here ever
//! propagates an error to the process exit code.

use crate::config::Config;
use crate::display::DisplayManager;
use crate::models::{NukeEvent, NukeKey, NukeRecord};
use crate::parser::LogParser;
use crate::query;
use crate::store::NukeStore;
use chrono::Local;
use std::collections::HashSet;
use tracing::{error, info};

pub struct NukeTracker {
    config: Config,
    parser: LogParser,
    display: DisplayManager,
}

impl NukeTracker {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            parser: LogParser::new(),
            display: DisplayManager::new(),
        }
    }

    fn store(&self) -> NukeStore {
        NukeStore::new(&self.config.paths.store_file)
    }

    /// Prune stale rows, then ingest new NUKE events from the site log.
    pub fn run_update(&self) {
        let store = self.store();

        match store.prune(Local::now().naive_local(), self.config.retention.days) {
            Ok(Some(remaining)) => {
                info!(remaining, "Pruned store to retention window");
            }
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, "Error pruning store");
                return;
            }
        }

        // A failed key read degrades to an empty set so ingestion can still
        // run; re-appended rows are caught by the next successful prune+load.
        let existing_keys = match store.existing_keys() {
            Ok(keys) => keys,
            Err(e) => {
                error!(error = %e, "Error reading existing store keys");
                HashSet::new()
            }
        };

        let outcome = match self.parser.parse_file(&self.config.paths.log_file) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Error processing site log");
                return;
            }
        };
        if outcome.stats.skipped > 0 {
            info!(
                skipped = outcome.stats.skipped,
                "Some NUKE lines did not match the event pattern"
            );
        }

        let new_records = dedup_records(&outcome.events, existing_keys);
        if new_records.is_empty() {
            info!("No new NUKE entries found");
            return;
        }

        match store.append(&new_records) {
            Ok(added) => info!(added, "New entries added to the store"),
            Err(e) => error!(error = %e, "Error appending to store"),
        }
    }

    /// Print the per-user report, or a no-data message.
    pub fn run_report(&self, username: &str, json_output: bool) {
        let records = match self.store().load() {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "Error reading store");
                Vec::new()
            }
        };

        match query::user_stats(&records, username) {
            Some(stats) => {
                self.display
                    .display_user_stats(&stats, self.config.retention.days, json_output)
            }
            None => self.display.display_no_data(username, json_output),
        }
    }
}

/// Expand events into store rows, dropping any row whose key is already in
/// the store or was produced earlier in this run.
fn dedup_records(events: &[NukeEvent], mut seen: HashSet<NukeKey>) -> Vec<NukeRecord> {
    let mut new_records = Vec::new();
    for event in events {
        for record in event.records() {
            if seen.insert(record.key()) {
                new_records.push(record);
            }
        }
    }
    new_records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contribution, NukeEvent};

    fn event(release: &str, users: &[(&str, f64)]) -> NukeEvent {
        NukeEvent {
            timestamp: "Mon Jan 02 03:04:05 2024".to_string(),
            release: release.to_string(),
            nuker: "op".to_string(),
            multiplier: 2,
            reason: "dupe".to_string(),
            contributions: users
                .iter()
                .map(|(name, kb)| Contribution {
                    username: name.to_string(),
                    kilobytes: *kb,
                })
                .collect(),
        }
    }

    #[test]
    fn test_dedup_drops_rows_already_in_store() {
        let events = vec![event("REL.ONE-GRP", &[("userA", 512000.0), ("userB", 10.0)])];
        let mut seen = HashSet::new();
        seen.insert(events[0].records()[0].key());

        let fresh = dedup_records(&events, seen);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].username, "userB");
    }

    #[test]
    fn test_dedup_within_single_run() {
        // The same event twice in one log pass must only land once.
        let events = vec![
            event("REL.ONE-GRP", &[("userA", 512000.0)]),
            event("REL.ONE-GRP", &[("userA", 512000.0)]),
        ];
        let fresh = dedup_records(&events, HashSet::new());
        assert_eq!(fresh.len(), 1);
    }

    #[test]
    fn test_dedup_keeps_distinct_releases() {
        let events = vec![
            event("REL.ONE-GRP", &[("userA", 512000.0)]),
            event("REL.TWO-GRP", &[("userA", 512000.0)]),
        ];
        let fresh = dedup_records(&events, HashSet::new());
        assert_eq!(fresh.len(), 2);
    }
}
