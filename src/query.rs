//! Per-User Query Engine
//!
//! Single pass over the store rows: filter by exact username, accumulate the
//! penalized gigabytes, the match count, the per-reason frequencies, and a
//! detail list preserving store (append) order. A username with no rows
//! yields `None` rather than a zero-valued aggregate.

use crate::models::{NukeDetail, NukeRecord, UserStats};
use std::collections::HashMap;

pub fn user_stats(records: &[NukeRecord], username: &str) -> Option<UserStats> {
    let mut total_gb = 0.0;
    let mut count = 0;
    let mut reason_counts: HashMap<String, u32> = HashMap::new();
    let mut details = Vec::new();

    for record in records.iter().filter(|r| r.username == username) {
        total_gb += record.total_gb;
        count += 1;
        *reason_counts.entry(record.nuke_reason.clone()).or_insert(0) += 1;
        details.push(NukeDetail {
            timestamp: record.timestamp.clone(),
            release: record.release.clone(),
            nuke_reason: record.nuke_reason.clone(),
            multiplier: record.multiplier,
            total_gb: record.total_gb,
        });
    }

    if count == 0 {
        return None;
    }

    Some(UserStats {
        username: username.to_string(),
        total_gb,
        count,
        reason_counts,
        details,
    })
}
