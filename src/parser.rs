//! Site Log Parser
//!
//! Scans a glftpd site log for NUKE lines and turns them into structured
//! [`NukeEvent`]s. The log is written in a single-byte legacy encoding
//! (ISO-8859-1), so the file is decoded with `encoding_rs` rather than read
//! as UTF-8.
//!
//! Parsing is best-effort: a line that carries the NUKE marker but does not
//! match the full event pattern is skipped and counted in [`ParseStats`],
//! never raised as an error.

use crate::models::{Contribution, NukeEvent};
use anyhow::{Context, Result};
use encoding_rs::mem::decode_latin1;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Sixth whitespace token of every nuke line in the site log.
const NUKE_MARKER: &str = "NUKE:";
const MARKER_TOKEN_INDEX: usize = 5;

/// Full event pattern: timestamp, quoted release path, quoted nuker, quoted
/// multiplier, quoted reason, then the free-form uploader section.
const EVENT_PATTERN: &str = r#"(?P<timestamp>\w+ \w+ \d+ \d+:\d+:\d+ \d+) NUKE: "(?P<release>.*?)" "(?P<nuker>.*?)" "(?P<multiplier>\d+)" "(?P<reason>.*?)" (?P<contribs>.*)"#;

/// Repeated `<user> <kilobytes>` pairs inside the uploader section.
const CONTRIBUTION_PATTERN: &str = r"(\w+) (\d+\.\d+)";

/// Counters for one pass over the log, exposed so callers can report how
/// much of the file was actually usable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Total lines scanned.
    pub lines: usize,
    /// NUKE lines successfully parsed into events.
    pub events: usize,
    /// Lines carrying the NUKE marker that failed the event pattern.
    pub skipped: usize,
}

/// Result of scanning a whole log file.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub events: Vec<NukeEvent>,
    pub stats: ParseStats,
}

pub struct LogParser {
    event: Regex,
    contribution: Regex,
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser {
    pub fn new() -> Self {
        Self {
            event: Regex::new(EVENT_PATTERN).expect("event pattern is valid"),
            contribution: Regex::new(CONTRIBUTION_PATTERN).expect("contribution pattern is valid"),
        }
    }

    /// Scan the whole site log, returning every NUKE event plus counters.
    pub fn parse_file(&self, path: &Path) -> Result<ParseOutcome> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read site log: {}", path.display()))?;
        let text = decode_latin1(&bytes);

        let mut outcome = ParseOutcome::default();
        for line in text.lines() {
            outcome.stats.lines += 1;

            if line.split_whitespace().nth(MARKER_TOKEN_INDEX) != Some(NUKE_MARKER) {
                continue;
            }

            match self.parse_line(line) {
                Some(event) => {
                    outcome.stats.events += 1;
                    outcome.events.push(event);
                }
                None => {
                    outcome.stats.skipped += 1;
                    tracing::debug!(line, "Skipping malformed NUKE line");
                }
            }
        }

        Ok(outcome)
    }

    /// Parse a single NUKE line. Returns `None` when the line does not match
    /// the event pattern.
    pub fn parse_line(&self, line: &str) -> Option<NukeEvent> {
        let caps = self.event.captures(line)?;

        let release_path = caps.name("release")?.as_str();
        let release = release_path.rsplit('/').next().unwrap_or(release_path);
        let multiplier: u32 = caps.name("multiplier")?.as_str().parse().ok()?;

        let contributions = self
            .contribution
            .captures_iter(caps.name("contribs")?.as_str())
            .filter_map(|pair| {
                let kilobytes: f64 = pair.get(2)?.as_str().parse().ok()?;
                Some(Contribution {
                    username: pair.get(1)?.as_str().to_string(),
                    kilobytes,
                })
            })
            .collect();

        Some(NukeEvent {
            timestamp: caps.name("timestamp")?.as_str().to_string(),
            release: release.to_string(),
            nuker: caps.name("nuker")?.as_str().to_string(),
            multiplier,
            reason: caps.name("reason")?.as_str().to_string(),
            contributions,
        })
    }
}
