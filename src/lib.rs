//! Nuketrack Library
//!
//! Parses a glftpd site log for NUKE events (penalty actions against
//! uploaded releases), accumulates them into a durable CSV store with a
//! rolling 30-day retention window, and answers per-user aggregate queries
//! against that store.
//!
//! ## Pipeline
//!
//! - [`parser`] - scans the ISO-8859-1 site log and extracts structured
//!   [`NukeEvent`]s via pattern matching
//! - [`store`] - CSV-backed record store with deduplication keys, header
//!   management, and atomic retention pruning
//! - [`query`] - per-user aggregation over the store rows
//! - [`tracker`] - orchestrates prune → dedup → ingest and query → report;
//!   the single error boundary where failures degrade to logged no-ops
//! - [`display`] - terminal and JSON report rendering
//! - [`config`] / [`logging`] - explicit configuration and tracing setup
//!
//! Ingestion is idempotent: every store row carries a composite key of
//! (timestamp, username, release, reason, multiplier), and re-running over
//! an unchanged log adds nothing.

pub mod config;
pub mod display;
pub mod logging;
pub mod models;
pub mod parser;
pub mod query;
pub mod store;
pub mod tracker;

pub use models::*;
pub use tracker::NukeTracker;
