//! Report-backed processing state for ratemykb.
//!
//! A run over a vault keeps exactly one piece of durable state: the Markdown
//! quality report it writes into the vault root. This crate reads that report
//! back on startup, answers "was this file already handled?", and rewrites the
//! report after every newly handled file.
//!
//! ```text
//!            open                         upsert
//!   report ───────► parse_report ──► StateStore ──► render_report ──► write_report_atomic ──► report
//!                                      │  ▲
//!                              is_known │  │ FileRecord
//!                                      ▼  │
//!                                  driving loop
//! ```
//!
//! Everything is synchronous and single-threaded. Because the report is
//! replaced with a rename, an interrupted run always leaves either the
//! previous report or the new one on disk.

pub mod config;
pub mod error;
pub mod report;
pub mod state_store;
pub mod types;

pub use config::StoreConfig;
pub use error::{Result, StateStoreError};
pub use report::{parse_report, render_report, write_report_atomic, DecodedReport, ReportStats};
pub use state_store::{Snapshot, StateStore};
pub use types::{FileRecord, Label, LabelError, StatusTag};
