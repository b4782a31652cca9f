//! The processing loop
//!
//! Walks the discovered notes in order, skips what the state store already
//! knows, settles structural cases without the classifier, and upserts each
//! new record so the report on disk is current after every note.

use crate::ai::Classifier;
use crate::scout::{read_content, DiscoveredFile};
use ratemykb_state_store::{FileRecord, Label, StateStore, StatusTag};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// What happened to one note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AlreadyProcessed,
    Excluded,
    /// Settled by the pre-check; carries the canonical label
    Structural(StatusTag),
    Classified(Label),
    /// Not recorded; the note is retried on the next run
    Failed(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyProcessed => f.write_str("Skipping (already processed)"),
            Self::Excluded => f.write_str("Skipping (Excluded)"),
            Self::Structural(status) => write!(f, "Skipping classification ({})", status),
            Self::Classified(label) => write!(f, "Classified as {}", label),
            Self::Failed(reason) => write!(f, "Failed ({})", reason),
        }
    }
}

/// One progress step, reported after the note was handled
#[derive(Debug, Clone)]
pub struct Progress<'a> {
    /// 1-based position in the scan
    pub position: usize,
    pub total: usize,
    pub path: &'a Path,
    pub action: Action,
}

impl Progress<'_> {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.position as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for Progress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{} - {:.1}%] {} {}",
            self.position,
            self.total,
            self.percent(),
            self.action,
            self.path.display()
        )
    }
}

/// Counts for the final summary line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Notes found by the scanner, excluded ones included
    pub discovered: usize,
    /// Notes recorded during this run
    pub newly_processed: usize,
    /// Notes skipped because the report already listed them
    pub already_processed: usize,
    pub excluded: usize,
    /// Notes that could not be read or classified
    pub failed: usize,
    /// Upserts whose report write failed; they stay in memory
    pub persist_failures: usize,
    /// Records in the state store after the run
    pub total_known: usize,
}

/// Process `files` in order against `store`.
///
/// Per-note problems are logged and counted, never returned: one bad note
/// must not stop the rest of the vault.
pub fn process_files<C, F>(
    store: &mut StateStore,
    files: &[DiscoveredFile],
    classifier: &C,
    mut on_progress: F,
) -> RunSummary
where
    C: Classifier + ?Sized,
    F: FnMut(&Progress<'_>),
{
    let total = files.len();
    let mut summary = RunSummary {
        discovered: total,
        ..RunSummary::default()
    };

    for (index, file) in files.iter().enumerate() {
        let action = process_one(store, file, classifier, &mut summary);
        on_progress(&Progress {
            position: index + 1,
            total,
            path: &file.path,
            action,
        });
    }

    summary.total_known = store.snapshot().len();
    summary
}

fn process_one<C>(
    store: &mut StateStore,
    file: &DiscoveredFile,
    classifier: &C,
    summary: &mut RunSummary,
) -> Action
where
    C: Classifier + ?Sized,
{
    let path = &file.path;

    let (record, action) = match file.status {
        StatusTag::Excluded => return drop_excluded(store, path, summary),
        _ if store.is_known(path) => {
            summary.already_processed += 1;
            return Action::AlreadyProcessed;
        }
        StatusTag::Empty => (FileRecord::empty(path), Action::Structural(StatusTag::Empty)),
        StatusTag::FrontmatterOnly => (
            FileRecord::frontmatter_only(path),
            Action::Structural(StatusTag::FrontmatterOnly),
        ),
        StatusTag::NeedsClassification => match classify(path, classifier) {
            Ok(label) => (
                FileRecord::classified(path, label.clone()),
                Action::Classified(label),
            ),
            Err(reason) => {
                summary.failed += 1;
                return Action::Failed(reason);
            }
        },
    };

    if let Err(err) = store.upsert(record) {
        warn!("Could not update report for {}: {}", path.display(), err);
        summary.persist_failures += 1;
    }
    summary.newly_processed += 1;
    action
}

/// Exclusion wins over an earlier rating: a known note is dropped from the
/// state and the report rewritten.
fn drop_excluded(store: &mut StateStore, path: &Path, summary: &mut RunSummary) -> Action {
    summary.excluded += 1;
    if store.is_known(path) {
        if let Err(err) = store.upsert(FileRecord::excluded(path)) {
            warn!("Could not update report for {}: {}", path.display(), err);
            summary.persist_failures += 1;
        }
    }
    Action::Excluded
}

fn classify<C>(path: &Path, classifier: &C) -> Result<Label, String>
where
    C: Classifier + ?Sized,
{
    let content = read_content(path).map_err(|err| {
        warn!("Could not read file {}: {}", path.display(), err);
        format!("unreadable: {}", err)
    })?;

    debug!(classifier = classifier.name(), "Classifying {}", path.display());
    classifier.classify(&content).map_err(|err| {
        warn!("Could not classify file {}: {}", path.display(), err);
        err.to_string()
    })
}
