use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{Result, StateStoreError};
use crate::report::{self, ReportStats};
use crate::types::FileRecord;

/// Processing state for one run, backed by the Markdown report.
///
/// The report is the only thing that survives between runs. `open` rebuilds
/// the records from it, and every `upsert` rewrites it in full, so an
/// interrupted run resumes right after the last completed upsert.
#[derive(Debug)]
pub struct StateStore {
    config: StoreConfig,
    report_path: PathBuf,
    records: HashMap<PathBuf, FileRecord>,
    recovered: usize,
}

impl StateStore {
    /// Load prior state for `config.root`.
    ///
    /// A missing report means a fresh run. A report that exists but cannot be
    /// read is fatal; nothing is recovered partially.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let report_path = config.report_path();

        let records = match fs::read_to_string(&report_path) {
            Ok(text) => {
                let decoded = report::parse_report(&text, config);
                if decoded.skipped_entries > 0 {
                    debug!(
                        skipped = decoded.skipped_entries,
                        "Ignored malformed entries in {}",
                        report_path.display()
                    );
                }
                info!(
                    "Found existing report with {} processed files",
                    decoded.records.len()
                );
                decoded.records
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("No report at {}, starting fresh", report_path.display());
                HashMap::new()
            }
            Err(source) => {
                return Err(StateStoreError::Load {
                    path: report_path,
                    source,
                })
            }
        };

        Ok(Self {
            config: config.clone(),
            report_path,
            recovered: records.len(),
            records,
        })
    }

    /// Whether `path` was recovered from the report or upserted in this run.
    pub fn is_known(&self, path: &Path) -> bool {
        self.records.contains_key(path)
    }

    /// Insert or replace `record`, then rewrite the report.
    ///
    /// Records with no place in the report (excluded, or unlabeled and not
    /// reserved) are never kept. If writing the report fails the error is
    /// returned, but the record stays in memory and goes out with the next
    /// successful write.
    pub fn upsert(&mut self, record: FileRecord) -> Result<()> {
        if !record.is_reportable() {
            if self.records.remove(&record.path).is_none() {
                debug!(
                    status = %record.status,
                    "Not recording {}",
                    record.path.display()
                );
                return Ok(());
            }
            debug!("Dropped {} from state", record.path.display());
        } else {
            self.records.insert(record.path.clone(), record);
        }

        self.persist()
    }

    /// Render and atomically write the full report.
    pub fn persist(&self) -> Result<()> {
        let text = self.render(Local::now().naive_local());
        report::write_report_atomic(&self.report_path, &text)?;
        debug!(
            records = self.records.len(),
            "Wrote report {}",
            self.report_path.display()
        );
        Ok(())
    }

    /// Report text for the current records.
    pub fn render(&self, generated_at: NaiveDateTime) -> String {
        report::render_report(self.records.values(), &self.config, generated_at)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            records: &self.records,
        }
    }

    pub fn root(&self) -> &Path {
        self.config.root()
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Number of records decoded from the report at `open`.
    pub fn recovered_count(&self) -> usize {
        self.recovered
    }
}

/// Read-only view of the records, for summaries.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    records: &'a HashMap<PathBuf, FileRecord>,
}

impl<'a> Snapshot<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.records.contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<&'a FileRecord> {
        self.records.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a FileRecord> + 'a {
        self.records.values()
    }

    pub fn stats(&self) -> ReportStats {
        ReportStats::from_records(self.records.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Label, StatusTag};
    use tempfile::TempDir;

    fn good() -> Label {
        Label::new("Good enough").unwrap()
    }

    #[test]
    fn test_open_without_report() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::open(&StoreConfig::new(temp.path())).unwrap();

        assert_eq!(store.report_path(), temp.path().join("vault-quality-report.md"));
        assert_eq!(store.recovered_count(), 0);
        assert!(store.snapshot().is_empty());
        assert!(!store.report_path().exists());
    }

    #[test]
    fn test_upsert_marks_known_and_writes_report() {
        let temp = TempDir::new().unwrap();
        let mut store = StateStore::open(&StoreConfig::new(temp.path())).unwrap();
        let path = temp.path().join("test.md");

        assert!(!store.is_known(&path));
        store.upsert(FileRecord::classified(&path, good())).unwrap();

        assert!(store.is_known(&path));
        let text = fs::read_to_string(store.report_path()).unwrap();
        assert!(text.contains("## Good enough Files\n\n- [[test]]\n"));
    }

    #[test]
    fn test_upsert_replaces_existing_entry() {
        let temp = TempDir::new().unwrap();
        let mut store = StateStore::open(&StoreConfig::new(temp.path())).unwrap();
        let path = temp.path().join("note.md");

        store.upsert(FileRecord::classified(&path, good())).unwrap();
        store
            .upsert(FileRecord::classified(&path, Label::new("Needs work").unwrap()))
            .unwrap();

        assert_eq!(store.snapshot().len(), 1);
        let text = fs::read_to_string(store.report_path()).unwrap();
        assert!(!text.contains("Good enough"));
        assert!(text.contains("## Needs work Files\n\n- [[note]]\n"));
    }

    #[test]
    fn test_open_recovers_existing_report() {
        let temp = TempDir::new().unwrap();
        let report = format!(
            "# Vault Quality Report\n\nGenerated on: 2023-01-01 12:00:00\n\nTarget folder: `{}`\n\n\
             ## Statistics\n\n- Total: 3\n\n## Empty Files\n\n- [[empty-file]]\n\n\
             ## Files with Frontmatter Only\n\n- [[frontmatter-only]]\n\n\
             ## Good enough Files\n\n- [[good-file]]\n",
            temp.path().display()
        );
        fs::write(temp.path().join("vault-quality-report.md"), report).unwrap();

        let store = StateStore::open(&StoreConfig::new(temp.path())).unwrap();

        assert_eq!(store.recovered_count(), 3);
        assert!(store.is_known(&temp.path().join("empty-file.md")));
        assert!(store.is_known(&temp.path().join("frontmatter-only.md")));
        assert!(store.is_known(&temp.path().join("good-file.md")));

        let snapshot = store.snapshot();
        let good_file = snapshot.get(&temp.path().join("good-file.md")).unwrap();
        assert_eq!(good_file.label, Some(good()));
        assert_eq!(good_file.status, StatusTag::NeedsClassification);
    }

    #[test]
    fn test_unreadable_report_is_fatal() {
        let temp = TempDir::new().unwrap();
        // A directory where the report should be cannot be read as text.
        fs::create_dir(temp.path().join("vault-quality-report.md")).unwrap();

        let err = StateStore::open(&StoreConfig::new(temp.path())).unwrap_err();
        assert!(matches!(err, StateStoreError::Load { .. }));
    }

    #[test]
    fn test_invalid_utf8_report_is_fatal() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("vault-quality-report.md"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let err = StateStore::open(&StoreConfig::new(temp.path())).unwrap_err();
        assert!(matches!(err, StateStoreError::Load { .. }));
    }

    #[test]
    fn test_excluded_record_is_not_kept() {
        let temp = TempDir::new().unwrap();
        let mut store = StateStore::open(&StoreConfig::new(temp.path())).unwrap();
        let path = temp.path().join("secret.md");

        store.upsert(FileRecord::excluded(&path)).unwrap();
        store
            .upsert(FileRecord::new(temp.path().join("pending.md"), StatusTag::NeedsClassification, None))
            .unwrap();

        assert!(!store.is_known(&path));
        assert!(store.snapshot().is_empty());
        // Nothing reportable happened, so nothing was written.
        assert!(!store.report_path().exists());
    }

    #[test]
    fn test_excluding_known_file_removes_it() {
        let temp = TempDir::new().unwrap();
        let mut store = StateStore::open(&StoreConfig::new(temp.path())).unwrap();
        let path = temp.path().join("later-excluded.md");

        store.upsert(FileRecord::classified(&path, good())).unwrap();
        store.upsert(FileRecord::excluded(&path)).unwrap();

        assert!(!store.is_known(&path));
        let text = fs::read_to_string(store.report_path()).unwrap();
        assert!(!text.contains("later-excluded"));
    }

    #[test]
    fn test_persist_failure_keeps_record_in_memory() {
        let temp = TempDir::new().unwrap();
        let mut store = StateStore::open(&StoreConfig::new(temp.path())).unwrap();

        // Block the rename target after open succeeded.
        let report_path = store.report_path().to_path_buf();
        fs::create_dir(&report_path).unwrap();
        fs::write(report_path.join("blocker"), "x").unwrap();

        let path = temp.path().join("a.md");
        let err = store.upsert(FileRecord::empty(&path)).unwrap_err();
        assert!(matches!(err, StateStoreError::Persist { .. }));
        assert!(store.is_known(&path));

        // Once the target is writable again the next upsert carries both records.
        fs::remove_dir_all(&report_path).unwrap();
        store
            .upsert(FileRecord::classified(temp.path().join("b.md"), good()))
            .unwrap();
        let text = fs::read_to_string(&report_path).unwrap();
        assert!(text.contains("- [[a]]"));
        assert!(text.contains("- [[b]]"));
    }

    #[test]
    fn test_snapshot_stats() {
        let temp = TempDir::new().unwrap();
        let mut store = StateStore::open(&StoreConfig::new(temp.path())).unwrap();
        store.upsert(FileRecord::empty(temp.path().join("a.md"))).unwrap();
        store
            .upsert(FileRecord::frontmatter_only(temp.path().join("b.md")))
            .unwrap();
        store
            .upsert(FileRecord::classified(temp.path().join("c.md"), good()))
            .unwrap();

        let stats = store.snapshot().stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.empty, 1);
        assert_eq!(stats.frontmatter_only, 1);
        assert_eq!(stats.by_label.get(&good()), Some(&1));
    }
}
