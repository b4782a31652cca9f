//! Scan, classify and report over a real directory, then run again.

use ratemykb::ai::FixedClassifier;
use ratemykb::config::ScanSettings;
use ratemykb::runner::process_files;
use ratemykb::scout::{ExclusionList, Scanner};
use ratemykb_state_store::{Label, StateStore, StoreConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn build_vault(root: &Path) {
    fs::write(root.join("a.md"), "   \n").unwrap();
    fs::write(root.join("b.md"), "---\ntitle: B\ntags: [x]\n---\n\n").unwrap();
    fs::write(root.join("c.md"), "# C\n\nA note with an actual body.\n").unwrap();
}

fn run_once(root: &Path, classifier: &FixedClassifier) -> ratemykb::runner::RunSummary {
    let config = StoreConfig::new(root);
    let mut store = StateStore::open(&config).unwrap();
    let files = Scanner::new(&ScanSettings::default(), ExclusionList::default())
        .skip_file(store.report_path())
        .scan(root)
        .unwrap();
    process_files(&mut store, &files, classifier, |_| {})
}

fn without_timestamp(report: &str) -> String {
    report
        .lines()
        .filter(|line| !line.starts_with("Generated on:"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn first_run_reports_every_note() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    build_vault(root);

    let classifier = FixedClassifier::new(Label::good_enough());
    let summary = run_once(root, &classifier);

    assert_eq!(summary.newly_processed, 3);
    assert_eq!(classifier.calls(), 1);

    let report = fs::read_to_string(root.join("vault-quality-report.md")).unwrap();
    assert!(report.contains("- Total: 3\n"));
    assert!(report.contains("- Empty: 1\n"));
    assert!(report.contains("- Frontmatter-only: 1\n"));
    assert!(report.contains("- Good enough: 1\n"));
    assert!(report.contains("## Empty Files\n\n- [[a]]\n\n## Files with Frontmatter Only"));
    assert!(report.contains("## Files with Frontmatter Only\n\n- [[b]]\n"));
    assert!(report.contains("## Good enough Files\n\n- [[c]]\n"));
}

#[test]
fn second_run_changes_nothing_but_the_timestamp() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    build_vault(root);

    run_once(root, &FixedClassifier::new(Label::good_enough()));
    let first = fs::read_to_string(root.join("vault-quality-report.md")).unwrap();

    let classifier = FixedClassifier::new(Label::new("Should not be used").unwrap());
    let summary = run_once(root, &classifier);
    let second = fs::read_to_string(root.join("vault-quality-report.md")).unwrap();

    assert_eq!(classifier.calls(), 0);
    assert_eq!(summary.already_processed, 3);
    assert_eq!(summary.newly_processed, 0);
    assert_eq!(without_timestamp(&first), without_timestamp(&second));
}

#[test]
fn new_note_is_added_on_resume() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    build_vault(root);
    run_once(root, &FixedClassifier::new(Label::good_enough()));

    fs::create_dir(root.join("projects")).unwrap();
    fs::write(root.join("projects").join("d.md"), "Draft with real content.").unwrap();

    let classifier = FixedClassifier::new(Label::new("Needs work").unwrap());
    let summary = run_once(root, &classifier);

    assert_eq!(classifier.calls(), 1);
    assert_eq!(summary.newly_processed, 1);
    assert_eq!(summary.total_known, 4);

    let report = fs::read_to_string(root.join("vault-quality-report.md")).unwrap();
    assert!(report.contains("## Good enough Files\n\n- [[c]]\n"));
    assert!(report.contains("## Needs work Files\n\n- [[projects/d]]\n"));
    assert!(report.contains("- Total: 4\n"));
}
