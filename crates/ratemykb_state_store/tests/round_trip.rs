//! Encoding a set of records and decoding the text must give back the same
//! paths and labels.

use chrono::NaiveDate;
use proptest::prelude::*;
use ratemykb_state_store::{
    parse_report, render_report, FileRecord, Label, StatusTag, StoreConfig,
};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

fn generated_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap()
}

fn round_trip(records: &[FileRecord], config: &StoreConfig) -> HashMap<PathBuf, FileRecord> {
    let text = render_report(records, config, generated_at());
    let decoded = parse_report(&text, config);
    assert_eq!(decoded.skipped_entries, 0, "rendered report:\n{}", text);
    decoded.records
}

#[test]
fn reserved_and_labeled_records_survive() {
    let config = StoreConfig::new("/vault");
    let records = vec![
        FileRecord::empty("/vault/a.md"),
        FileRecord::frontmatter_only("/vault/b.md"),
        FileRecord::classified("/vault/c.md", Label::new("Good enough").unwrap()),
        FileRecord::classified("/vault/deep/nested/d.md", Label::new("Low effort").unwrap()),
    ];

    let decoded = round_trip(&records, &config);
    assert_eq!(decoded.len(), 4);

    let a = &decoded[&PathBuf::from("/vault/a.md")];
    assert_eq!((a.status, a.label.clone()), (StatusTag::Empty, Some(Label::empty())));

    let b = &decoded[&PathBuf::from("/vault/b.md")];
    assert_eq!(
        (b.status, b.label.clone()),
        (StatusTag::FrontmatterOnly, Some(Label::low_quality()))
    );

    let d = &decoded[&PathBuf::from("/vault")
        .join("deep")
        .join("nested")
        .join("d.md")];
    assert_eq!(d.status, StatusTag::NeedsClassification);
    assert_eq!(d.label.as_ref().map(Label::as_str), Some("Low effort"));
}

#[test]
fn classifier_low_quality_label_keeps_its_own_section() {
    // Same label text as the frontmatter-only canonical label, but a
    // different section, so it comes back as a classified record.
    let config = StoreConfig::new("/vault");
    let records = vec![
        FileRecord::frontmatter_only("/vault/fm.md"),
        FileRecord::classified("/vault/thin.md", Label::low_quality()),
    ];

    let text = render_report(&records, &config, generated_at());
    assert!(text.contains("## Files with Frontmatter Only\n\n- [[fm]]\n"));
    assert!(text.contains("## Low quality Files\n\n- [[thin]]\n"));

    let decoded = parse_report(&text, &config);
    assert_eq!(
        decoded.records[&PathBuf::from("/vault/thin.md")].status,
        StatusTag::NeedsClassification
    );
    assert_eq!(
        decoded.records[&PathBuf::from("/vault/fm.md")].status,
        StatusTag::FrontmatterOnly
    );
}

#[test]
fn custom_extension_round_trips() {
    let config = StoreConfig::new("/notes").with_file_extension("txt");
    let records = vec![FileRecord::classified(
        "/notes/todo.txt",
        Label::new("Good enough").unwrap(),
    )];

    let text = render_report(&records, &config, generated_at());
    assert!(text.contains("- [[todo]]"));
    let decoded = parse_report(&text, &config);
    assert!(decoded.records.contains_key(&PathBuf::from("/notes/todo.txt")));
}

#[test]
fn names_with_edge_whitespace_round_trip() {
    let config = StoreConfig::new("/vault");
    let records = vec![
        FileRecord::classified("/vault/ spaced .md", Label::good_enough()),
        FileRecord::empty("/vault/dir /draft.md"),
    ];

    let decoded = round_trip(&records, &config);
    assert_eq!(decoded.len(), 2);
    assert!(decoded.contains_key(&PathBuf::from("/vault/ spaced .md")));
    assert!(decoded.contains_key(&PathBuf::from("/vault/dir /draft.md")));
}

#[test]
fn classifier_empty_label_joins_reserved_section() {
    let config = StoreConfig::new("/vault");
    let records = vec![
        FileRecord::empty("/vault/a.md"),
        FileRecord::classified("/vault/c.md", Label::empty()),
    ];

    let text = render_report(&records, &config, generated_at());
    assert_eq!(text.matches("## Empty Files").count(), 1);
    assert_eq!(text.matches("- Empty: ").count(), 1);
    assert!(text.contains("- Empty: 2\n"));
    assert!(text.contains("## Empty Files\n\n- [[a]]\n- [[c]]\n"));

    let decoded = parse_report(&text, &config);
    let c = &decoded.records[&PathBuf::from("/vault/c.md")];
    assert_eq!((c.status, c.label.clone()), (StatusTag::Empty, Some(Label::empty())));
}

fn label_strategy() -> impl Strategy<Value = Label> {
    "[A-Za-z][A-Za-z ]{0,12}[A-Za-z]"
        .prop_map(|s| Label::new(s).unwrap())
        // A classifier label of "Empty" is listed under the reserved section
        // and decodes with the Empty status.
        .prop_filter("reserved heading", |l| l.as_str() != Label::EMPTY)
}

fn relative_path_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[ ]?[a-z]{1,8}[ ]?", 1..=3)
}

#[derive(Debug, Clone)]
enum Kind {
    Empty,
    FrontmatterOnly,
    Classified(Label),
}

fn kind_strategy() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::Empty),
        Just(Kind::FrontmatterOnly),
        label_strategy().prop_map(Kind::Classified),
    ]
}

proptest! {
    #[test]
    fn decode_inverts_encode(
        entries in prop::collection::vec((relative_path_strategy(), kind_strategy()), 0..24)
    ) {
        let config = StoreConfig::new("/vault");

        // Later entries win, the same way repeated upserts do.
        let mut expected: BTreeMap<PathBuf, FileRecord> = BTreeMap::new();
        for (segments, kind) in entries {
            let mut path = PathBuf::from("/vault");
            for segment in &segments {
                path.push(segment);
            }
            path.set_extension("md");
            let record = match kind {
                Kind::Empty => FileRecord::empty(&path),
                Kind::FrontmatterOnly => FileRecord::frontmatter_only(&path),
                Kind::Classified(label) => FileRecord::classified(&path, label),
            };
            expected.insert(path, record);
        }

        let records: Vec<FileRecord> = expected.values().cloned().collect();
        let decoded = round_trip(&records, &config);

        prop_assert_eq!(decoded.len(), expected.len());
        for (path, want) in &expected {
            let got = decoded.get(path);
            prop_assert!(got.is_some(), "missing {}", path.display());
            let got = got.unwrap();
            prop_assert_eq!(&got.label, &want.label);
            prop_assert_eq!(got.status, want.status);
        }
    }

    #[test]
    fn render_ignores_insertion_order(
        entries in prop::collection::vec((relative_path_strategy(), label_strategy()), 0..16)
    ) {
        let config = StoreConfig::new("/vault");
        let mut by_path: BTreeMap<PathBuf, FileRecord> = BTreeMap::new();
        for (segments, label) in entries {
            let path = PathBuf::from(format!("/vault/{}.md", segments.join("/")));
            by_path.insert(path.clone(), FileRecord::classified(path, label));
        }

        let mut records: Vec<FileRecord> = by_path.into_values().collect();
        let forward = render_report(&records, &config, generated_at());
        records.reverse();
        let backward = render_report(&records, &config, generated_at());
        prop_assert_eq!(forward, backward);
    }
}
