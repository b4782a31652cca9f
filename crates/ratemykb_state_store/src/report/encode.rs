use super::{
    path_to_link, EMPTY_SECTION, ENTRY_PREFIX, FRONTMATTER_SECTION, LABEL_SECTION_SUFFIX,
    REPORT_TITLE, SECTION_PREFIX, STATISTICS_SECTION, TIMESTAMP_FORMAT,
};
use crate::config::StoreConfig;
use crate::types::{FileRecord, Label, StatusTag};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Counts shown in the statistics block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    /// Every record that appears in some section
    pub total: usize,
    pub empty: usize,
    pub frontmatter_only: usize,
    pub by_label: BTreeMap<Label, usize>,
}

/// Records grouped the way the report lays them out.
struct Partition<'a> {
    empty: Vec<&'a FileRecord>,
    frontmatter_only: Vec<&'a FileRecord>,
    by_label: BTreeMap<&'a Label, Vec<&'a FileRecord>>,
}

impl<'a> Partition<'a> {
    fn build(records: impl IntoIterator<Item = &'a FileRecord>) -> Self {
        let mut partition = Partition {
            empty: Vec::new(),
            frontmatter_only: Vec::new(),
            by_label: BTreeMap::new(),
        };

        for record in records {
            match (record.status, record.label.as_ref()) {
                (StatusTag::Empty, _) => partition.empty.push(record),
                (StatusTag::FrontmatterOnly, _) => partition.frontmatter_only.push(record),
                (StatusTag::Excluded, _) | (_, None) => {}
                // One "Empty Files" section, whoever assigned the label.
                (_, Some(label)) if label.as_str() == Label::EMPTY => {
                    partition.empty.push(record)
                }
                (_, Some(label)) => partition.by_label.entry(label).or_default().push(record),
            }
        }

        sort_by_path(&mut partition.empty);
        sort_by_path(&mut partition.frontmatter_only);
        for group in partition.by_label.values_mut() {
            sort_by_path(group);
        }
        partition
    }

    fn stats(&self) -> ReportStats {
        let by_label: BTreeMap<Label, usize> = self
            .by_label
            .iter()
            .map(|(label, group)| ((*label).clone(), group.len()))
            .collect();
        ReportStats {
            total: self.empty.len()
                + self.frontmatter_only.len()
                + by_label.values().sum::<usize>(),
            empty: self.empty.len(),
            frontmatter_only: self.frontmatter_only.len(),
            by_label,
        }
    }
}

fn sort_by_path(records: &mut [&FileRecord]) {
    records.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));
}

impl ReportStats {
    /// Statistics for exactly the records [`render_report`] would show.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FileRecord>) -> Self {
        Partition::build(records).stats()
    }
}

/// Render the complete report text.
///
/// Output depends only on the set of records, the config and `generated_at`;
/// iteration order of `records` never shows up in the result.
pub fn render_report<'a>(
    records: impl IntoIterator<Item = &'a FileRecord>,
    config: &StoreConfig,
    generated_at: NaiveDateTime,
) -> String {
    let partition = Partition::build(records);
    let stats = partition.stats();
    let root = config.root();
    let mut out = String::new();

    out.push_str(REPORT_TITLE);
    out.push_str("\n\n");
    out.push_str(&format!("Generated on: {}\n\n", generated_at.format(TIMESTAMP_FORMAT)));
    out.push_str(&format!("Target folder: `{}`\n\n", root.display()));

    out.push_str(&format!("{}{}\n\n", SECTION_PREFIX, STATISTICS_SECTION));
    out.push_str(&format!("{}Total: {}\n", ENTRY_PREFIX, stats.total));
    out.push_str(&format!("{}Empty: {}\n", ENTRY_PREFIX, stats.empty));
    out.push_str(&format!("{}Frontmatter-only: {}\n", ENTRY_PREFIX, stats.frontmatter_only));
    for (label, count) in &stats.by_label {
        out.push_str(&format!("{}{}: {}\n", ENTRY_PREFIX, label, count));
    }
    out.push('\n');

    render_section(
        &mut out,
        EMPTY_SECTION,
        "No empty files found.",
        &partition.empty,
        root,
    );
    render_section(
        &mut out,
        FRONTMATTER_SECTION,
        "No files with frontmatter only found.",
        &partition.frontmatter_only,
        root,
    );
    for (label, group) in &partition.by_label {
        let heading = format!("{}{}", label, LABEL_SECTION_SUFFIX);
        let placeholder = format!("No {} files found.", label.as_str().to_lowercase());
        render_section(&mut out, &heading, &placeholder, group, root);
    }

    out
}

fn render_section(
    out: &mut String,
    heading: &str,
    placeholder: &str,
    entries: &[&FileRecord],
    root: &Path,
) {
    out.push_str(&format!("{}{}\n\n", SECTION_PREFIX, heading));
    if entries.is_empty() {
        out.push_str(placeholder);
        out.push_str("\n\n");
        return;
    }
    for record in entries {
        out.push_str(&format!("{}[[{}]]\n", ENTRY_PREFIX, path_to_link(root, &record.path)));
    }
    out.push('\n');
}
