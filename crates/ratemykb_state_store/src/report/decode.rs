use super::{
    link_to_path, EMPTY_SECTION, ENTRY_PREFIX, FRONTMATTER_SECTION, LABEL_SECTION_SUFFIX,
    SECTION_PREFIX, STATISTICS_SECTION,
};
use crate::config::StoreConfig;
use crate::types::{FileRecord, Label, StatusTag};
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::debug;

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").unwrap());

/// Records recovered from a report, plus how much was ignored on the way.
#[derive(Debug, Default)]
pub struct DecodedReport {
    pub records: HashMap<PathBuf, FileRecord>,
    /// Entry lines inside a section that carried no usable link.
    pub skipped_entries: usize,
}

/// Map a section heading to the status and label its entries get.
///
/// The statistics block maps to `None`, so its lines are never entries.
/// Other non-reserved headings always come back as `NeedsClassification`: the
/// report only keeps the label, not how the file got it.
fn classify_section(heading: &str) -> Option<(StatusTag, Label)> {
    match heading {
        STATISTICS_SECTION => None,
        EMPTY_SECTION => Some((StatusTag::Empty, Label::empty())),
        FRONTMATTER_SECTION => Some((StatusTag::FrontmatterOnly, Label::low_quality())),
        other => {
            let name = other.strip_suffix(LABEL_SECTION_SUFFIX).unwrap_or(other);
            Label::new(name)
                .ok()
                .map(|label| (StatusTag::NeedsClassification, label))
        }
    }
}

/// Parse a previously written report back into records.
///
/// Never fails: unknown lines, entries without a `[[link]]` and headings
/// without entries are skipped. The cost of a damaged report is that some
/// files get processed again.
pub fn parse_report(text: &str, config: &StoreConfig) -> DecodedReport {
    let mut decoded = DecodedReport::default();
    let mut section: Option<(StatusTag, Label)> = None;

    for line in text.lines() {
        if let Some(heading) = line.strip_prefix(SECTION_PREFIX) {
            section = classify_section(heading.trim());
            continue;
        }

        if !line.starts_with(ENTRY_PREFIX) {
            continue;
        }
        let Some((status, label)) = section.as_ref() else {
            continue;
        };

        let Some(link) = LINK_PATTERN
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|link| !link.trim().is_empty())
        else {
            if line.contains("[[") {
                debug!(line, "Skipping malformed report entry");
                decoded.skipped_entries += 1;
            }
            continue;
        };

        let path = link_to_path(config, link);
        decoded.records.insert(
            path.clone(),
            FileRecord::new(path, *status, Some(label.clone())),
        );
    }

    decoded
}
