//! Core types shared by the report codec and the state store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Outcome of the cheap structural pre-check performed on a document.
///
/// Assigned once by the scanner and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTag {
    /// Nothing but whitespace
    Empty,
    /// A frontmatter block and nothing after it
    FrontmatterOnly,
    /// Real content; the classifier decides the label
    NeedsClassification,
    /// Listed in the exclusion file; never persisted
    Excluded,
}

impl StatusTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::FrontmatterOnly => "Frontmatter-only",
            Self::NeedsClassification => "Needs-review",
            Self::Excluded => "Excluded",
        }
    }

    /// Reserved statuses get their own always-present report section.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Self::Empty | Self::FrontmatterOnly)
    }
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label would be blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("classification label is empty")]
    Empty,
}

/// Open-ended classification label.
///
/// Labels come from an external judgment process, so the set is not known at
/// compile time. A label is always a single, trimmed, non-empty line with
/// interior whitespace collapsed to single spaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    pub const EMPTY: &'static str = "Empty";
    pub const LOW_QUALITY: &'static str = "Low quality";
    pub const GOOD_ENOUGH: &'static str = "Good enough";

    pub fn new(raw: impl AsRef<str>) -> Result<Self, LabelError> {
        let normalized = raw.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return Err(LabelError::Empty);
        }
        Ok(Self(normalized))
    }

    /// Canonical label for structurally-empty documents.
    pub fn empty() -> Self {
        Self(Self::EMPTY.to_string())
    }

    /// Canonical label for frontmatter-only documents.
    pub fn low_quality() -> Self {
        Self(Self::LOW_QUALITY.to_string())
    }

    pub fn good_enough() -> Self {
        Self(Self::GOOD_ENOUGH.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Label {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Label::new(value)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

/// One entry of the processing state, keyed by `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub status: StatusTag,
    pub label: Option<Label>,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, status: StatusTag, label: Option<Label>) -> Self {
        Self {
            path: path.into(),
            status,
            label,
        }
    }

    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::new(path, StatusTag::Empty, Some(Label::empty()))
    }

    pub fn frontmatter_only(path: impl Into<PathBuf>) -> Self {
        Self::new(path, StatusTag::FrontmatterOnly, Some(Label::low_quality()))
    }

    pub fn classified(path: impl Into<PathBuf>, label: Label) -> Self {
        Self::new(path, StatusTag::NeedsClassification, Some(label))
    }

    pub fn excluded(path: impl Into<PathBuf>) -> Self {
        Self::new(path, StatusTag::Excluded, None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this record has a place in the rendered report.
    ///
    /// Excluded records and unlabeled non-reserved records are dropped.
    pub fn is_reportable(&self) -> bool {
        match self.status {
            StatusTag::Empty | StatusTag::FrontmatterOnly => true,
            StatusTag::Excluded => false,
            StatusTag::NeedsClassification => self.label.is_some(),
        }
    }
}
