//! Structural checks that settle a note without asking the classifier

use ratemykb_state_store::StatusTag;

const FRONTMATTER_FENCE: &str = "---";

/// Decide whether `content` needs a real classification.
///
/// Leading and trailing whitespace is ignored. Whitespace-only content is
/// `Empty`. A note whose first line is `---`, with a later `---` line and
/// nothing but blank lines after it, is `FrontmatterOnly`.
pub fn check_content(content: &str) -> StatusTag {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return StatusTag::Empty;
    }
    if is_frontmatter_only(trimmed) {
        return StatusTag::FrontmatterOnly;
    }
    StatusTag::NeedsClassification
}

fn is_frontmatter_only(content: &str) -> bool {
    let mut lines = content.lines();
    if lines.next() != Some(FRONTMATTER_FENCE) {
        return false;
    }
    if !lines.by_ref().any(|line| line == FRONTMATTER_FENCE) {
        return false;
    }
    lines.all(|line| line.trim().is_empty())
}
