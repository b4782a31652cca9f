//! Exclusion list read from a Markdown file of `[[links]]`

use super::error::{Result, ScoutError};
use ratemykb_state_store::report::path_to_link;
use regex::Regex;
use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").unwrap());

/// Notes that must never be classified.
///
/// Each `[[link]]` in the exclusion file names a note either by its bare
/// name (`[[journal]]`) or by its path under the root (`[[daily/journal]]`).
#[derive(Debug, Clone, Default)]
pub struct ExclusionList {
    links: HashSet<String>,
}

impl ExclusionList {
    /// Read every link in `path`. A missing file means nothing is excluded.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("No exclusion file at {}", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ScoutError::Exclusion {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let list = Self::parse(&text);
        info!("Loaded {} exclusions from {}", list.len(), path.display());
        Ok(list)
    }

    pub fn parse(text: &str) -> Self {
        let links = LINK_PATTERN
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| normalize_link(m.as_str()))
            .filter(|link| !link.is_empty())
            .collect();
        Self { links }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Whether `path` is named by the list, by file stem or by its
    /// extension-less path relative to `root`.
    pub fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        if self.links.is_empty() {
            return false;
        }
        let stem_matches = path
            .file_stem()
            .map(|stem| self.links.contains(&*stem.to_string_lossy()))
            .unwrap_or(false);
        if stem_matches {
            return true;
        }
        path.starts_with(root) && self.links.contains(&path_to_link(root, path))
    }
}

/// `[[note|alias]]` and `[[note#heading]]` both name `note`; a trailing
/// `.md` is dropped.
fn normalize_link(raw: &str) -> String {
    let target = raw.split(['|', '#']).next().unwrap_or_default().trim();
    target
        .strip_suffix(".md")
        .unwrap_or(target)
        .trim_start_matches('/')
        .to_string()
}
