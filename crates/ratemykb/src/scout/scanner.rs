//! Vault walker
//!
//! Finds every note under the root, skipping excluded directories and the
//! tool's own files, and tags each one with the result of the structural
//! pre-check.

use super::error::Result;
use super::exclusion::ExclusionList;
use super::precheck::check_content;
use crate::config::ScanSettings;
use ratemykb_state_store::config::normalize_extension;
use ratemykb_state_store::StatusTag;
use serde::Serialize;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// A note found by the scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub status: StatusTag,
}

/// Directory exclusion rule
#[derive(Debug, Clone, PartialEq, Eq)]
enum DirRule {
    /// Matches a directory with this name at any depth
    Name(String),
    /// Matches this path relative to the root, and everything below it
    RootRelative(PathBuf),
}

impl DirRule {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.strip_prefix('/') {
            Some(rel) => {
                let rel = rel.trim_matches('/');
                (!rel.is_empty()).then(|| Self::RootRelative(PathBuf::from(rel)))
            }
            None => (!raw.is_empty()).then(|| Self::Name(raw.to_string())),
        }
    }

    fn matches(&self, name: &OsStr, relative: &Path) -> bool {
        match self {
            Self::Name(dir) => name == OsStr::new(dir),
            Self::RootRelative(prefix) => relative.starts_with(prefix),
        }
    }
}

/// Walks a vault and pre-checks the notes in it
#[derive(Debug, Clone)]
pub struct Scanner {
    /// Extension without the leading dot; empty matches extension-less files
    extension: String,
    dir_rules: Vec<DirRule>,
    exclusions: ExclusionList,
    skip_files: Vec<PathBuf>,
}

impl Scanner {
    pub fn new(settings: &ScanSettings, exclusions: ExclusionList) -> Self {
        let extension = normalize_extension(&settings.file_extension)
            .trim_start_matches('.')
            .to_string();
        Self {
            extension,
            dir_rules: settings
                .exclude_directories
                .iter()
                .filter_map(|raw| DirRule::parse(raw))
                .collect(),
            exclusions,
            skip_files: Vec::new(),
        }
    }

    /// Never yield `path`, e.g. the report itself.
    pub fn skip_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip_files.push(path.into());
        self
    }

    /// Walk `root` and return its notes sorted by path.
    ///
    /// Notes named by the exclusion list come back as `Excluded` without
    /// being read. Notes that cannot be read are logged and left out.
    pub fn scan(&self, root: &Path) -> Result<Vec<DiscoveredFile>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded_dir(root, entry));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !self.has_note_extension(entry.path()) {
                continue;
            }

            let path = entry.path();
            if self.skip_files.iter().any(|skip| skip == path) {
                debug!("Skipping {}", path.display());
                continue;
            }

            if self.exclusions.is_excluded(root, path) {
                files.push(DiscoveredFile {
                    path: path.to_path_buf(),
                    status: StatusTag::Excluded,
                });
                continue;
            }

            match read_content(path) {
                Ok(content) => files.push(DiscoveredFile {
                    path: path.to_path_buf(),
                    status: check_content(&content),
                }),
                Err(err) => warn!("Error checking file {}: {}", path.display(), err),
            }
        }

        info!("Found {} files under {}", files.len(), root.display());
        Ok(files)
    }

    fn is_excluded_dir(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() || self.dir_rules.is_empty() {
            return false;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let excluded = self
            .dir_rules
            .iter()
            .any(|rule| rule.matches(entry.file_name(), relative));
        if excluded {
            debug!("Skipping excluded directory {}", entry.path().display());
        }
        excluded
    }

    fn has_note_extension(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => ext == OsStr::new(&self.extension),
            None => self.extension.is_empty(),
        }
    }
}

/// Full text of a note. Invalid UTF-8 is replaced rather than rejected.
pub fn read_content(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
