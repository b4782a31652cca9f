//! Report codec
//!
//! The persisted report doubles as the durable state of a run. This module
//! turns the in-memory records into Markdown ([`render_report`]), parses a
//! previously written report back into records ([`parse_report`]), and
//! replaces the file on disk without ever exposing a partial write
//! ([`write_report_atomic`]).
//!
//! # Layout
//!
//! ```text
//! # Vault Quality Report
//!
//! Generated on: 2024-01-01 12:00:00
//!
//! Target folder: `/vault`
//!
//! ## Statistics
//!
//! - Total: 3
//! - Empty: 1
//! - Frontmatter-only: 1
//! - Good enough: 1
//!
//! ## Empty Files
//!
//! - [[a]]
//!
//! ## Files with Frontmatter Only
//!
//! - [[b]]
//!
//! ## Good enough Files
//!
//! - [[notes/c]]
//! ```

mod decode;
mod encode;
mod persist;

pub use decode::{parse_report, DecodedReport};
pub use encode::{render_report, ReportStats};
pub use persist::{write_report_atomic, StagedReport};

use crate::config::StoreConfig;
use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};

pub const REPORT_TITLE: &str = "# Vault Quality Report";
pub const SECTION_PREFIX: &str = "## ";
pub const ENTRY_PREFIX: &str = "- ";
pub const STATISTICS_SECTION: &str = "Statistics";
pub const EMPTY_SECTION: &str = "Empty Files";
pub const FRONTMATTER_SECTION: &str = "Files with Frontmatter Only";
/// Dynamic sections are titled `<Label> Files`.
pub const LABEL_SECTION_SUFFIX: &str = " Files";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render `path` as the target of a `[[link]]`.
///
/// The path is made relative to `root` (the bare file name when that is not
/// possible), its extension is dropped, and components are joined with `/`.
pub fn path_to_link(root: &Path, path: &Path) -> String {
    let relative = match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf()),
    };

    relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Inverse of [`path_to_link`] for paths that live under the root.
pub fn link_to_path(config: &StoreConfig, link: &str) -> PathBuf {
    let native = link.replace('/', MAIN_SEPARATOR_STR);
    config
        .root
        .join(format!("{}{}", native, config.file_extension))
}
