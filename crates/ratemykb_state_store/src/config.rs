//! Configuration for the state store

use std::path::{Path, PathBuf};

/// Default report file name, written directly under the scanned root.
pub const DEFAULT_REPORT_FILE_NAME: &str = "vault-quality-report.md";

/// Default document extension, including the leading dot.
pub const DEFAULT_FILE_EXTENSION: &str = ".md";

/// Everything the state store needs to locate and interpret its report.
///
/// Built once by the caller and passed by reference into
/// [`StateStore::open`](crate::StateStore::open).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// The scanned directory. Relative link targets resolve against it.
    pub root: PathBuf,
    /// File name of the persisted report inside `root`.
    pub report_file_name: String,
    /// Document extension appended to link targets on decode (e.g. `.md`).
    pub file_extension: String,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            report_file_name: DEFAULT_REPORT_FILE_NAME.to_string(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
        }
    }

    pub fn with_report_file_name(mut self, name: impl Into<String>) -> Self {
        self.report_file_name = name.into();
        self
    }

    /// Accepts the extension with or without its leading dot.
    pub fn with_file_extension(mut self, ext: impl AsRef<str>) -> Self {
        self.file_extension = normalize_extension(ext.as_ref());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join(&self.report_file_name)
    }
}

/// `md` and `.md` both become `.md`; blank stays blank.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}
