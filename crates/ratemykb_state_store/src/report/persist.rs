use crate::error::{Result, StateStoreError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A fully written report waiting to be renamed over its target.
///
/// Dropping a staged report without calling [`commit`](Self::commit) removes
/// the temporary file and leaves the target exactly as it was.
#[derive(Debug)]
pub struct StagedReport {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedReport {
    /// Write `contents` to a hidden sibling of `target` and sync it to disk.
    pub fn stage(target: &Path, contents: &str) -> Result<Self> {
        let persist_err = |source| StateStoreError::Persist {
            path: target.to_path_buf(),
            source,
        };

        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());

        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{}.", file_name))
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(persist_err)?;

        temp.write_all(contents.as_bytes()).map_err(persist_err)?;
        temp.as_file().sync_all().map_err(persist_err)?;

        // NamedTempFile is created 0600; the report should read like any other note.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o644))
                .map_err(persist_err)?;
        }

        Ok(Self {
            temp,
            target: target.to_path_buf(),
        })
    }

    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Atomically replace the target with the staged contents.
    pub fn commit(self) -> Result<()> {
        let target = self.target;
        self.temp
            .persist(&target)
            .map(|_| ())
            .map_err(|err| StateStoreError::Persist {
                path: target,
                source: err.error,
            })
    }
}

/// Write `contents` to `target` so readers only ever see the old or the new
/// file, never a partial one.
pub fn write_report_atomic(target: &Path, contents: &str) -> Result<()> {
    StagedReport::stage(target, contents)?.commit()
}
