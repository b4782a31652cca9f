//! Error types for the state store

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// State store error type
#[derive(Error, Debug)]
pub enum StateStoreError {
    /// The report exists but could not be read. Fatal for `StateStore::open`.
    #[error("failed to load existing report {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the temporary report or renaming it over the target failed.
    /// The previously persisted report is left untouched.
    #[error("failed to persist report {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StateStoreError>;
