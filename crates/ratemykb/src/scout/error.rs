//! Error types for the document source

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Scout error type
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read exclusion file {}: {source}", path.display())]
    Exclusion {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ScoutError>;
