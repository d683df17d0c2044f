//! Classified driver errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a batch before or while it is set up
#[derive(Error, Debug)]
pub enum DriverError {
    /// Input root is absent
    #[error("input directory '{}' does not exist", .0.display())]
    MissingInputRoot(PathBuf),

    /// Input root exists but is a file or something else
    #[error("input path '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to create output directory '{}': {source}", path.display())]
    CreateOutputRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list team directories in '{}': {reason}", path.display())]
    Scan { path: PathBuf, reason: String },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl DriverError {
    /// True for errors caused by a bad input root argument
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingInputRoot(_) | Self::NotADirectory(_))
    }
}
