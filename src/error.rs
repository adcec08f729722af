use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("watch list storage error: {0}")]
    Storage(String),

    #[error("'{0}' file is already added.")]
    Duplicate(String),

    #[error("failed to access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} failed: {message}")]
    VersionControl { command: String, message: String },

    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no PSD file has been added to the watch list yet")]
    NoWatchList,

    #[error("fatal: {0}")]
    Validation(String),
}

impl WatcherError {
    /// Errors that only affect one file during a watch session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WatcherError::FileAccess { .. } | WatcherError::VersionControl { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, WatcherError>;
