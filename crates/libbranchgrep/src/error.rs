use std::{io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

/// Custom Result type for branch search operations.
pub type Result<T> = StdResult<T, SearchError>;

/// Branch-search-specific error types. Every variant is fatal: best-effort
/// git steps never produce one of these, they are recorded in the
/// [`crate::RunReport`] instead.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The repository path could not be resolved to an absolute path.
    #[error("Invalid repository path {path:?}: {source}")]
    InvalidPath {
        /// The path as supplied by the caller.
        path: PathBuf,
        /// The underlying resolution failure.
        source: io::Error,
    },

    /// The resolved path does not contain a `.git` directory.
    #[error("Not a git repository: {0}")]
    NotAGitRepo(PathBuf),

    /// A git command that must succeed failed (current-branch lookup).
    #[error("Git command failed: {0}")]
    GitCommandFailed(String),

    /// The search pattern does not compile.
    #[error("Invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Remote branch enumeration failed and no explicit list was given.
    #[error("Failed to list remote branches: {0}")]
    BranchListFailed(String),

    /// The search tool could not be executed on a branch.
    #[error("Search failed on branch '{branch}': {message}")]
    SearchFailed {
        /// Branch being searched when the failure occurred.
        branch: String,
        /// Human-readable error description.
        message: String,
    },

    /// An underlying I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl SearchError {
    /// Return the recommended process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidPath { .. } | Self::NotAGitRepo(_) => 2,
            Self::InvalidRegex(_) => 3,
            Self::GitCommandFailed(_) | Self::BranchListFailed(_) => 4,
            Self::SearchFailed { .. } => 5,
            Self::IoError(_) => 1,
        }
    }
}
