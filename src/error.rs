use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions of a publish run
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("cannot read source binary {path:?}: {source}")]
    SourceUnreadable { path: PathBuf, source: io::Error },

    #[error("cannot read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },

    /// A stored release artifact is not a valid gzip stream.
    #[error("corrupt release artifact {path:?}: {source}")]
    CorruptArtifact { path: PathBuf, source: io::Error },

    #[error("diff {old_version} -> {new_version} ({platform}) failed: {source}")]
    DiffFailed {
        old_version: String,
        new_version: String,
        platform: String,
        source: io::Error,
    },

    #[error("manifest {path:?}: {source}")]
    Manifest {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid {kind} identifier {value:?}")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("{0}")]
    InvalidInput(String),
}

impl PublishError {
    /// True when the failure points at an artifact already in the repository
    /// rather than at the release being published.
    pub fn is_corrupt_history(&self) -> bool {
        matches!(self, PublishError::CorruptArtifact { .. })
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;
