#![forbid(unsafe_code)]

//! Harness errors and the process exit codes they map to.

use std::path::PathBuf;

use ftui_tour::LoadError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("{count} step(s) do not resolve against the fixture tree")]
    Unresolved { count: usize },

    #[error("tour did not finish within {limit_secs}s")]
    Truncated { limit_secs: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Load { .. } | Self::Io(_) => 2,
            Self::Unresolved { .. } | Self::Truncated { .. } => 1,
        }
    }
}
