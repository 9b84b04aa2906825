use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the surrounding shell: git, the working tree, configuration.
///
/// Resource parsing and coverage checks never produce these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to run git {args}: {source}")]
    GitSpawn {
        args: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {args} exited with {status}: {stderr}")]
    Git {
        args: String,
        status: String,
        stderr: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown platform `{0}` (expected iOS or macOS)")]
    UnknownPlatform(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
