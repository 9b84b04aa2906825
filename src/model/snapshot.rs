use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Revision {
    /// Starting point of the change (merge base / target branch).
    Base,
    /// Working tree tip.
    Current,
}

/// Bytes of one file at one revision. Empty content means "no such file".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub path: PathBuf,
    pub revision: Revision,
    pub content: Vec<u8>,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>, revision: Revision, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            revision,
            content: content.into(),
        }
    }
}
