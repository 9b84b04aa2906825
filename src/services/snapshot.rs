use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::model::snapshot::{Revision, Snapshot};

/// Empty bytes for a path that does not exist at that revision.
pub trait SnapshotProvider {
    fn content(&self, path: &Path, revision: Revision) -> Vec<u8>;
}

#[derive(Debug, Default, Clone)]
pub struct MemorySnapshots {
    files: HashMap<(Revision, PathBuf), Vec<u8>>,
}

impl MemorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, snapshot: Snapshot) {
        self.files
            .insert((snapshot.revision, snapshot.path), snapshot.content);
    }

    pub fn with(mut self, path: impl Into<PathBuf>, revision: Revision, content: impl Into<Vec<u8>>) -> Self {
        self.insert(Snapshot::new(path, revision, content));
        self
    }

    /// Paths that have content at `revision`, sorted.
    pub fn paths(&self, revision: Revision) -> Vec<&Path> {
        let mut out: Vec<&Path> = self
            .files
            .keys()
            .filter(|(r, _)| *r == revision)
            .map(|(_, p)| p.as_path())
            .collect();
        out.sort();
        out
    }
}

impl FromIterator<Snapshot> for MemorySnapshots {
    fn from_iter<I: IntoIterator<Item = Snapshot>>(iter: I) -> Self {
        let mut m = MemorySnapshots::new();
        for s in iter {
            m.insert(s);
        }
        m
    }
}

impl SnapshotProvider for MemorySnapshots {
    fn content(&self, path: &Path, revision: Revision) -> Vec<u8> {
        self.files
            .get(&(revision, path.to_path_buf()))
            .cloned()
            .unwrap_or_default()
    }
}

/// Per-run memo table in front of a provider.
pub struct SnapshotCache<'a> {
    provider: &'a dyn SnapshotProvider,
    entries: HashMap<(Revision, PathBuf), Vec<u8>>,
    misses: usize,
}

impl<'a> SnapshotCache<'a> {
    pub fn new(provider: &'a dyn SnapshotProvider) -> Self {
        Self {
            provider,
            entries: HashMap::new(),
            misses: 0,
        }
    }

    pub fn get(&mut self, path: &Path, revision: Revision) -> &[u8] {
        let provider = self.provider;
        let misses = &mut self.misses;
        self.entries
            .entry((revision, path.to_path_buf()))
            .or_insert_with(|| {
                *misses += 1;
                provider.content(path, revision)
            })
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
