use std::collections::BTreeSet;

use serde::Serialize;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Missing,
    NeedsReview,
}

impl IssueKind {
    pub fn label(self) -> &'static str {
        match self {
            IssueKind::Missing => "Missing translations",
            IssueKind::NeedsReview => "Needs review",
        }
    }
}

/// A changed key that fails coverage for at least one required locale.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Issue {
    pub file_path: String,
    pub key: String,
    pub locales: BTreeSet<String>,
    pub kind: IssueKind,
}

impl Issue {
    pub fn new(
        file_path: impl Into<String>,
        key: impl Into<String>,
        locales: BTreeSet<String>,
        kind: IssueKind,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            key: key.into(),
            locales,
            kind,
        }
    }

    pub fn sort_key(&self) -> (&str, &str, IssueKind) {
        (self.file_path.as_str(), self.key.as_str(), self.kind)
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionKind {
    /// A new localized key that no string file contains.
    NotExtracted,
    /// A key whose source value changed while its string file did not.
    NotUpdated,
}

impl ExtractionKind {
    pub fn header(self) -> &'static str {
        match self {
            ExtractionKind::NotExtracted => "❌ New strings missing from string files:",
            ExtractionKind::NotUpdated => "❌ Modified strings not updated in string files:",
        }
    }
}

/// A localized key in a changed source file that is missing from, or
/// stale in, the string files.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExtractionIssue {
    pub kind: ExtractionKind,
    pub source_path: String,
    pub key: String,
}

impl ExtractionIssue {
    pub fn new(source_path: impl Into<String>, key: impl Into<String>, kind: ExtractionKind) -> Self {
        Self {
            kind,
            source_path: source_path.into(),
            key: key.into(),
        }
    }
}
