use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::model::issue::{Issue, IssueKind};
use crate::model::LocaleSet;

/// Keys longer than this are shortened for display.
pub const MAX_DISPLAY_KEY_LEN: usize = 50;

/// Merge and order issues.
///
/// Issues for the same (file, key, kind) are merged by unioning their
/// locales; issues with no locales are dropped. Output is sorted by file,
/// then key, then kind (missing before needs review).
pub fn aggregate(issues: impl IntoIterator<Item = Issue>) -> Vec<Issue> {
    let mut merged: BTreeMap<(String, String, IssueKind), Issue> = BTreeMap::new();

    for issue in issues {
        if issue.locales.is_empty() {
            continue;
        }

        let slot = (issue.file_path.clone(), issue.key.clone(), issue.kind);
        match merged.get_mut(&slot) {
            Some(existing) => existing.locales.extend(issue.locales),
            None => {
                merged.insert(slot, issue);
            }
        }
    }

    merged.into_values().collect()
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LocaleLabel {
    /// Every required locale is affected.
    All(usize),
    Listed(Vec<String>),
}

impl LocaleLabel {
    pub fn for_locales(locales: &LocaleSet, required: &LocaleSet) -> Self {
        if locales == required {
            LocaleLabel::All(required.len())
        } else {
            LocaleLabel::Listed(locales.iter().cloned().collect())
        }
    }
}

impl fmt::Display for LocaleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocaleLabel::All(n) => write!(f, "All {n} languages"),
            LocaleLabel::Listed(locales) => f.write_str(&locales.join(", ")),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct KeyLine {
    pub key: String,
    pub display_key: String,
    pub kind: IssueKind,
    pub locales: LocaleLabel,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct FileGroup {
    pub file_path: String,
    pub keys: Vec<KeyLine>,
}

/// Group aggregated issues by file for presentation.
pub fn group_by_file(issues: &[Issue], required: &LocaleSet) -> Vec<FileGroup> {
    let mut groups: BTreeMap<&str, Vec<&Issue>> = BTreeMap::new();
    for issue in issues {
        groups.entry(issue.file_path.as_str()).or_default().push(issue);
    }

    groups
        .into_iter()
        .map(|(file_path, mut file_issues)| {
            file_issues.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
            FileGroup {
                file_path: file_path.to_string(),
                keys: file_issues
                    .into_iter()
                    .map(|i| KeyLine {
                        key: i.key.clone(),
                        display_key: display_key(&i.key),
                        kind: i.kind,
                        locales: LocaleLabel::for_locales(&i.locales, required),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Shorten a key for display. Counts characters, not bytes.
pub fn display_key(key: &str) -> String {
    if key.chars().count() <= MAX_DISPLAY_KEY_LEN {
        return key.to_string();
    }

    let head: String = key.chars().take(MAX_DISPLAY_KEY_LEN - 3).collect();
    format!("{head}...")
}
