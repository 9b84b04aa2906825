use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::model::issue::{ExtractionIssue, ExtractionKind};
use crate::model::snapshot::Revision;
use crate::parsers::ResourceFormat;

use super::encoding;
use super::snapshot::{SnapshotCache, SnapshotProvider};

/// Extension of the source files scanned for localized keys.
pub const SOURCE_EXTENSION: &str = "swift";

fn key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"NSLocalizedString\s*\(\s*"([^"]+)""#).expect("static pattern is valid")
    })
}

pub fn localized_keys(source: &str) -> BTreeSet<String> {
    key_regex()
        .captures_iter(source)
        .map(|c| c[1].to_string())
        .collect()
}

/// The first `value:` argument after the call for `key`. The search is
/// lazy but not bounded by the call's closing paren.
pub fn localized_value(source: &str, key: &str) -> Option<String> {
    let pattern = format!(
        r#"NSLocalizedString\s*\(\s*"{}"[\s\S]*?value:\s*"((?:[^"\\]|\\.)*)""#,
        regex::escape(key)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(source).map(|c| c[1].to_string())
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SourceChanges {
    pub new: BTreeSet<String>,
    pub modified: BTreeSet<String>,
}

impl SourceChanges {
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.modified.is_empty()
    }
}

/// Localized keys added to `current`, and keys whose non-empty `value:`
/// differs from a non-empty one at `base`.
pub fn source_changes(base: &str, current: &str) -> SourceChanges {
    let current_keys = localized_keys(current);
    let base_keys = localized_keys(base);

    let new = current_keys.difference(&base_keys).cloned().collect();
    let modified = current_keys
        .intersection(&base_keys)
        .filter(|key| {
            match (localized_value(current, key), localized_value(base, key)) {
                (Some(now), Some(before)) => !now.is_empty() && !before.is_empty() && now != before,
                _ => false,
            }
        })
        .cloned()
        .collect();

    SourceChanges { new, modified }
}

#[derive(Debug, Default, Serialize)]
pub struct ExtractionReport {
    /// Changed source files with at least one new or modified key.
    pub sources_with_changes: Vec<String>,
    pub issues: Vec<ExtractionIssue>,
}

/// One extraction run. Parsed string-file keys and the changed/unchanged
/// verdict per string file are memoized for the run.
pub struct ExtractionVerifier<'a> {
    snapshots: SnapshotCache<'a>,
    string_files: Vec<String>,
    keys: HashMap<String, BTreeSet<String>>,
    changed_string_files: HashMap<String, bool>,
}

impl<'a> ExtractionVerifier<'a> {
    /// `string_files` are searched in order; the first file holding a key wins.
    pub fn new(provider: &'a dyn SnapshotProvider, string_files: Vec<String>) -> Self {
        Self {
            snapshots: SnapshotCache::new(provider),
            string_files,
            keys: HashMap::new(),
            changed_string_files: HashMap::new(),
        }
    }

    pub fn run(&mut self, changed_sources: &[String]) -> ExtractionReport {
        let sources: BTreeSet<&str> = changed_sources.iter().map(String::as_str).collect();
        let mut report = ExtractionReport::default();

        for path in sources {
            let changes = self.changes_in(path);
            if changes.is_empty() {
                continue;
            }
            debug!(
                "{path}: {} new, {} modified localized key(s)",
                changes.new.len(),
                changes.modified.len()
            );
            report.sources_with_changes.push(path.to_string());

            for key in &changes.new {
                if self.find_key(key).is_none() {
                    report
                        .issues
                        .push(ExtractionIssue::new(path, key, ExtractionKind::NotExtracted));
                }
            }

            for key in &changes.modified {
                let updated = match self.find_key(key) {
                    Some(file) => self.string_file_changed(&file),
                    None => false,
                };
                if !updated {
                    report
                        .issues
                        .push(ExtractionIssue::new(path, key, ExtractionKind::NotUpdated));
                }
            }
        }

        report.issues.sort();
        report
    }

    fn changes_in(&mut self, path: &str) -> SourceChanges {
        let file = Path::new(path);
        let current = encoding::decode(self.snapshots.get(file, Revision::Current));
        // deleted in the working tree
        if current.is_empty() {
            return SourceChanges::default();
        }
        let base = encoding::decode(self.snapshots.get(file, Revision::Base));
        source_changes(&base, &current)
    }

    fn find_key(&mut self, key: &str) -> Option<String> {
        let Self {
            snapshots,
            string_files,
            keys,
            ..
        } = self;

        string_files
            .iter()
            .find(|file| {
                keys.entry((*file).clone())
                    .or_insert_with(|| {
                        let format = ResourceFormat::from_path(file.as_str())
                            .unwrap_or(ResourceFormat::Strings);
                        format.parse_keys(snapshots.get(Path::new(file.as_str()), Revision::Current))
                    })
                    .contains(key)
            })
            .cloned()
    }

    fn string_file_changed(&mut self, file: &str) -> bool {
        if let Some(&changed) = self.changed_string_files.get(file) {
            return changed;
        }

        let path = Path::new(file);
        let current = self.snapshots.get(path, Revision::Current).to_vec();
        let changed = self.snapshots.get(path, Revision::Base) != current.as_slice();
        self.changed_string_files.insert(file.to_string(), changed);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::snapshot::MemorySnapshots;

    const SWIFT: &str = "iOS/App/Views/Settings.swift";
    const CATALOG: &str = "iOS/App/Localizable.xcstrings";
    const TABLE: &str = "iOS/App/en.lproj/Localizable.strings";

    fn keys(k: &[&str]) -> BTreeSet<String> {
        k.iter().map(|s| s.to_string()).collect()
    }

    // ==================== Key extraction ====================

    #[test]
    fn test_localized_keys() {
        let src = r#"
            let a = NSLocalizedString("settings.title", value: "Settings", comment: "")
            let b = NSLocalizedString( "settings.done",
                                       bundle: .main, comment: "Done")
            let c = Text("not.localized")
        "#;
        assert_eq!(localized_keys(src), keys(&["settings.done", "settings.title"]));
    }

    #[test]
    fn test_localized_value() {
        let src = r#"NSLocalizedString("k", tableName: nil,
            value: "Say \"hi\"", comment: "")"#;
        assert_eq!(localized_value(src, "k").as_deref(), Some(r#"Say \"hi\""#));
        assert_eq!(localized_value(src, "other"), None);
        assert_eq!(localized_value(r#"NSLocalizedString("k", comment: "")"#, "k"), None);
    }

    #[test]
    fn test_value_search_crosses_into_later_calls() {
        let src = r#"NSLocalizedString("a", comment: "")
            NSLocalizedString("b", value: "B", comment: "")"#;
        assert_eq!(localized_value(src, "a").as_deref(), Some("B"));
    }

    #[test]
    fn test_key_with_regex_characters() {
        let src = r#"NSLocalizedString("price.(usd)+", value: "$1", comment: "")"#;
        assert_eq!(localized_value(src, "price.(usd)+").as_deref(), Some("$1"));
    }

    // ==================== Source changes ====================

    #[test]
    fn test_new_and_modified_keys() {
        let base = r#"NSLocalizedString("a", value: "A", comment: "")
            NSLocalizedString("b", value: "B", comment: "")"#;
        let current = r#"NSLocalizedString("a", value: "A", comment: "")
            NSLocalizedString("b", value: "B!", comment: "")
            NSLocalizedString("c", value: "C", comment: "")"#;

        let changes = source_changes(base, current);
        assert_eq!(changes.new, keys(&["c"]));
        assert_eq!(changes.modified, keys(&["b"]));
    }

    #[test]
    fn test_missing_or_empty_value_is_not_a_modification() {
        let base = r#"NSLocalizedString("a", comment: "")"#;
        let current = r#"NSLocalizedString("a", value: "A", comment: "")"#;
        assert!(source_changes(base, current).is_empty());

        let base = r#"NSLocalizedString("a", value: "", comment: "")"#;
        assert!(source_changes(base, current).is_empty());
    }

    #[test]
    fn test_removed_keys_are_ignored() {
        let base = r#"NSLocalizedString("gone", value: "G", comment: "")"#;
        assert!(source_changes(base, "let x = 1").is_empty());
    }

    // ==================== Verifier ====================

    fn catalog(keys: &[&str]) -> String {
        let entries: Vec<String> = keys.iter().map(|k| format!(r#""{k}":{{}}"#)).collect();
        format!(r#"{{"strings":{{{}}}}}"#, entries.join(","))
    }

    #[test]
    fn test_new_key_must_be_extracted() {
        let snaps = MemorySnapshots::new()
            .with(SWIFT, Revision::Current, r#"NSLocalizedString("a", comment: "") NSLocalizedString("b", comment: "")"#)
            .with(CATALOG, Revision::Current, catalog(&["a"]));

        let mut verifier = ExtractionVerifier::new(&snaps, vec![CATALOG.to_string()]);
        let report = verifier.run(&[SWIFT.to_string()]);

        assert_eq!(report.sources_with_changes, vec![SWIFT.to_string()]);
        assert_eq!(
            report.issues,
            vec![ExtractionIssue::new(SWIFT, "b", ExtractionKind::NotExtracted)]
        );
    }

    #[test]
    fn test_new_key_found_in_strings_table() {
        let snaps = MemorySnapshots::new()
            .with(SWIFT, Revision::Current, r#"NSLocalizedString("a", comment: "")"#)
            .with(TABLE, Revision::Current, "\"a\" = \"A\";");

        let mut verifier = ExtractionVerifier::new(&snaps, vec![CATALOG.to_string(), TABLE.to_string()]);
        assert!(verifier.run(&[SWIFT.to_string()]).issues.is_empty());
    }

    #[test]
    fn test_modified_key_needs_changed_string_file() {
        let base = r#"NSLocalizedString("a", value: "Old", comment: "")"#;
        let current = r#"NSLocalizedString("a", value: "New", comment: "")"#;
        let stale = MemorySnapshots::new()
            .with(SWIFT, Revision::Base, base)
            .with(SWIFT, Revision::Current, current)
            .with(TABLE, Revision::Base, "\"a\" = \"Old\";")
            .with(TABLE, Revision::Current, "\"a\" = \"Old\";");

        let mut verifier = ExtractionVerifier::new(&stale, vec![TABLE.to_string()]);
        assert_eq!(
            verifier.run(&[SWIFT.to_string()]).issues,
            vec![ExtractionIssue::new(SWIFT, "a", ExtractionKind::NotUpdated)]
        );

        let updated = stale.clone().with(TABLE, Revision::Current, "\"a\" = \"New\";");
        let mut verifier = ExtractionVerifier::new(&updated, vec![TABLE.to_string()]);
        assert!(verifier.run(&[SWIFT.to_string()]).issues.is_empty());
    }

    #[test]
    fn test_modified_key_missing_everywhere() {
        let snaps = MemorySnapshots::new()
            .with(SWIFT, Revision::Base, r#"NSLocalizedString("a", value: "1", comment: "")"#)
            .with(SWIFT, Revision::Current, r#"NSLocalizedString("a", value: "2", comment: "")"#);

        let mut verifier = ExtractionVerifier::new(&snaps, Vec::new());
        assert_eq!(
            verifier.run(&[SWIFT.to_string()]).issues,
            vec![ExtractionIssue::new(SWIFT, "a", ExtractionKind::NotUpdated)]
        );
    }

    #[test]
    fn test_unchanged_and_deleted_sources_are_skipped() {
        let same = r#"NSLocalizedString("a", value: "A", comment: "")"#;
        let snaps = MemorySnapshots::new()
            .with(SWIFT, Revision::Base, same)
            .with(SWIFT, Revision::Current, same)
            .with("iOS/App/Gone.swift", Revision::Base, same);

        let mut verifier = ExtractionVerifier::new(&snaps, Vec::new());
        let report = verifier.run(&[SWIFT.to_string(), "iOS/App/Gone.swift".to_string()]);
        assert!(report.sources_with_changes.is_empty());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_issues_are_sorted_by_kind_then_file_then_key() {
        let other = "iOS/App/Views/About.swift";
        let snaps = MemorySnapshots::new()
            .with(SWIFT, Revision::Base, r#"NSLocalizedString("m", value: "1", comment: "")"#)
            .with(SWIFT, Revision::Current, r#"NSLocalizedString("m", value: "2", comment: "") NSLocalizedString("z", comment: "")"#)
            .with(other, Revision::Current, r#"NSLocalizedString("y", comment: "") NSLocalizedString("x", comment: "")"#);

        let mut verifier = ExtractionVerifier::new(&snaps, Vec::new());
        let report = verifier.run(&[SWIFT.to_string(), other.to_string()]);
        assert_eq!(
            report.issues,
            vec![
                ExtractionIssue::new(other, "x", ExtractionKind::NotExtracted),
                ExtractionIssue::new(other, "y", ExtractionKind::NotExtracted),
                ExtractionIssue::new(SWIFT, "z", ExtractionKind::NotExtracted),
                ExtractionIssue::new(SWIFT, "m", ExtractionKind::NotUpdated),
            ]
        );
    }
}
