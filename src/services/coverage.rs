use std::collections::{BTreeMap, BTreeSet};

use crate::model::entry::{CatalogEntry, TranslationState};
use crate::model::issue::{Issue, IssueKind};
use crate::model::LocaleSet;
use crate::parsers::catalog::Catalog;

use super::detector::ChangedKeys;

/// No entry and an empty set both mean "absent".
pub type SiblingKeys = BTreeMap<String, BTreeSet<String>>;

pub fn missing_in_siblings(
    file_path: &str,
    changed: &ChangedKeys,
    siblings: &SiblingKeys,
    required: &LocaleSet,
) -> Vec<Issue> {
    changed
        .iter()
        .filter_map(|key| {
            let missing: BTreeSet<String> = required
                .iter()
                .filter(|locale| {
                    !siblings
                        .get(locale.as_str())
                        .is_some_and(|keys| keys.contains(key))
                })
                .cloned()
                .collect();

            (!missing.is_empty()).then(|| Issue::new(file_path, key, missing, IssueKind::Missing))
        })
        .collect()
}

/// Missing check for catalogs: a locale covers a key when its state is
/// `translated` or `needs_review`.
///
/// When the key's English source changed since `base`, a `translated`
/// localization left exactly as it was at `base` belongs to the old source
/// and counts as missing. A changed key whose entry is not a mapping fails
/// every locale. Keys marked `shouldTranslate: false` are exempt.
pub fn missing_in_catalog(
    file_path: &str,
    base: &Catalog,
    current: &Catalog,
    changed: &ChangedKeys,
    required: &LocaleSet,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for key in changed {
        let Some(entry) = current.get(key) else {
            continue;
        };

        let missing: BTreeSet<String> = match entry {
            CatalogEntry::Malformed => required.clone(),
            _ if !entry.should_translate() => continue,
            _ => {
                let base_entry = base.get(key);
                required
                    .iter()
                    .filter(|locale| {
                        !entry.state_for(locale).is_some_and(TranslationState::is_present)
                            || is_stale(locale, base_entry, entry)
                    })
                    .cloned()
                    .collect()
            }
        };

        if !missing.is_empty() {
            issues.push(Issue::new(file_path, key, missing, IssueKind::Missing));
        }
    }

    issues
}

/// A `translated` localization untouched since `base` while the source
/// string moved on.
fn is_stale(locale: &str, base: Option<&CatalogEntry>, current: &CatalogEntry) -> bool {
    let Some(base) = base else {
        return false;
    };
    if base.source_value() == current.source_value() {
        return false;
    }

    match (base.localization(locale), current.localization(locale)) {
        (Some(before), Some(now)) => {
            now.state == Some(TranslationState::Translated) && before == now
        }
        _ => false,
    }
}

// Reviews already pending at base are not reported again.
pub fn needs_review_in_catalog(
    file_path: &str,
    base: &Catalog,
    current: &Catalog,
    changed: &ChangedKeys,
    required: &LocaleSet,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for key in changed {
        let Some(entry) = current.get(key) else {
            continue;
        };
        if matches!(entry, CatalogEntry::Malformed) || !entry.should_translate() {
            continue;
        }

        let base_entry = base.get(key);
        let flagged: BTreeSet<String> = required
            .iter()
            .filter(|locale| entry.state_for(locale) == Some(TranslationState::NeedsReview))
            .filter(|locale| {
                base_entry.and_then(|b| b.state_for(locale)) != Some(TranslationState::NeedsReview)
            })
            .cloned()
            .collect();

        if !flagged.is_empty() {
            issues.push(Issue::new(file_path, key, flagged, IssueKind::NeedsReview));
        }
    }

    issues
}
