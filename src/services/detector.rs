use std::collections::{BTreeMap, BTreeSet};

use crate::parsers::catalog::Catalog;
use crate::parsers::Resource;

pub type ChangedKeys = BTreeSet<String>;

/// New or modified keys. Deletions never show up.
pub fn diff_tables<V: PartialEq>(
    base: &BTreeMap<String, V>,
    current: &BTreeMap<String, V>,
) -> ChangedKeys {
    current
        .iter()
        .filter(|(key, value)| base.get(*key) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect()
}

pub fn changed_keys(base: &Resource, current: &Resource) -> ChangedKeys {
    match (base, current) {
        (Resource::Strings(b), Resource::Strings(c)) => diff_tables(b, c),
        (Resource::StringsDict(b), Resource::StringsDict(c)) => diff_tables(b, c),
        (Resource::Catalog(b), Resource::Catalog(c)) => changed_catalog_keys(b, c),
        // Formats never mix for one path; treat a mismatch as an empty base.
        (_, current) => current.keys(),
    }
}

// Only the English source counts; translation edits are not changes.
pub fn changed_catalog_keys(base: &Catalog, current: &Catalog) -> ChangedKeys {
    diff_tables(&base.source_values(), &current.source_values())
}
