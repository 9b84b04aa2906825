use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::model::issue::Issue;
use crate::model::snapshot::Revision;
use crate::model::LocaleSet;
use crate::parsers::{catalog, ResourceFormat};

use super::aggregate::aggregate;
use super::coverage::{self, SiblingKeys};
use super::detector;
use super::locator::ResourceLocation;
use super::snapshot::{SnapshotCache, SnapshotProvider};

/// One reconciliation run over a set of changed resource files.
pub struct Checker<'a> {
    snapshots: SnapshotCache<'a>,
    required: LocaleSet,
}

impl<'a> Checker<'a> {
    pub fn new(provider: &'a dyn SnapshotProvider, required: LocaleSet) -> Self {
        Self {
            snapshots: SnapshotCache::new(provider),
            required,
        }
    }

    pub fn required(&self) -> &LocaleSet {
        &self.required
    }

    /// Check every changed file and return the aggregated issue list.
    ///
    /// Catalogs are checked directly. Per-locale files are checked only
    /// when the changed path is the English copy of a known location.
    pub fn run(&mut self, changed_files: &[String], locations: &BTreeSet<ResourceLocation>) -> Vec<Issue> {
        let files: BTreeSet<&str> = changed_files.iter().map(String::as_str).collect();
        let mut issues = Vec::new();

        for path in files {
            match ResourceFormat::from_path(path) {
                Some(ResourceFormat::Catalog) => issues.extend(self.check_catalog(path)),
                Some(format) => {
                    let Some(location) = ResourceLocation::from_path(path) else {
                        continue;
                    };
                    if location.english_path() != path || !locations.contains(&location) {
                        continue;
                    }
                    issues.extend(self.check_per_locale(&location, format));
                }
                None => {}
            }
        }

        debug!("{} snapshot read(s)", self.snapshots.misses());
        aggregate(issues)
    }

    /// Missing and needs-review passes over one string catalog.
    pub fn check_catalog(&mut self, path: &str) -> Vec<Issue> {
        let file = Path::new(path);
        let current = catalog::parse(self.snapshots.get(file, Revision::Current));
        let base = catalog::parse(self.snapshots.get(file, Revision::Base));

        let changed = detector::changed_catalog_keys(&base, &current);
        debug!("{path}: {} changed key(s)", changed.len());
        if changed.is_empty() {
            return Vec::new();
        }

        let mut issues = coverage::missing_in_catalog(path, &base, &current, &changed, &self.required);
        issues.extend(coverage::needs_review_in_catalog(
            path,
            &base,
            &current,
            &changed,
            &self.required,
        ));
        issues
    }

    /// Missing pass for a `.strings` / `.stringsdict` resource, looking up
    /// each required locale's sibling copy in the current tree.
    pub fn check_per_locale(&mut self, location: &ResourceLocation, format: ResourceFormat) -> Vec<Issue> {
        let en_path = location.english_path();
        let file = Path::new(&en_path);
        let current = format.parse(self.snapshots.get(file, Revision::Current));
        let base = format.parse(self.snapshots.get(file, Revision::Base));

        let changed = detector::changed_keys(&base, &current);
        debug!("{en_path}: {} changed key(s)", changed.len());
        if changed.is_empty() {
            return Vec::new();
        }

        let Self { snapshots, required } = self;
        let siblings: SiblingKeys = required
            .iter()
            .map(|locale| {
                let sibling = location.locale_path(locale);
                let keys = format.parse_keys(snapshots.get(Path::new(&sibling), Revision::Current));
                (locale.clone(), keys)
            })
            .collect();

        coverage::missing_in_siblings(&en_path, &changed, &siblings, required)
    }
}

/// Locations implied by a list of repo-relative paths, for callers that
/// hold snapshots in memory instead of walking a checkout.
pub fn locations_from_paths<'p>(paths: impl IntoIterator<Item = &'p str>) -> BTreeSet<ResourceLocation> {
    paths
        .into_iter()
        .filter(|p| ResourceFormat::from_path(p).is_some_and(ResourceFormat::is_per_locale))
        .filter_map(ResourceLocation::from_path)
        .collect()
}
