use std::collections::BTreeSet;
use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::model::SOURCE_LOCALE;
use crate::parsers::ResourceFormat;

/// Suffix marking a per-locale folder, as in `de.lproj`.
pub const LOCALE_DIR_SUFFIX: &str = ".lproj";

/// A per-locale resource: `<parent>/<locale>.lproj/<file_name>`.
///
/// `parent` is relative to the repository root and uses `/` separators,
/// matching the paths git reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    pub parent: String,
    pub file_name: String,
}

impl ResourceLocation {
    pub fn new(parent: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            file_name: file_name.into(),
        }
    }

    /// Split a repo-relative path into its location, if the file sits
    /// directly inside a `*.lproj` folder.
    pub fn from_path(path: &str) -> Option<Self> {
        let mut parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        let file_name = parts.pop()?;
        let locale_dir = parts.pop()?;
        if !locale_dir.ends_with(LOCALE_DIR_SUFFIX) || locale_dir.len() == LOCALE_DIR_SUFFIX.len() {
            return None;
        }
        Some(Self::new(parts.join("/"), file_name))
    }

    pub fn locale_path(&self, locale: &str) -> String {
        let dir = format!("{locale}{LOCALE_DIR_SUFFIX}");
        if self.parent.is_empty() {
            format!("{dir}/{}", self.file_name)
        } else {
            format!("{}/{dir}/{}", self.parent, self.file_name)
        }
    }

    pub fn english_path(&self) -> String {
        self.locale_path(SOURCE_LOCALE)
    }
}

/// Walk `roots` (relative to `repo_root`) for per-locale files of `format`.
///
/// Missing roots are skipped. Every locale folder contributes, so a
/// resource that only exists in `de.lproj` is still found; callers look
/// up the English copy through [`ResourceLocation::english_path`].
pub fn find_locations(
    repo_root: &Path,
    roots: &[String],
    format: ResourceFormat,
) -> BTreeSet<ResourceLocation> {
    let mut locations = BTreeSet::new();

    for root in roots {
        let dir = repo_root.join(root);
        if !dir.exists() {
            tracing::debug!("search root {} does not exist, skipping", dir.display());
            continue;
        }

        for entry in WalkDir::new(&dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            if ResourceFormat::from_path(path) != Some(format) {
                continue;
            }

            let Some(rel) = relative_slash_path(repo_root, path) else {
                continue;
            };
            if let Some(location) = ResourceLocation::from_path(&rel) {
                locations.insert(location);
            }
        }
    }

    locations
}

/// Files that hold English source strings under `roots`: every catalog,
/// then every `.strings` file inside `en.lproj`. Each group is sorted.
pub fn find_source_string_files(repo_root: &Path, roots: &[String]) -> Vec<String> {
    let mut catalogs = BTreeSet::new();
    let mut tables = BTreeSet::new();

    for root in roots {
        let dir = repo_root.join(root);
        if !dir.exists() {
            continue;
        }

        for entry in WalkDir::new(&dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(rel) = relative_slash_path(repo_root, entry.path()) else {
                continue;
            };
            match ResourceFormat::from_path(&rel) {
                Some(ResourceFormat::Catalog) => {
                    catalogs.insert(rel);
                }
                Some(ResourceFormat::Strings) => {
                    if ResourceLocation::from_path(&rel).is_some_and(|l| l.english_path() == rel) {
                        tables.insert(rel);
                    }
                }
                _ => {}
            }
        }
    }

    catalogs.into_iter().chain(tables).collect()
}

fn relative_slash_path(base: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Option<Vec<&str>> = rel
        .components()
        .map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();
    Some(parts?.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(
            ResourceLocation::from_path("iOS/App/en.lproj/Localizable.strings"),
            Some(ResourceLocation::new("iOS/App", "Localizable.strings"))
        );
        assert_eq!(
            ResourceLocation::from_path("en.lproj/Localizable.strings"),
            Some(ResourceLocation::new("", "Localizable.strings"))
        );
        assert_eq!(ResourceLocation::from_path("iOS/App/Localizable.strings"), None);
        assert_eq!(ResourceLocation::from_path("iOS/.lproj/Localizable.strings"), None);
        assert_eq!(ResourceLocation::from_path("Localizable.strings"), None);
    }

    #[test]
    fn test_locale_paths() {
        let loc = ResourceLocation::new("macOS/App", "Plurals.stringsdict");
        assert_eq!(loc.english_path(), "macOS/App/en.lproj/Plurals.stringsdict");
        assert_eq!(loc.locale_path("de"), "macOS/App/de.lproj/Plurals.stringsdict");

        let top = ResourceLocation::new("", "Localizable.strings");
        assert_eq!(top.english_path(), "en.lproj/Localizable.strings");
    }
}
