pub mod catalog;
pub mod strings;
pub mod stringsdict;

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use crate::model::entry::{EntryBody, NormalizedEntry};
use catalog::Catalog;
use strings::StringsTable;
use stringsdict::PluralTable;

/// The three resource formats, selected by file extension.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ResourceFormat {
    /// `.strings`: one file per locale, flat key/value pairs.
    Strings,
    /// `.stringsdict`: one file per locale, plural rule dictionaries.
    StringsDict,
    /// `.xcstrings`: a single JSON catalog with every locale inline.
    Catalog,
}

impl ResourceFormat {
    pub const ALL: [ResourceFormat; 3] = [
        ResourceFormat::Catalog,
        ResourceFormat::Strings,
        ResourceFormat::StringsDict,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ResourceFormat::Strings => "strings",
            ResourceFormat::StringsDict => "stringsdict",
            ResourceFormat::Catalog => "xcstrings",
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Whether every locale lives in its own `<locale>.lproj` copy.
    pub fn is_per_locale(self) -> bool {
        !matches!(self, ResourceFormat::Catalog)
    }

    pub fn parse(self, bytes: &[u8]) -> Resource {
        match self {
            ResourceFormat::Strings => Resource::Strings(strings::parse(bytes)),
            ResourceFormat::StringsDict => Resource::StringsDict(stringsdict::parse_full(bytes)),
            ResourceFormat::Catalog => Resource::Catalog(catalog::parse(bytes)),
        }
    }

    /// Keys present in a file, without values. This is the read used for
    /// sibling locale files.
    pub fn parse_keys(self, bytes: &[u8]) -> BTreeSet<String> {
        match self {
            ResourceFormat::StringsDict => stringsdict::parse_keys(bytes),
            _ => self.parse(bytes).keys(),
        }
    }
}

/// A parsed resource file in its format's normalized shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Strings(StringsTable),
    StringsDict(PluralTable),
    Catalog(Catalog),
}

impl Resource {
    pub fn keys(&self) -> BTreeSet<String> {
        match self {
            Resource::Strings(t) => t.keys().cloned().collect(),
            Resource::StringsDict(t) => t.keys().cloned().collect(),
            Resource::Catalog(c) => c.strings.keys().cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Resource::Strings(t) => t.is_empty(),
            Resource::StringsDict(t) => t.is_empty(),
            Resource::Catalog(c) => c.strings.is_empty(),
        }
    }

    /// Entries sorted by key.
    pub fn entries(&self) -> Vec<NormalizedEntry> {
        match self {
            Resource::Strings(t) => t
                .iter()
                .map(|(k, v)| NormalizedEntry {
                    key: k.clone(),
                    body: EntryBody::Text { value: v.clone() },
                })
                .collect(),
            Resource::StringsDict(t) => t
                .iter()
                .map(|(k, v)| NormalizedEntry {
                    key: k.clone(),
                    body: EntryBody::Plural { value: v.clone() },
                })
                .collect(),
            Resource::Catalog(c) => c
                .strings
                .iter()
                .map(|(k, e)| NormalizedEntry {
                    key: k.clone(),
                    body: EntryBody::Catalog { entry: e.clone() },
                })
                .collect(),
        }
    }
}
