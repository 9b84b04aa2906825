use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::value::Value;

/// One translatable unit read from a resource file.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    pub key: String,

    #[serde(flatten)]
    pub body: EntryBody,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum EntryBody {
    /// `"key" = "value";` from a flat table.
    Text { value: String },

    /// Whole plural rule dictionary, compared as one value.
    Plural { value: Value },

    /// Catalog entry carrying every locale inline.
    Catalog { entry: CatalogEntry },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TranslationState {
    New,
    Translated,
    NeedsReview,
    Stale,
    Unknown,
}

impl From<&str> for TranslationState {
    fn from(s: &str) -> Self {
        match s {
            "new" => TranslationState::New,
            "translated" => TranslationState::Translated,
            "needs_review" => TranslationState::NeedsReview,
            "stale" => TranslationState::Stale,
            _ => TranslationState::Unknown,
        }
    }
}

impl TranslationState {
    /// States that count as "a translation exists" for the missing check.
    pub fn is_present(self) -> bool {
        matches!(self, TranslationState::Translated | TranslationState::NeedsReview)
    }
}

/// `localizations[locale].stringUnit` of a catalog entry.
///
/// A localization that is not a mapping, or has no string unit, ends up
/// with both fields empty.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Localization {
    pub value: Option<String>,
    pub state: Option<TranslationState>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogEntry {
    Strings {
        should_translate: bool,
        localizations: BTreeMap<String, Localization>,
    },

    /// The entry decoded to something other than a mapping.
    Malformed,
}

impl CatalogEntry {
    /// English source string, empty when there is none.
    pub fn source_value(&self) -> &str {
        match self {
            CatalogEntry::Strings { localizations, .. } => localizations
                .get(super::SOURCE_LOCALE)
                .and_then(|l| l.value.as_deref())
                .unwrap_or(""),
            CatalogEntry::Malformed => "",
        }
    }

    pub fn should_translate(&self) -> bool {
        match self {
            CatalogEntry::Strings {
                should_translate, ..
            } => *should_translate,
            CatalogEntry::Malformed => true,
        }
    }

    pub fn localization(&self, locale: &str) -> Option<&Localization> {
        match self {
            CatalogEntry::Strings { localizations, .. } => localizations.get(locale),
            CatalogEntry::Malformed => None,
        }
    }

    pub fn state_for(&self, locale: &str) -> Option<TranslationState> {
        self.localization(locale).and_then(|l| l.state)
    }
}
