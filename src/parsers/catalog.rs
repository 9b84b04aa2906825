use std::collections::BTreeMap;

use serde_json::{Map, Value as Json};

use crate::model::entry::{CatalogEntry, Localization, TranslationState};
use crate::services::encoding;

/// Parsed `.xcstrings` string catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub strings: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.strings.get(key)
    }

    /// key -> English source string, the value the change detector compares.
    pub fn source_values(&self) -> BTreeMap<String, &str> {
        self.strings
            .iter()
            .map(|(k, e)| (k.clone(), e.source_value()))
            .collect()
    }
}

/// Parse a string catalog. Invalid JSON, or JSON without a `strings`
/// object, gives an empty catalog.
pub fn parse(bytes: &[u8]) -> Catalog {
    let text = encoding::decode(bytes);
    parse_text(&text)
}

pub fn parse_text(text: &str) -> Catalog {
    if text.trim().is_empty() {
        return Catalog::default();
    }

    let root: Json = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("unparsable string catalog: {e}");
            return Catalog::default();
        }
    };

    let Some(strings) = root.get("strings").and_then(Json::as_object) else {
        return Catalog::default();
    };

    Catalog {
        strings: strings
            .iter()
            .map(|(key, v)| (key.clone(), read_entry(v)))
            .collect(),
    }
}

fn read_entry(v: &Json) -> CatalogEntry {
    let Some(obj) = v.as_object() else {
        return CatalogEntry::Malformed;
    };

    // Only an explicit `false` opts out.
    let should_translate = obj.get("shouldTranslate") != Some(&Json::Bool(false));

    let localizations = obj
        .get("localizations")
        .and_then(Json::as_object)
        .map(read_localizations)
        .unwrap_or_default();

    CatalogEntry::Strings {
        should_translate,
        localizations,
    }
}

fn read_localizations(map: &Map<String, Json>) -> BTreeMap<String, Localization> {
    map.iter()
        .map(|(locale, loc)| {
            let unit = loc.get("stringUnit").and_then(Json::as_object);
            let localization = Localization {
                value: unit
                    .and_then(|u| u.get("value"))
                    .and_then(Json::as_str)
                    .map(str::to_string),
                state: unit
                    .and_then(|u| u.get("state"))
                    .and_then(Json::as_str)
                    .map(TranslationState::from),
            };
            (locale.clone(), localization)
        })
        .collect()
}
