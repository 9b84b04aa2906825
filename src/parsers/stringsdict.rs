use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;

use crate::model::value::Value;

pub type PluralTable = BTreeMap<String, Value>;

/// Full read: every top-level key with its whole plural rule dictionary.
///
/// Accepts XML and binary property lists. Anything that is not a
/// dictionary at the top level reads as empty.
pub fn parse_full(bytes: &[u8]) -> PluralTable {
    if bytes.is_empty() {
        return PluralTable::new();
    }

    match plist::Value::from_reader(Cursor::new(bytes)) {
        Ok(plist::Value::Dictionary(dict)) => dict
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect(),
        Ok(_) => PluralTable::new(),
        Err(e) => {
            tracing::debug!("unparsable property list: {e}");
            PluralTable::new()
        }
    }
}

/// Key-only read, used for sibling locale files where presence is all
/// that matters.
pub fn parse_keys(bytes: &[u8]) -> BTreeSet<String> {
    parse_full(bytes).into_keys().collect()
}
