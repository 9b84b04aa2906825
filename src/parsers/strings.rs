use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::services::encoding;

pub type StringsTable = BTreeMap<String, String>;

static PAIR_REGEX: OnceLock<Regex> = OnceLock::new();

/// Parse `"key" = "value";` pairs from a `.strings` file.
///
/// Keys and values are kept exactly as written between the quotes, escape
/// sequences included. A later duplicate key wins. Anything that does not
/// look like a pair is skipped, so garbage input yields an empty table.
pub fn parse(bytes: &[u8]) -> StringsTable {
    let text = encoding::decode(bytes);
    parse_text(&text)
}

pub fn parse_text(text: &str) -> StringsTable {
    let mut table = StringsTable::new();

    if text.is_empty() {
        return table;
    }

    let re = PAIR_REGEX.get_or_init(|| {
        Regex::new(r#""((?:[^"\\]|\\.)*)"\s*=\s*"((?:[^"\\]|\\.)*)"\s*;"#)
            .expect("static pattern is valid")
    });

    for caps in re.captures_iter(text) {
        let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        table.insert(key.as_str().to_string(), value.as_str().to_string());
    }

    table
}
