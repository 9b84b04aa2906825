pub mod entry;
pub mod issue;
pub mod snapshot;
pub mod value;

use std::collections::BTreeSet;

/// Locale holding the source strings.
pub const SOURCE_LOCALE: &str = "en";

/// Locales every changed key must be translated into.
pub type LocaleSet = BTreeSet<String>;

pub fn locale_set<I, S>(locales: I) -> LocaleSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    locales.into_iter().map(Into::into).collect()
}
