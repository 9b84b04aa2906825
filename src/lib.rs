//! Checks that localized strings changed between two revisions have
//! translations for every required locale.
//!
//! Three resource formats are understood: `.strings` tables, `.stringsdict`
//! plural dictionaries and `.xcstrings` string catalogs. The checking core
//! ([`services::checker`]) is a pure function of two snapshots and a locale
//! set; git access and rendering live around it.

pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod protocol;
pub mod services;

pub use error::{Error, Result};
