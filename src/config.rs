use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{locale_set, LocaleSet};

const MACOS_LOCALES: [&str; 8] = ["de", "es", "fr", "it", "nl", "pl", "pt", "ru"];

const IOS_LOCALES: [&str; 24] = [
    "bg", "cs", "da", "de", "el", "es", "et", "fi", "fr", "hr", "hu", "it", "lt", "lv", "nb",
    "nl", "pl", "pt", "ro", "ru", "sk", "sl", "sv", "tr",
];

/// Directory shared by both apps.
const SHARED_ROOT: &str = "SharedPackages";

pub const DEFAULT_BASE_REF: &str = "origin/main";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    #[serde(rename = "iOS")]
    Ios,
    #[serde(rename = "macOS")]
    Macos,
}

impl Platform {
    pub fn required_locales(self) -> LocaleSet {
        match self {
            Platform::Ios => locale_set(IOS_LOCALES),
            Platform::Macos => locale_set(MACOS_LOCALES),
        }
    }

    pub fn search_roots(self) -> Vec<String> {
        vec![self.to_string(), SHARED_ROOT.to_string()]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Ios => "iOS",
            Platform::Macos => "macOS",
        })
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "macos" => Ok(Platform::Macos),
            _ => Err(Error::UnknownPlatform(s.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings for one check run.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub platform: Platform,
    pub repo_root: PathBuf,
    pub base_ref: String,
    pub search_roots: Vec<String>,
    pub output: OutputFormat,
}

impl CheckConfig {
    pub fn new(platform: Platform, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            repo_root: repo_root.into(),
            base_ref: DEFAULT_BASE_REF.to_string(),
            search_roots: platform.search_roots(),
            output: OutputFormat::Text,
        }
    }

    pub fn required_locales(&self) -> LocaleSet {
        self.platform.required_locales()
    }
}

/// Pick the ref to diff against: an explicit ref wins, then the pull
/// request's target branch (`GITHUB_BASE_REF`) on `origin`, then
/// `origin/main`.
pub fn resolve_base_ref(explicit: Option<&str>, pr_base: Option<&str>) -> String {
    if let Some(r) = explicit.map(str::trim).filter(|r| !r.is_empty()) {
        return r.to_string();
    }
    match pr_base.map(str::trim).filter(|r| !r.is_empty()) {
        Some(branch) => format!("origin/{branch}"),
        None => DEFAULT_BASE_REF.to_string(),
    }
}
