use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::issue::{ExtractionIssue, ExtractionKind, Issue};
use crate::model::LocaleSet;

use super::aggregate::{group_by_file, FileGroup};
use super::extraction::ExtractionReport;

pub const HEADER: &str = "❌ Untranslated strings found:";

pub const EXTRACTION_HINT: &str = "💡 Please build the app and commit the corresponding string files.";

/// Human-readable report. Empty string when there are no issues.
pub fn render_text(issues: &[Issue], required: &LocaleSet) -> String {
    if issues.is_empty() {
        return String::new();
    }

    let mut lines = vec![HEADER.to_string()];

    for group in group_by_file(issues, required) {
        lines.push(format!("\nFile: {}", group.file_path));
        for line in group.keys {
            lines.push(format!("   • Key: {}", line.display_key));
            lines.push(format!("     {}: {}", line.kind.label(), line.locales));
        }
    }

    lines.join("\n")
}

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub ok: bool,
    pub required_locales: Vec<String>,
    pub issue_count: usize,
    pub files: Vec<FileGroup>,
}

pub fn render_json(issues: &[Issue], required: &LocaleSet) -> serde_json::Result<String> {
    let report = JsonReport {
        ok: issues.is_empty(),
        required_locales: required.iter().cloned().collect(),
        issue_count: issues.len(),
        files: group_by_file(issues, required),
    };
    serde_json::to_string_pretty(&report)
}

/// Extraction failures, one section per kind, files and keys sorted.
pub fn render_extraction_text(issues: &[ExtractionIssue]) -> String {
    if issues.is_empty() {
        return String::new();
    }

    let mut lines = Vec::new();
    for kind in [ExtractionKind::NotExtracted, ExtractionKind::NotUpdated] {
        let mut by_file: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for issue in issues.iter().filter(|i| i.kind == kind) {
            by_file
                .entry(issue.source_path.as_str())
                .or_default()
                .push(issue.key.as_str());
        }
        if by_file.is_empty() {
            continue;
        }

        lines.push(format!("\n{}", kind.header()));
        for (file, mut keys) in by_file {
            keys.sort_unstable();
            lines.push(format!("   • {file}"));
            lines.extend(keys.into_iter().map(|k| format!("     Key: {k}")));
        }
    }
    lines.push(format!("\n{EXTRACTION_HINT}"));

    lines.join("\n")
}

#[derive(Debug, Serialize)]
pub struct ExtractionJsonReport<'a> {
    pub ok: bool,
    pub issue_count: usize,
    #[serde(flatten)]
    pub report: &'a ExtractionReport,
}

pub fn render_extraction_json(report: &ExtractionReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ExtractionJsonReport {
        ok: report.issues.is_empty(),
        issue_count: report.issues.len(),
        report,
    })
}
