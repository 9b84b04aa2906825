//! One-JSON-object-per-line request/response surface.
//!
//! Requests look like `{"id": 1, "cmd": "check.snapshots", "payload": {..}}`
//! and every request gets exactly one response line with `status` set to
//! `ok` or `error`.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Platform;
use crate::error::Error;
use crate::model::snapshot::{Revision, Snapshot};
use crate::model::{locale_set, LocaleSet};
use crate::parsers::ResourceFormat;
use crate::services::checker::{locations_from_paths, Checker};
use crate::services::extraction::ExtractionVerifier;
use crate::services::{encoding, report};
use crate::services::snapshot::MemorySnapshots;

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

#[derive(Debug, Deserialize)]
struct FileRevisions {
    path: String,
    #[serde(default)]
    base: String,
    #[serde(default)]
    current: String,
}

#[derive(Debug, Deserialize)]
struct SiblingFile {
    path: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct CheckRequest {
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    locales: Option<Vec<String>>,
    files: Vec<FileRevisions>,
    #[serde(default)]
    siblings: Vec<SiblingFile>,
}

#[derive(Debug, Deserialize)]
struct ExtractionRequest {
    sources: Vec<FileRevisions>,
    #[serde(default)]
    string_files: Vec<FileRevisions>,
}

fn insert_revisions(snapshots: &mut MemorySnapshots, files: Vec<FileRevisions>) -> Vec<String> {
    files
        .into_iter()
        .map(|f| {
            snapshots.insert(Snapshot::new(&f.path, Revision::Base, f.base));
            snapshots.insert(Snapshot::new(&f.path, Revision::Current, f.current));
            f.path
        })
        .collect()
}

fn required_locales(platform: Option<&str>, locales: Option<Vec<String>>) -> Result<LocaleSet, Error> {
    if let Some(locales) = locales {
        return Ok(locale_set(locales));
    }
    match platform {
        Some(p) => Ok(p.parse::<Platform>()?.required_locales()),
        None => Err(Error::InvalidRequest(
            "payload.platform or payload.locales is required".into(),
        )),
    }
}

fn check_snapshots(payload: &Value) -> Result<Value, Error> {
    let req: CheckRequest = serde_json::from_value(payload.clone())
        .map_err(|e| Error::InvalidRequest(format!("invalid check payload: {e}")))?;

    let required = required_locales(req.platform.as_deref(), req.locales)?;

    let mut snapshots = MemorySnapshots::new();
    let changed = insert_revisions(&mut snapshots, req.files);
    for s in &req.siblings {
        snapshots.insert(Snapshot::new(&s.path, Revision::Current, s.text.as_str()));
    }

    let locations = locations_from_paths(
        changed
            .iter()
            .map(String::as_str)
            .chain(req.siblings.iter().map(|s| s.path.as_str())),
    );

    let mut checker = Checker::new(&snapshots, required);
    let issues = checker.run(&changed, &locations);
    let text = report::render_text(&issues, checker.required());

    Ok(json!({ "issues": issues, "report": text }))
}

fn verify_extraction(payload: &Value) -> Result<Value, Error> {
    let req: ExtractionRequest = serde_json::from_value(payload.clone())
        .map_err(|e| Error::InvalidRequest(format!("invalid extraction payload: {e}")))?;

    let mut snapshots = MemorySnapshots::new();
    let sources = insert_revisions(&mut snapshots, req.sources);
    // listed order is search order
    let string_files = insert_revisions(&mut snapshots, req.string_files);

    let outcome = ExtractionVerifier::new(&snapshots, string_files).run(&sources);
    let text = report::render_extraction_text(&outcome.issues);

    Ok(json!({
        "sources_with_changes": outcome.sources_with_changes,
        "issues": outcome.issues,
        "report": text,
    }))
}

pub fn handle(input: &str) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let payload = get_payload(&req);

    match Command::from(get_cmd(&req)) {
        Command::Ping => ok(id, json!({ "message": "transcheck alive" })),

        Command::PlatformLocales => {
            let platform = payload.get("platform").and_then(|v| v.as_str()).unwrap_or("");
            match platform.parse::<Platform>() {
                Ok(p) => {
                    let locales: Vec<String> = p.required_locales().into_iter().collect();
                    ok(id, json!({ "platform": p, "locales": locales, "search_roots": p.search_roots() }))
                }
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::ResourceParse => {
            let path = payload.get("path").and_then(|v| v.as_str()).unwrap_or("");
            let text = payload.get("text").and_then(|v| v.as_str()).unwrap_or("");
            if path.is_empty() {
                return err(id, "payload.path is required");
            }
            let Some(format) = ResourceFormat::from_path(path) else {
                return err(id, format!("unsupported resource type: {path}"));
            };
            let entries = format.parse(text.as_bytes()).entries();
            ok(id, json!({ "format": format, "entries": entries }))
        }

        Command::DetectEncoding => {
            let path = payload.get("path").and_then(|v| v.as_str()).unwrap_or("");
            if path.is_empty() {
                return err(id, "payload.path is required");
            }
            match encoding::detect_from_file(std::path::Path::new(path)) {
                Ok(result) => ok(id, serde_json::to_value(result).unwrap_or(json!({}))),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::CheckSnapshots => match check_snapshots(payload) {
            Ok(v) => ok(id, v),
            Err(e) => err(id, e.to_string()),
        },

        Command::VerifyExtraction => match verify_extraction(payload) {
            Ok(v) => ok(id, v),
            Err(e) => err(id, e.to_string()),
        },

        Command::Unknown => err(id, "unknown command"),
    }
}
