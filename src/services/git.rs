use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{Error, Result};
use crate::model::snapshot::Revision;
use crate::parsers::ResourceFormat;

use super::snapshot::SnapshotProvider;

fn run_git(repo_root: &Path, args: &[String]) -> Result<Output> {
    Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(args)
        .output()
        .map_err(|source| Error::GitSpawn {
            args: args.join(" "),
            source,
        })
}

/// Files with one of `extensions` added, copied, modified or renamed
/// since `base_ref` under `roots`, as repo-relative paths.
pub fn changed_files(
    repo_root: &Path,
    base_ref: &str,
    roots: &[String],
    extensions: &[&str],
) -> Result<Vec<String>> {
    let mut args: Vec<String> = vec![
        "diff".into(),
        "--name-only".into(),
        "--diff-filter=ACMR".into(),
        base_ref.into(),
        "--".into(),
    ];
    for root in roots {
        for ext in extensions {
            args.push(format!(":(glob){root}/**/*.{ext}"));
        }
    }

    let out = run_git(repo_root, &args)?;
    if !out.status.success() {
        return Err(Error::Git {
            args: args.join(" "),
            status: out.status.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }

    let mut files: Vec<String> = String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    files.sort();
    files.dedup();
    Ok(files)
}

pub fn resource_extensions() -> Vec<&'static str> {
    ResourceFormat::ALL.iter().map(|f| f.extension()).collect()
}

/// Current revision from the working tree, base revision via
/// `git show <base>:<path>`.
#[derive(Debug, Clone)]
pub struct GitSnapshots {
    repo_root: PathBuf,
    base_ref: String,
}

impl GitSnapshots {
    pub fn new(repo_root: impl Into<PathBuf>, base_ref: impl Into<String>) -> Self {
        Self {
            repo_root: repo_root.into(),
            base_ref: base_ref.into(),
        }
    }

    fn show(&self, path: &Path) -> Result<Vec<u8>> {
        // git wants forward slashes in the object path
        let rel = path.to_string_lossy().replace('\\', "/");
        let args = vec!["show".to_string(), format!("{}:{rel}", self.base_ref)];
        let out = run_git(&self.repo_root, &args)?;
        if out.status.success() {
            Ok(out.stdout)
        } else {
            // Nonexistent at base is the common case for new files.
            tracing::debug!(
                "{} not present at {}: {}",
                rel,
                self.base_ref,
                String::from_utf8_lossy(&out.stderr).trim()
            );
            Ok(Vec::new())
        }
    }
}

impl SnapshotProvider for GitSnapshots {
    fn content(&self, path: &Path, revision: Revision) -> Vec<u8> {
        match revision {
            Revision::Current => {
                let full = self.repo_root.join(path);
                std::fs::read(&full).unwrap_or_else(|e| {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        let err = Error::Io { path: full.clone(), source: e };
                        tracing::warn!("{err}");
                    }
                    Vec::new()
                })
            }
            Revision::Base => self.show(path).unwrap_or_else(|e| {
                tracing::warn!("{e}");
                Vec::new()
            }),
        }
    }
}
