use std::fs;
use std::path::Path;
use std::process::Command;

use predicates::prelude::*;
use transcheck::model::snapshot::Revision;
use transcheck::services::git::{changed_files, resource_extensions, GitSnapshots};
use transcheck::services::snapshot::SnapshotProvider;

const EN: &str = "iOS/App/en.lproj/Localizable.strings";
const DE: &str = "iOS/App/de.lproj/Localizable.strings";

fn git(root: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(args)
        .status()
        .expect("git runs");
    assert!(status.success(), "git {args:?} failed");
}

fn write(root: &Path, rel: &str, content: &str) {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(p, content).unwrap();
}

/// A repo whose base commit has one English table, a German copy, a
/// Swift source and some unrelated files; the working tree then edits
/// them on top.
fn repo() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path();
    git(root, &["init", "-q"]);

    write(root, EN, "\"save\" = \"Save\";\n");
    write(root, DE, "\"save\" = \"Sichern\";\n");
    write(root, "iOS/App/Old.strings", "\"x\" = \"X\";\n");
    write(root, "iOS/App/Home.swift", "let t = NSLocalizedString(\"save\", comment: \"\")\n");
    write(root, "Docs/en.lproj/Guide.strings", "\"g\" = \"G\";\n");
    git(root, &["add", "-A"]);
    git(root, &["commit", "-q", "-m", "base"]);

    write(root, EN, "\"save\" = \"Save\";\n\"cancel\" = \"Cancel\";\n");
    write(root, "iOS/App/Localizable.xcstrings", "{\"strings\":{}}");
    write(root, "iOS/App/README.md", "notes");
    write(root, "Docs/en.lproj/Guide.strings", "\"g\" = \"Guide\";\n");
    write(
        root,
        "iOS/App/Home.swift",
        "let t = NSLocalizedString(\"save\", comment: \"\")\nlet c = NSLocalizedString(\"home.cancel\", comment: \"\")\n",
    );
    fs::remove_file(root.join("iOS/App/Old.strings")).unwrap();
    git(root, &["add", "-A"]);
    tmp
}

fn roots() -> Vec<String> {
    vec!["iOS".to_string(), "SharedPackages".to_string()]
}

// ==================== Changed files ====================

#[test]
fn test_changed_files_lists_added_and_modified_resources_under_roots() {
    let tmp = repo();
    let files = changed_files(tmp.path(), "HEAD", &roots(), &resource_extensions()).unwrap();
    assert_eq!(
        files,
        vec!["iOS/App/Localizable.xcstrings".to_string(), EN.to_string()]
    );
}

#[test]
fn test_changed_files_by_source_extension() {
    let tmp = repo();
    let files = changed_files(tmp.path(), "HEAD", &roots(), &["swift"]).unwrap();
    assert_eq!(files, vec!["iOS/App/Home.swift".to_string()]);
}

#[test]
fn test_changed_files_with_unknown_base_is_an_error() {
    let tmp = repo();
    assert!(changed_files(tmp.path(), "no-such-ref", &roots(), &resource_extensions()).is_err());
}

// ==================== Snapshots ====================

#[test]
fn test_git_snapshots_read_both_revisions() {
    let tmp = repo();
    let snaps = GitSnapshots::new(tmp.path(), "HEAD");

    assert_eq!(snaps.content(Path::new(EN), Revision::Base), b"\"save\" = \"Save\";\n");
    assert_eq!(
        snaps.content(Path::new(EN), Revision::Current),
        b"\"save\" = \"Save\";\n\"cancel\" = \"Cancel\";\n"
    );
}

#[test]
fn test_git_snapshots_are_empty_for_missing_paths() {
    let tmp = repo();
    let snaps = GitSnapshots::new(tmp.path(), "HEAD");

    assert!(snaps
        .content(Path::new("iOS/App/Localizable.xcstrings"), Revision::Base)
        .is_empty());
    assert!(snaps
        .content(Path::new("iOS/App/Old.strings"), Revision::Current)
        .is_empty());
}

// ==================== End to end ====================

#[test]
fn test_check_reports_new_key() {
    let tmp = repo();
    assert_cmd::Command::cargo_bin("transcheck")
        .expect("transcheck built")
        .args(["check", "--platform", "iOS", "--base", "HEAD", "--repo"])
        .arg(tmp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("File: iOS/App/en.lproj/Localizable.strings"))
        .stdout(predicate::str::contains("   • Key: cancel"))
        .stdout(predicate::str::contains("Missing translations: All 24 languages"));
}

#[test]
fn test_verify_extraction_reports_unextracted_key() {
    let tmp = repo();
    assert_cmd::Command::cargo_bin("transcheck")
        .expect("transcheck built")
        .args(["verify-extraction", "--platform", "iOS", "--base", "HEAD", "--repo"])
        .arg(tmp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("❌ New strings missing from string files:"))
        .stdout(predicate::str::contains("   • iOS/App/Home.swift"))
        .stdout(predicate::str::contains("     Key: home.cancel"));
}

#[test]
fn test_verify_extraction_passes_once_key_is_added() {
    let tmp = repo();
    write(
        tmp.path(),
        EN,
        "\"save\" = \"Save\";\n\"cancel\" = \"Cancel\";\n\"home.cancel\" = \"Cancel\";\n",
    );
    assert_cmd::Command::cargo_bin("transcheck")
        .expect("transcheck built")
        .args(["verify-extraction", "--platform", "iOS", "--base", "HEAD", "--repo"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ All NSLocalizedString calls have been extracted"));
}

#[test]
fn test_check_with_nothing_changed() {
    let tmp = repo();
    git(tmp.path(), &["commit", "-q", "-m", "head"]);
    assert_cmd::Command::cargo_bin("transcheck")
        .expect("transcheck built")
        .args(["check", "--platform", "iOS", "--base", "HEAD", "--repo"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ No localization files changed"));
}
