use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

/// Return a `Command` for the `plugreg` binary built by Cargo.
fn plugreg() -> Command {
    cargo_bin_cmd!("plugreg")
}

/// A workable schema for the registry document, mirroring the shape the
/// validator runs against in CI.
const SCHEMA: &str = r#"{
    "$schema": "http://json-schema.org/draft-07/schema#",
    "type": "object",
    "required": ["plugins"],
    "properties": {
        "$schema": { "type": "string" },
        "version": { "type": "integer" },
        "plugins": {
            "type": "array",
            "items": {
                "type": "object",
                "required": ["id", "description", "author", "repo", "category", "addedAt"],
                "properties": {
                    "id": { "type": "string", "minLength": 1 },
                    "description": { "type": "string" },
                    "author": { "type": "string" },
                    "repo": { "type": "string" },
                    "category": { "type": "string" },
                    "tags": { "type": "array", "items": { "type": "string" } },
                    "addedAt": { "type": "string" }
                }
            }
        }
    }
}"#;

fn plugin_json(id: &str, repo: &str) -> String {
    format!(
        r#"{{"id": "{id}", "description": "A plugin", "author": "someone",
            "repo": "{repo}", "category": "tools", "addedAt": "2024-01-01"}}"#
    )
}

fn registry_json(entries: &[(&str, &str)]) -> String {
    let plugins: Vec<String> = entries
        .iter()
        .map(|(id, repo)| plugin_json(id, repo))
        .collect();
    format!(r#"{{"plugins": [{}]}}"#, plugins.join(", "))
}

/// Write a schema and registry into a temp dir; returns the dir and both paths.
fn make_registry_dir(registry: &str) -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempdir().unwrap();
    let schema_path = dir.path().join("plugins.schema.json");
    let registry_path = dir.path().join("plugins.json");
    fs::write(&schema_path, SCHEMA).unwrap();
    fs::write(&registry_path, registry).unwrap();
    (dir, registry_path, schema_path)
}

fn validate_args(registry: &Path, schema: &Path) -> [String; 5] {
    [
        "validate".to_string(),
        "--registry".to_string(),
        registry.display().to_string(),
        "--schema".to_string(),
        schema.display().to_string(),
    ]
}

// ── Global flags ────────────────────────────────────────────────────

#[test]
fn help_flag() {
    plugreg()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("registry validator"));
}

#[test]
fn version_flag() {
    plugreg()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_args_shows_usage() {
    plugreg()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// ── validate ────────────────────────────────────────────────────────

#[test]
fn validate_clean_registry() {
    let (_dir, registry, schema) =
        make_registry_dir(&registry_json(&[("one", "o/one"), ("two", "o/two")]));
    plugreg()
        .args(validate_args(&registry, &schema))
        .assert()
        .success()
        .stdout(predicate::str::contains("Validated 2 plugin(s)"));
}

#[test]
fn validate_empty_registry() {
    let (_dir, registry, schema) = make_registry_dir(&registry_json(&[]));
    plugreg()
        .args(validate_args(&registry, &schema))
        .assert()
        .success()
        .stdout(predicate::str::contains("Validated 0 plugin(s)"));
}

#[test]
fn validate_duplicate_ids() {
    let (_dir, registry, schema) = make_registry_dir(&registry_json(&[
        ("dup", "o/a"),
        ("ok", "o/b"),
        ("dup", "o/c"),
    ]));
    plugreg()
        .args(validate_args(&registry, &schema))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed:"))
        .stderr(predicate::str::contains("Duplicate plugin IDs: dup"));
}

#[test]
fn validate_duplicates_found_under_lax_schema() {
    // The schema is opaque and may be laxer than the data model: entries
    // here lack most fields, yet the duplicate scan must still run and fail
    // the invocation.
    let dir = tempdir().unwrap();
    let schema_path = dir.path().join("plugins.schema.json");
    let registry_path = dir.path().join("plugins.json");
    fs::write(&schema_path, r#"{"type": "object"}"#).unwrap();
    fs::write(
        &registry_path,
        r#"{"plugins": [{"id": "dup"}, {"id": "dup"}]}"#,
    )
    .unwrap();
    plugreg()
        .args(validate_args(&registry_path, &schema_path))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate plugin IDs: dup"));
}

#[test]
fn validate_schema_violation_reports_pointer() {
    // Second entry is missing its id.
    let missing_id = r#"{"plugins": [
        {"id": "ok", "description": "d", "author": "a", "repo": "o/a",
         "category": "c", "addedAt": "t"},
        {"description": "d", "author": "a", "repo": "o/b",
         "category": "c", "addedAt": "t"}
    ]}"#;
    let (_dir, registry, schema) = make_registry_dir(missing_id);
    plugreg()
        .args(validate_args(&registry, &schema))
        .assert()
        .failure()
        .stderr(predicate::str::contains("/plugins/1"));
}

#[test]
fn validate_missing_registry_file() {
    let dir = tempdir().unwrap();
    let schema_path = dir.path().join("plugins.schema.json");
    fs::write(&schema_path, SCHEMA).unwrap();
    plugreg()
        .args(validate_args(&dir.path().join("absent.json"), &schema_path))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load plugin registry"));
}

#[test]
fn validate_unparsable_registry() {
    let (_dir, registry, schema) = make_registry_dir("{ not json");
    plugreg()
        .args(validate_args(&registry, &schema))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load plugin registry"));
}

#[test]
fn validate_unparsable_schema() {
    let dir = tempdir().unwrap();
    let schema_path = dir.path().join("plugins.schema.json");
    let registry_path = dir.path().join("plugins.json");
    fs::write(&schema_path, "]]").unwrap();
    fs::write(&registry_path, registry_json(&[])).unwrap();
    plugreg()
        .args(validate_args(&registry_path, &schema_path))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load schema"));
}

// ── check ───────────────────────────────────────────────────────────

/// Run git in a directory with a throwaway identity.
fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args(["-c", "user.name=test", "-c", "user.email=test@example.com"])
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed in {}", dir.display());
}

/// Create an origin repository seeded with the given registry and a clone of
/// it to run the checker in. Returns the parent TempDir (for lifetime) and
/// the clone's path.
fn make_git_pair(registry: &str) -> (tempfile::TempDir, PathBuf) {
    let parent = tempdir().unwrap();
    let origin = parent.path().join("origin");
    fs::create_dir(&origin).unwrap();
    git(&origin, &["init", "-b", "main"]);
    fs::write(origin.join("plugins.json"), registry).unwrap();
    git(&origin, &["add", "plugins.json"]);
    git(&origin, &["commit", "-m", "seed registry"]);

    // Clone over file:// so shallow fetches work.
    let url = format!("file://{}", origin.display());
    git(parent.path(), &["clone", &url, "work"]);
    let work = parent.path().join("work");
    (parent, work)
}

#[test]
fn check_requires_base_branch() {
    plugreg()
        .arg("check")
        .env_remove("BASE_BRANCH")
        .assert()
        .failure()
        .stderr(predicate::str::contains("BASE_BRANCH not set"));
}

#[test]
fn check_empty_base_branch_is_missing() {
    plugreg()
        .arg("check")
        .env("BASE_BRANCH", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("BASE_BRANCH not set"));
}

#[test]
fn check_no_new_plugins() {
    let (_parent, work) = make_git_pair(&registry_json(&[("one", "o/one")]));
    plugreg()
        .arg("check")
        .env("BASE_BRANCH", "main")
        .current_dir(&work)
        .assert()
        .success()
        .stdout(predicate::str::contains("No new plugins detected"));
}

#[test]
fn check_invalid_format_fails_without_remote_queries() {
    let (_parent, work) = make_git_pair(&registry_json(&[("one", "o/one")]));

    // Add an entry whose repo fails the format check; the checker reports it
    // without ever reaching the hosting provider.
    fs::write(
        work.join("plugins.json"),
        registry_json(&[("one", "o/one"), ("two", "bad repo")]),
    )
    .unwrap();
    git(&work, &["add", "plugins.json"]);
    git(&work, &["commit", "-m", "add plugin"]);

    plugreg()
        .arg("check")
        .env("BASE_BRANCH", "main")
        .current_dir(&work)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Checking 1 plugin(s)"))
        .stdout(predicate::str::contains("bad repo:"))
        .stderr(predicate::str::contains("::error::Invalid repo format: bad repo"));
}

#[test]
fn check_outside_git_repo_reports_git_error() {
    let dir = tempdir().unwrap();
    plugreg()
        .arg("check")
        .env("BASE_BRANCH", "main")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("git"));
}
