//! Detection of newly-added registry entries via the version-control history.
//!
//! The base branch is fetched shallowly from `origin`, the registry file is
//! read from both the base reference and the current checkout, and the two
//! are compared by their `repo` field. Git is consumed as a subprocess; no
//! repository state is modified beyond the fetch.

use std::collections::HashSet;
use std::env;
use std::process::Command;

use crate::errors::{PlugregError, Result};
use crate::models::PluginRegistry;

/// Read the required base-branch name from `BASE_BRANCH`.
///
/// Absence (or an empty value) is a fatal configuration error; the caller
/// exits before any diff or remote work is attempted.
pub fn base_branch_from_env() -> Result<String> {
    match env::var("BASE_BRANCH") {
        Ok(branch) if !branch.is_empty() => Ok(branch),
        _ => Err(PlugregError::Config {
            message: "BASE_BRANCH not set".to_string(),
        }),
    }
}

/// Run a git command, returning its stdout as UTF-8 text.
///
/// A non-zero exit status is an error carrying git's stderr, so the caller's
/// report embeds the underlying failure text.
fn run_git(args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .output()
        .map_err(|e| PlugregError::Git {
            message: format!("failed to run git {}: {e}", args.join(" ")),
        })?;

    if !output.status.success() {
        return Err(PlugregError::Git {
            message: format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Shallow-fetch the base branch from `origin`.
pub fn fetch_base(base_branch: &str) -> Result<()> {
    run_git(&["fetch", "origin", base_branch, "--depth=1"])?;
    Ok(())
}

/// Read the full content of `path` as of the given revision reference.
pub fn show_file(revision: &str, path: &str) -> Result<String> {
    run_git(&["show", &format!("{revision}:{path}")])
}

/// Parse registry file content fetched from a revision.
fn parse_registry(content: &str, what: &str) -> Result<PluginRegistry> {
    serde_json::from_str(content).map_err(|e| PlugregError::Document {
        message: format!("Failed to parse {what}: {e}"),
    })
}

/// Repositories present in `current` but absent from `base`, in the current
/// document's order. Keyed by the `repo` field, not the plugin identifier.
pub fn new_repos(base: &PluginRegistry, current: &PluginRegistry) -> Vec<String> {
    let known: HashSet<&str> = base.plugins.iter().map(|p| p.repo.as_str()).collect();
    current
        .plugins
        .iter()
        .filter(|p| !known.contains(p.repo.as_str()))
        .map(|p| p.repo.clone())
        .collect()
}

/// Compute the repositories newly added relative to the base branch.
///
/// Fetches `origin/<base_branch>` shallowly, reads the registry file from
/// both that reference and `HEAD`, and returns the set difference.
pub fn changed_repos(base_branch: &str, registry_path: &str) -> Result<Vec<String>> {
    fetch_base(base_branch)?;

    let old_content = show_file(&format!("origin/{base_branch}"), registry_path)?;
    let new_content = show_file("HEAD", registry_path)?;

    let old = parse_registry(&old_content, &format!("{registry_path} at origin/{base_branch}"))?;
    let new = parse_registry(&new_content, &format!("{registry_path} at HEAD"))?;

    Ok(new_repos(&old, &new))
}
