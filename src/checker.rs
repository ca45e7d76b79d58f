//! Publishing-requirement checks for one newly-added repository.
//!
//! The sequence is linear: format, existence, manifest retrieval, manifest
//! field, release count, latest-release asset. A fatal step short-circuits
//! the rest of this repository's checks; other repositories are unaffected.

use std::sync::LazyLock;

use regex::Regex;

use crate::host::HostProvider;

/// Valid repository references: `owner/name` with alphanumerics,
/// underscore, dot, hyphen in each segment.
static REPO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+/[a-zA-Z0-9_.-]+$").expect("repo regex"));

/// The asset the latest release must carry.
const REQUIRED_ASSET: &str = "plugin.zip";

/// Run the full check sequence for one repository reference.
///
/// Returns the accumulated error messages (empty = passed). `progress`
/// receives an informational line as each step passes, so a live log shows
/// sub-checks as they happen; it is not part of the result contract.
pub fn check_repo(
    host: &dyn HostProvider,
    repo: &str,
    progress: &mut dyn FnMut(&str),
) -> Vec<String> {
    let mut errors = Vec::new();

    if !REPO_PATTERN.is_match(repo) {
        return vec![format!("Invalid repo format: {repo}")];
    }

    if let Err(e) = host.repo_id(repo) {
        return vec![format!("Repository {repo} not found or not public: {e}")];
    }
    progress("Repository exists");

    let manifest = match host.manifest(repo) {
        Ok(m) => m,
        Err(e) => return vec![format!("Repository {repo} has no package.json: {e}")],
    };
    progress("package.json exists");

    if has_vendor_category(&manifest) {
        progress("nuclear.category present");
    } else {
        errors.push(format!(
            "package.json in {repo} missing nuclear.category field"
        ));
    }

    let release_count = match host.release_count(repo) {
        Ok(n) => n,
        Err(e) => {
            errors.push(format!("Could not fetch releases for {repo}: {e}"));
            return errors;
        }
    };

    if release_count == 0 {
        errors.push(format!("Repository {repo} has no releases"));
        return errors;
    }
    progress(&format!("Has {release_count} release(s)"));

    match host.latest_release_assets(repo) {
        Ok(assets) => {
            if assets.iter().any(|name| name == REQUIRED_ASSET) {
                progress("Latest release has plugin.zip");
            } else {
                errors.push(format!("Latest release of {repo} missing plugin.zip asset"));
            }
        }
        // Nothing downstream depends on this query, so its failure does not
        // short-circuit.
        Err(e) => errors.push(format!("Could not fetch latest release for {repo}: {e}")),
    }

    errors
}

/// True when the manifest's vendor namespace carries a non-empty category.
fn has_vendor_category(manifest: &serde_json::Value) -> bool {
    manifest
        .get("nuclear")
        .and_then(|n| n.get("category"))
        .and_then(|c| c.as_str())
        .is_some_and(|c| !c.is_empty())
}
