//! Hosting-provider collaborator: repository metadata, file contents, and
//! release listings.
//!
//! `HostProvider` is the seam the checker runs against; `GitHub` implements
//! it over the REST API with `ureq`. Synchronous, not async — every query
//! runs to completion before the next begins, and none is retried.

use std::env;

use base64::Engine;
use serde::Deserialize;

use crate::errors::{PlugregError, Result};

/// Queries the checker needs from the hosting provider, per repository
/// reference (`owner/name`).
pub trait HostProvider {
    /// Numeric identifier of the repository; errors for missing, private,
    /// or unreachable repositories.
    fn repo_id(&self, repo: &str) -> Result<u64>;

    /// The repository's package manifest, decoded and parsed.
    fn manifest(&self, repo: &str) -> Result<serde_json::Value>;

    /// Number of published releases.
    fn release_count(&self, repo: &str) -> Result<usize>;

    /// Asset filenames attached to the most recent release.
    fn latest_release_assets(&self, repo: &str) -> Result<Vec<String>>;
}

const API_ROOT: &str = "https://api.github.com";

/// GitHub REST API client.
///
/// Reads `GITHUB_TOKEN` from the environment when present; CI is expected
/// to have credentials pre-configured.
pub struct GitHub {
    token: Option<String>,
}

impl GitHub {
    /// Create a client against the public API, picking up `GITHUB_TOKEN`
    /// from the environment.
    pub fn from_env() -> Self {
        Self {
            token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{API_ROOT}/{path}");
        let mut request = ureq::get(&url)
            .header("user-agent", "plugreg")
            .header("accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("authorization", &format!("Bearer {token}"));
        }

        let mut response = request.call().map_err(|e| PlugregError::Api {
            message: format!("GET {path} failed: {e}"),
        })?;

        response
            .body_mut()
            .read_json()
            .map_err(|e| PlugregError::Api {
                message: format!("GET {path} returned unexpected payload: {e}"),
            })
    }
}

#[derive(Deserialize)]
struct RepoResponse {
    id: u64,
}

#[derive(Deserialize)]
struct ContentResponse {
    content: String,
}

#[derive(Deserialize)]
struct ReleaseAsset {
    name: String,
}

#[derive(Deserialize)]
struct ReleaseResponse {
    #[serde(default)]
    assets: Vec<ReleaseAsset>,
}

impl HostProvider for GitHub {
    fn repo_id(&self, repo: &str) -> Result<u64> {
        let resp: RepoResponse = self.get_json(&format!("repos/{repo}"))?;
        Ok(resp.id)
    }

    fn manifest(&self, repo: &str) -> Result<serde_json::Value> {
        let resp: ContentResponse =
            self.get_json(&format!("repos/{repo}/contents/package.json"))?;
        let decoded = decode_content(&resp.content)?;
        serde_json::from_slice(&decoded).map_err(|e| PlugregError::Api {
            message: format!("package.json is not valid JSON: {e}"),
        })
    }

    fn release_count(&self, repo: &str) -> Result<usize> {
        let releases: Vec<serde_json::Value> = self.get_json(&format!("repos/{repo}/releases"))?;
        Ok(releases.len())
    }

    fn latest_release_assets(&self, repo: &str) -> Result<Vec<String>> {
        let resp: ReleaseResponse = self.get_json(&format!("repos/{repo}/releases/latest"))?;
        Ok(resp.assets.into_iter().map(|a| a.name).collect())
    }
}

/// Decode a base64 payload from the contents API. The API wraps encoded
/// content across lines, so whitespace is stripped first.
fn decode_content(content: &str) -> Result<Vec<u8>> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| PlugregError::Api {
            message: format!("invalid base64 content payload: {e}"),
        })
}
