//! Structural validation of the registry document.
//!
//! Combines JSON Schema validation with a duplicate-identifier check the
//! schema format cannot express. Issues are collected, never thrown: the
//! caller decides how to report them.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::errors::{PlugregError, Result};

/// A single validation finding: a message plus an optional document pointer.
///
/// Cross-entry findings (like duplicate identifiers) carry no pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub message: String,
    pub pointer: Option<String>,
}

impl ValidationIssue {
    /// A finding tied to a location within the document.
    pub fn at(message: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            pointer: Some(pointer.into()),
        }
    }

    /// A synthesized finding with no document location.
    pub fn global(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            pointer: None,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pointer {
            Some(p) => write!(f, "{} (at {})", self.message, p),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Read and parse a JSON document, attaching the document role and path to
/// any failure. Both failures are fatal for the caller.
pub fn load_json(path: &Path, what: &str) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path).map_err(|e| PlugregError::Document {
        message: format!("Failed to load {what} from {}: {e}", path.display()),
    })?;
    serde_json::from_str(&content).map_err(|e| PlugregError::Document {
        message: format!("Failed to load {what} from {}: {e}", path.display()),
    })
}

/// Validate the registry document against a JSON Schema.
///
/// Returns one issue per violated constraint. The validator's instance
/// pointer is used as the location; when it is empty (root), `/` is
/// reported instead.
///
/// # Errors
///
/// Returns an error if the schema document itself cannot be compiled.
pub fn schema_issues(
    schema: &serde_json::Value,
    registry: &serde_json::Value,
) -> Result<Vec<ValidationIssue>> {
    let validator = jsonschema::validator_for(schema).map_err(|e| PlugregError::Document {
        message: format!("Invalid schema document: {e}"),
    })?;

    Ok(validator
        .iter_errors(registry)
        .map(|err| {
            let pointer = err.instance_path.to_string();
            let pointer = if pointer.is_empty() {
                "/".to_string()
            } else {
                pointer
            };
            ValidationIssue::at(err.to_string(), pointer)
        })
        .collect())
}

/// Identifiers of all plugin entries in the raw registry document, in
/// document order.
///
/// Works on the untyped document so the uniqueness scan runs even when
/// entries do not match the typed model; the schema is opaque here and may
/// be laxer than the model. Entries without a string `id` are skipped (the
/// schema check reports those separately).
pub fn plugin_ids(registry: &serde_json::Value) -> Vec<String> {
    registry
        .get("plugins")
        .and_then(|p| p.as_array())
        .map(|plugins| {
            plugins
                .iter()
                .filter_map(|p| p.get("id").and_then(|id| id.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Find identifiers that appear more than once, each reported exactly once.
///
/// Single pass with a seen-set; the returned order is first-detection order
/// but callers must not rely on it.
pub fn duplicate_ids(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for id in ids {
        if !seen.insert(id.as_str()) && !duplicates.contains(id) {
            duplicates.push(id.clone());
        }
    }
    duplicates
}
