use serde::{Deserialize, Serialize};

/// A single entry in the plugin registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub id: String,
    pub description: String,
    pub author: String,

    /// Source repository reference of the form `owner/name`.
    pub repo: String,

    pub category: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(rename = "addedAt")]
    pub added_at: String,
}

/// The registry document: an ordered list of plugin entries.
///
/// Loaded fresh per invocation and never written back. The `plugins` array
/// order is the document's own order and survives a parse/serialize round
/// trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginRegistry {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    pub plugins: Vec<Plugin>,
}
