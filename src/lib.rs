pub mod checker;
pub mod diff;
pub mod errors;
pub mod host;
pub mod models;
pub mod validator;

// Re-export key types at crate root for convenience.
pub use checker::check_repo;
pub use diff::{base_branch_from_env, changed_repos, new_repos};
pub use errors::{PlugregError, Result};
pub use host::{GitHub, HostProvider};
pub use models::{Plugin, PluginRegistry};
pub use validator::{duplicate_ids, load_json, plugin_ids, schema_issues, ValidationIssue};
