use thiserror::Error;

/// Errors that can occur during registry operations.
///
/// Check violations are not represented here: they are accumulated into
/// per-entry message lists and surfaced in the final report instead of
/// being propagated.
#[derive(Error, Debug)]
pub enum PlugregError {
    /// A required JSON document could not be read or parsed.
    #[error("{message}")]
    Document { message: String },

    /// Required configuration is missing from the environment.
    #[error("{message}")]
    Config { message: String },

    /// A git subprocess failed.
    #[error("git error: {message}")]
    Git { message: String },

    /// A hosting-provider API call or payload decode failed.
    #[error("{message}")]
    Api { message: String },
}

/// Convenience alias for `Result<T, PlugregError>`.
pub type Result<T> = std::result::Result<T, PlugregError>;
