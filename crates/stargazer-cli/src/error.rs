//! Error types for the `stargazer` binary.
//!
//! [`CliError`] wraps every failure that can stop a command. Exploration
//! rejections are not errors here: they are reported to the player and the
//! command still succeeds.

/// Top-level error for the `stargazer` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: stargazer_core::ConfigError,
    },

    /// The built-in catalog is invalid.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: stargazer_core::CatalogError,
    },

    /// Saving or discarding the game failed.
    #[error("persistence error: {source}")]
    Persistence {
        /// The underlying persistence error.
        #[from]
        source: stargazer_core::PersistenceError,
    },

    /// Reading input or writing output failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Encoding JSON output failed.
    #[error("JSON error: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// Logging could not be initialized.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
