//! Error types for the CLI.

use dropin::authorization::AuthorizationError;
use dropin::{IntegrationError, OptionsError};

/// Errors surfaced by the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The page description could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the page description.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The page description is not valid TOML for [`crate::PageConfig`].
    #[error("invalid page description: {0}")]
    Parse(#[from] toml::de::Error),

    /// The described page has no script tag.
    #[error("page description has no [script] attributes")]
    NoScript,

    /// Binding the script tag failed.
    #[error(transparent)]
    Integration(#[from] IntegrationError),

    /// The authorization string could not be parsed.
    #[error("invalid authorization: {0}")]
    Authorization(#[from] AuthorizationError),

    /// The configuration does not form valid widget options.
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// Report serialization failed.
    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}
