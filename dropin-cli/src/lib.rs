//! Developer tooling for the drop-in script-tag integration.
//!
//! Describes a merchant page in TOML, binds it with the same bridge the
//! browser uses and reports what the widget would be created with.
//!
//! # Modules
//!
//! - [`config`] - Page description with environment variable expansion
//! - [`error`] - CLI error types
//! - [`inspect`] - Binds a described page and builds the report

pub mod config;
pub mod error;
pub mod inspect;

pub use config::PageConfig;
pub use error::CliError;
pub use inspect::{InspectReport, inspect};
