//! Page description.
//!
//! A page is described in TOML as the attributes of its form and of the
//! drop-in script tag. String values may reference environment variables with
//! `$VAR` or `${VAR}`, which keeps authorization strings out of the file.
//!
//! # Example
//!
//! ```toml
//! [form]
//! action = "/checkout"
//! method = "post"
//!
//! [script]
//! "data-braintree-dropin-authorization" = "$DROPIN_AUTHORIZATION"
//! "data-locale" = "fr_CA"
//! "data-paypal.flow" = "checkout"
//! "data-paypal.amount" = "10.00"
//! "data-paypal.currency" = "USD"
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to the page description (default: `dropin.toml`)
//! - Any variable referenced by `$VAR` in the file

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Default page description path.
pub const DEFAULT_CONFIG_PATH: &str = "dropin.toml";

/// A merchant page holding one drop-in script tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Attributes of the enclosing form.
    #[serde(default)]
    pub form: BTreeMap<String, String>,

    /// Attributes of the script tag.
    #[serde(default)]
    pub script: BTreeMap<String, String>,

    /// Places the script tag outside the form when `false`.
    #[serde(default = "default_inside_form")]
    pub inside_form: bool,
}

const fn default_inside_form() -> bool {
    true
}

impl PageConfig {
    /// Loads a page description from `path`, expanding environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses a page description, expanding environment variables first.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Parse`] if the expanded text is not a valid page.
    pub fn parse(content: &str) -> Result<Self, CliError> {
        let expanded = expand_env_vars(content, |name| std::env::var(name).ok());
        Ok(toml::from_str(&expanded)?)
    }
}

/// Expands `$VAR` and `${VAR}` using `lookup`.
///
/// Unresolved references are kept verbatim. A `$` not followed by a name is
/// kept as well.
fn expand_env_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(body) = after.strip_prefix('{') {
            match body.find('}') {
                Some(end) => (&body[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        let reference = &rest[pos..pos + 1 + consumed];
        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => out.push_str(&value),
            None if name.is_empty() => out.push('$'),
            None => out.push_str(reference),
        }
        rest = if name.is_empty() {
            after
        } else {
            &rest[pos + 1 + consumed..]
        };
    }

    out.push_str(rest);
    out
}
