//! Authorization string classification.
//!
//! The widget is initialized with one opaque authorization string, which is
//! either a tokenization key (`<environment>_<id>_<merchant>`) or a base64
//! encoded JSON client token. [`parse_authorization`] tells them apart and
//! extracts the fields the widget needs before talking to the payment SDK.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::encoding::Base64Text;

static TOKENIZATION_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]+_[A-Za-z0-9]+_[A-Za-z0-9_]+$").expect("valid tokenization key regex")
});

/// Kind of credential carried by an authorization string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthType {
    /// Long-lived, non-customer-specific key.
    TokenizationKey,
    /// Short-lived base64 JSON token, possibly bound to a customer.
    ClientToken,
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TokenizationKey => "TOKENIZATION_KEY",
            Self::ClientToken => "CLIENT_TOKEN",
        })
    }
}

/// Parsed authorization descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    /// Credential kind.
    pub auth_type: AuthType,
    /// Gateway environment, e.g. `"sandbox"` or `"production"`.
    pub environment: String,
    /// Whether the credential carries customer context.
    pub has_customer: bool,
}

impl Authorization {
    /// Returns `true` when no customer is attached, so vaulted methods are
    /// unavailable.
    #[must_use]
    pub const fn is_guest_checkout(&self) -> bool {
        !self.has_customer
    }
}

impl FromStr for Authorization {
    type Err = AuthorizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_authorization(s)
    }
}

/// Failure to interpret a client token.
#[derive(Debug, thiserror::Error)]
pub enum AuthorizationError {
    /// The client token is not valid base64.
    #[error("Client token is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    /// The decoded client token is not a JSON object.
    #[error("Client token is not a valid JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Claims read from a decoded client token. Other fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientTokenClaims {
    #[serde(default)]
    environment: Value,
    #[serde(default)]
    has_customer: Value,
}

/// Classifies and parses an authorization string.
///
/// # Errors
///
/// Returns an error if the string is not a tokenization key and cannot be
/// decoded as a base64 JSON client token.
pub fn parse_authorization(authorization: &str) -> Result<Authorization, AuthorizationError> {
    if TOKENIZATION_KEY.is_match(authorization) {
        let environment = authorization
            .split_once('_')
            .map_or(authorization, |(env, _)| env);
        return Ok(Authorization {
            auth_type: AuthType::TokenizationKey,
            environment: environment.to_owned(),
            has_customer: false,
        });
    }

    let decoded = Base64Text::from(authorization).decode()?;
    let claims: ClientTokenClaims = serde_json::from_slice(&decoded)?;
    Ok(Authorization {
        auth_type: AuthType::ClientToken,
        environment: match claims.environment {
            Value::String(environment) => environment,
            Value::Null => String::new(),
            other => other.to_string(),
        },
        has_customer: is_truthy(&claims.has_customer),
    })
}

/// Truthiness of a JSON value as a browser script would judge it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
