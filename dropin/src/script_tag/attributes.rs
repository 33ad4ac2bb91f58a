//! Script-tag attributes understood by the integration.

use serde_json::Value;

use crate::config::{Configuration, decode_attribute_value};
use crate::dom::Document;

/// Attribute carrying the tokenization key or client token.
pub const AUTHORIZATION_ATTRIBUTE: &str = "data-braintree-dropin-authorization";

const DATA_PREFIX: &str = "data-";

/// How an attribute's text becomes a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoding {
    /// Kept as a string.
    Text,
    /// Parsed as JSON, falling back to the string when that fails.
    Json,
}

/// One optional attribute and where it lands in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    /// Full attribute name, e.g. `data-paypal.amount`.
    pub name: &'static str,
    /// Value decoding rule.
    pub decoding: Decoding,
}

impl AttributeSpec {
    const fn json(name: &'static str) -> Self {
        Self {
            name,
            decoding: Decoding::Json,
        }
    }

    /// The composite configuration key: the name without its `data-` prefix.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.name.strip_prefix(DATA_PREFIX).unwrap_or(self.name)
    }

    /// Decodes an attribute value according to [`Self::decoding`].
    #[must_use]
    pub fn decode(&self, raw: &str) -> Value {
        match self.decoding {
            Decoding::Text => Value::String(raw.to_owned()),
            Decoding::Json => decode_attribute_value(raw),
        }
    }
}

/// Optional attributes copied from the script tag into the configuration.
pub const ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::json("data-locale"),
    AttributeSpec::json("data-payment-option-priority"),
    AttributeSpec::json("data-paypal.amount"),
    AttributeSpec::json("data-paypal.currency"),
    AttributeSpec::json("data-paypal.flow"),
    AttributeSpec::json("data-paypal-credit.amount"),
    AttributeSpec::json("data-paypal-credit.currency"),
    AttributeSpec::json("data-paypal-credit.flow"),
];

/// Copies every present attribute of [`ATTRIBUTES`] from `script` into
/// `config`.
pub fn apply_attributes<D: Document + ?Sized>(
    document: &D,
    script: &D::Element,
    config: &mut Configuration,
) {
    for spec in ATTRIBUTES {
        if let Some(raw) = document.attribute(script, spec.name) {
            config.insert_composite(spec.key(), spec.decode(&raw));
        }
    }
}
