//! Widget configuration.
//!
//! [`Configuration`] is the loosely-typed options object handed to the
//! payment SDK's creation call. It is assembled from script-tag attributes,
//! where composite keys such as `paypal.amount` become nested objects.
//! [`DropinOptions`] is the typed view SDK implementations read it through.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::authorization::{Authorization, AuthorizationError, parse_authorization};
use crate::camel::kebab_to_camel;
use crate::error::OptionsError;
use crate::payment_options::{PaymentOption, payment_option_priority};

/// Options object passed to the payment SDK.
///
/// # Example
///
/// ```rust
/// use dropin::config::Configuration;
/// use serde_json::json;
///
/// let mut config = Configuration::new();
/// config.insert_composite("paypal-credit.flow", json!("checkout"));
/// assert_eq!(config.get_path(&["paypalCredit", "flow"]), Some(&json!("checkout")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration(Map<String, Value>);

impl Configuration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a top-level key, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Sets a value under a dotted, kebab-cased key.
    ///
    /// Each dot-separated segment is camel-cased and intermediate objects are
    /// created on first use, so `paypal-credit.amount` lands at
    /// `paypalCredit.amount`.
    pub fn insert_composite(&mut self, key: &str, value: Value) {
        let path: Vec<String> = key.split('.').map(kebab_to_camel).collect();
        self.insert_path(&path, value);
    }

    /// Sets a value under an already camel-cased path.
    ///
    /// A non-object value found where an intermediate object is needed is
    /// replaced by an empty object.
    pub fn insert_path<S: AsRef<str>>(&mut self, path: &[S], value: Value) {
        insert_into(&mut self.0, path, value);
    }

    /// Returns a top-level value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value at a nested path.
    #[must_use]
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.0.get(first.as_ref())?, |value, key| {
                value.get(key.as_ref())
            })
    }

    /// Returns the number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Converts into a JSON object value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Deserializes into typed options.
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing or a value has the wrong
    /// shape.
    pub fn to_options(&self) -> Result<DropinOptions, OptionsError> {
        Ok(DropinOptions::deserialize(Value::Object(self.0.clone()))?)
    }
}

impl From<Map<String, Value>> for Configuration {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn insert_into<S: AsRef<str>>(map: &mut Map<String, Value>, path: &[S], value: Value) {
    match path {
        [] => {}
        [last] => {
            map.insert(last.as_ref().to_owned(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry(head.as_ref().to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_into(child, rest, value);
            }
        }
    }
}

/// Decodes an attribute value, preferring its JSON reading.
///
/// `"true"`, `"10.00"` and `'["card","paypal"]'` become JSON values; text that
/// is not valid JSON, such as `"en_US"`, is kept as a string.
#[must_use]
pub fn decode_attribute_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

/// `PayPal` flow requested by the merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaypalFlow {
    /// One-time checkout.
    Checkout,
    /// Save the account for later use.
    Vault,
}

/// `paypal` / `paypalCredit` options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaypalOptions {
    /// Requested flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<PaypalFlow>,
    /// Transaction amount, from a JSON number or numeric string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Typed view of a [`Configuration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropinOptions {
    /// Tokenization key or client token.
    pub authorization: String,
    /// Selector of the element the widget mounts into.
    pub container: String,
    /// Requested locale code. Booleans and numbers are read as their JSON
    /// text; `null` reads as absent.
    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub locale: Option<String>,
    /// Raw `paymentOptionPriority`; see [`Self::payment_options`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_option_priority: Option<Value>,
    /// `PayPal` options. Absent disables `PayPal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paypal: Option<PaypalOptions>,
    /// `PayPal` Credit options. Absent disables `PayPal` Credit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paypal_credit: Option<PaypalOptions>,
}

fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

impl DropinOptions {
    /// Parses the authorization string.
    ///
    /// # Errors
    ///
    /// Returns an error if the authorization is a malformed client token.
    pub fn parse_authorization(&self) -> Result<Authorization, AuthorizationError> {
        parse_authorization(&self.authorization)
    }

    /// Returns the validated payment option order.
    ///
    /// # Errors
    ///
    /// See [`payment_option_priority`].
    pub fn payment_options(&self) -> Result<Vec<PaymentOption>, OptionsError> {
        payment_option_priority(self.payment_option_priority.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_composite_builds_nested_objects() {
        let mut config = Configuration::new();
        config.insert_composite("paypal.flow", json!("checkout"));
        config.insert_composite("paypal.amount", json!(10.0));
        config.insert_composite("paypal-credit.currency", json!("USD"));

        assert_eq!(
            config.into_value(),
            json!({
                "paypal": {"flow": "checkout", "amount": 10.0},
                "paypalCredit": {"currency": "USD"},
            })
        );
    }

    #[test]
    fn test_insert_composite_camel_cases_every_segment() {
        let mut config = Configuration::new();
        config.insert_composite("payment-option-priority", json!(["card"]));
        config.insert_composite("apple-pay.payment-request.total-label", json!("Shop"));

        assert_eq!(config.get("paymentOptionPriority"), Some(&json!(["card"])));
        assert_eq!(
            config.get_path(&["applePay", "paymentRequest", "totalLabel"]),
            Some(&json!("Shop"))
        );
    }

    #[test]
    fn test_insert_path_replaces_scalar_parent() {
        let mut config = Configuration::new();
        config.insert("paypal", json!(true));
        config.insert_path(&["paypal", "flow"], json!("vault"));
        assert_eq!(config.get("paypal"), Some(&json!({"flow": "vault"})));
    }

    #[test]
    fn test_top_level_key_is_overwritten() {
        let mut config = Configuration::new();
        config.insert("locale", json!("en_US"));
        assert_eq!(config.insert("locale", json!("fr_FR")), Some(json!("en_US")));
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn test_get_path_misses() {
        let config = Configuration::new();
        assert_eq!(config.get_path::<&str>(&[]), None);
        assert_eq!(config.get_path(&["paypal", "flow"]), None);
    }

    #[test]
    fn test_decode_attribute_value() {
        assert_eq!(decode_attribute_value("true"), json!(true));
        assert_eq!(decode_attribute_value("10.00"), json!(10.0));
        assert_eq!(decode_attribute_value(r#"["card","paypal"]"#), json!(["card", "paypal"]));
        assert_eq!(decode_attribute_value("en_US"), json!("en_US"));
        assert_eq!(decode_attribute_value("checkout"), json!("checkout"));
        assert_eq!(decode_attribute_value(""), json!(""));
    }

    #[test]
    fn test_to_options() {
        let mut config = Configuration::new();
        config.insert("authorization", json!("sandbox_abc_123"));
        config.insert("container", json!("#braintree-dropin-x"));
        config.insert("locale", json!("fr_FR"));
        config.insert("paymentOptionPriority", json!(["paypal", "card"]));
        config.insert_composite("paypal.flow", json!("checkout"));
        config.insert_composite("paypal.amount", json!(10.0));
        config.insert_composite("paypal.currency", json!("EUR"));
        config.insert_composite("paypal-credit.amount", json!("25.50"));

        let options = config.to_options().unwrap();
        assert_eq!(options.locale.as_deref(), Some("fr_FR"));
        let paypal = options.paypal.as_ref().unwrap();
        assert_eq!(paypal.flow, Some(PaypalFlow::Checkout));
        assert_eq!(paypal.amount, Some(Decimal::new(1000, 2)));
        assert_eq!(paypal.currency.as_deref(), Some("EUR"));
        assert_eq!(
            options.paypal_credit.as_ref().unwrap().amount,
            Some(Decimal::new(2550, 2))
        );
        assert_eq!(
            options.payment_options().unwrap(),
            vec![PaymentOption::Paypal, PaymentOption::Card]
        );
        assert_eq!(options.parse_authorization().unwrap().environment, "sandbox");
    }

    #[test]
    fn test_to_options_requires_authorization() {
        let mut config = Configuration::new();
        config.insert("container", json!("#c"));
        assert!(matches!(config.to_options(), Err(OptionsError::Json(_))));
    }

    #[test]
    fn test_to_options_rejects_unknown_flow() {
        let mut config = Configuration::new();
        config.insert("authorization", json!("sandbox_abc_123"));
        config.insert("container", json!("#c"));
        config.insert_composite("paypal.flow", json!("subscribe"));
        assert!(config.to_options().is_err());
    }

    #[test]
    fn test_to_options_reads_json_decoded_locale() {
        let mut config = Configuration::new();
        config.insert("authorization", json!("sandbox_abc_123"));
        config.insert("container", json!("#c"));

        config.insert("locale", decode_attribute_value("null"));
        assert_eq!(config.to_options().unwrap().locale, None);

        config.insert("locale", decode_attribute_value("true"));
        assert_eq!(config.to_options().unwrap().locale.as_deref(), Some("true"));

        config.insert("locale", decode_attribute_value("es_ES"));
        assert_eq!(config.to_options().unwrap().locale.as_deref(), Some("es_ES"));
    }
}
