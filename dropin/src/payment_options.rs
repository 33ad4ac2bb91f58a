//! Payment options offered by the widget and their display priority.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OptionsError;

/// A payment option the widget can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentOption {
    /// Card entry through hosted fields.
    Card,
    /// `PayPal` checkout or vault flow.
    Paypal,
    /// `PayPal` Credit.
    PaypalCredit,
    /// Venmo app switch.
    Venmo,
    /// Apple Pay.
    ApplePay,
    /// Google Pay.
    GooglePay,
}

impl PaymentOption {
    /// Every option, in the default display order.
    pub const ALL: [Self; 6] = [
        Self::Card,
        Self::Paypal,
        Self::PaypalCredit,
        Self::Venmo,
        Self::ApplePay,
        Self::GooglePay,
    ];

    /// The option's configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Paypal => "paypal",
            Self::PaypalCredit => "paypalCredit",
            Self::Venmo => "venmo",
            Self::ApplePay => "applePay",
            Self::GooglePay => "googlePay",
        }
    }
}

impl fmt::Display for PaymentOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentOption {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or(OptionsError::InvalidOption)
    }
}

/// Validates a `paymentOptionPriority` value.
///
/// Absent means every option in default order. Duplicates are dropped,
/// keeping the first occurrence.
///
/// # Errors
///
/// Returns an error if the value is not an array, names an unknown option,
/// or is empty.
pub fn payment_option_priority(value: Option<&Value>) -> Result<Vec<PaymentOption>, OptionsError> {
    let Some(value) = value else {
        return Ok(PaymentOption::ALL.to_vec());
    };
    let entries = value.as_array().ok_or(OptionsError::NotAnArray)?;

    let mut priority = Vec::with_capacity(entries.len());
    for entry in entries {
        let option: PaymentOption = entry
            .as_str()
            .ok_or(OptionsError::InvalidOption)?
            .parse()?;
        if !priority.contains(&option) {
            priority.push(option);
        }
    }

    if priority.is_empty() {
        return Err(OptionsError::NoOptionsAvailable);
    }
    Ok(priority)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_priority_uses_default_order() {
        assert_eq!(
            payment_option_priority(None).unwrap(),
            PaymentOption::ALL.to_vec()
        );
    }

    #[test]
    fn test_priority_is_kept_and_deduplicated() {
        let value = json!(["paypal", "card", "paypal", "venmo"]);
        assert_eq!(
            payment_option_priority(Some(&value)).unwrap(),
            vec![
                PaymentOption::Paypal,
                PaymentOption::Card,
                PaymentOption::Venmo
            ]
        );
    }

    #[test]
    fn test_priority_must_be_an_array() {
        let err = payment_option_priority(Some(&json!("card"))).unwrap_err();
        assert!(matches!(err, OptionsError::NotAnArray));
        assert_eq!(err.to_string(), "paymentOptionPriority must be an array.");
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let err = payment_option_priority(Some(&json!(["card", "bitcoin"]))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "paymentOptionPriority: Invalid payment option specified."
        );
        assert!(matches!(
            payment_option_priority(Some(&json!([1]))),
            Err(OptionsError::InvalidOption)
        ));
    }

    #[test]
    fn test_empty_priority_is_rejected() {
        assert!(matches!(
            payment_option_priority(Some(&json!([]))),
            Err(OptionsError::NoOptionsAvailable)
        ));
    }

    #[test]
    fn test_option_names_round_trip_through_serde() {
        assert_eq!(
            serde_json::to_value(PaymentOption::PaypalCredit).unwrap(),
            json!("paypalCredit")
        );
        assert_eq!("applePay".parse::<PaymentOption>().unwrap(), PaymentOption::ApplePay);
    }
}
