//! Error types for the drop-in integration.

use std::fmt;

/// Fatal precondition failures of the script-tag integration.
///
/// Both are raised before the document is modified; the host page has to fix
/// its markup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrationError {
    /// The script element has no authorization attribute.
    #[error("Authorization not found in {attribute} attribute")]
    MissingAuthorization {
        /// Name of the attribute that was looked up.
        attribute: &'static str,
    },

    /// The script element is not inside a form.
    #[error("No form found for script tag integration.")]
    FormNotFound,
}

/// Invalid widget options.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// `paymentOptionPriority` was given but is not an array.
    #[error("paymentOptionPriority must be an array.")]
    NotAnArray,

    /// `paymentOptionPriority` names an unknown option.
    #[error("paymentOptionPriority: Invalid payment option specified.")]
    InvalidOption,

    /// No payment option is left to render.
    #[error("No valid payment options available.")]
    NoOptionsAvailable,

    /// The configuration does not deserialize into typed options.
    #[error("Invalid drop-in options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure returned by the payment SDK when requesting a payment method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodError {
    /// Machine-readable code, reported on the error channel.
    pub code: String,
    /// Human-readable message.
    pub message: Option<String>,
}

impl PaymentMethodError {
    /// Creates a new error with the given code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: None,
        }
    }

    /// Sets the human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for PaymentMethodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(msg) = &self.message {
            write!(f, "{}: {}", self.code, msg)
        } else {
            write!(f, "{}", self.code)
        }
    }
}

impl std::error::Error for PaymentMethodError {}

/// Boxed error returned by the payment SDK's creation call.
pub type SdkError = Box<dyn std::error::Error + Send + Sync>;
