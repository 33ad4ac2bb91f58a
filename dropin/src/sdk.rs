//! Contracts of the external payment SDK.
//!
//! Tokenization, hosted fields and wallet popups live in the payment SDK.
//! The bridge only needs to create a widget instance and ask it for a payment
//! method, which these two traits describe.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Configuration;
pub use crate::error::{PaymentMethodError, SdkError};

/// A pinned, boxed, `Send` future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of a successful payment method request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodPayload {
    /// Single-use token representing the payment method.
    pub nonce: String,
    /// Fraud-detection data, when the flow collected any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_data: Option<String>,
}

impl PaymentMethodPayload {
    /// Creates a payload without device data.
    #[must_use]
    pub fn new(nonce: impl Into<String>) -> Self {
        Self {
            nonce: nonce.into(),
            device_data: None,
        }
    }

    /// Sets the device data.
    #[must_use]
    pub fn with_device_data(mut self, device_data: impl Into<String>) -> Self {
        self.device_data = Some(device_data.into());
        self
    }
}

/// A created widget instance.
pub trait DropinInstance: Send + Sync {
    /// Requests a payment method from whatever the customer entered.
    fn request_payment_method(&self) -> BoxFuture<'_, Result<PaymentMethodPayload, PaymentMethodError>>;
}

/// Creates widget instances from a [`Configuration`].
pub trait DropinFactory: Send + Sync {
    /// Creates and mounts a widget instance.
    fn create(&self, options: Configuration) -> BoxFuture<'_, Result<Arc<dyn DropinInstance>, SdkError>>;
}
