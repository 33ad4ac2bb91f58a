#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types and script-tag integration for the drop-in checkout widget.
//!
//! The drop-in is an embeddable checkout UI. Tokenization, hosted card fields
//! and wallet popups belong to the external payment SDK; this crate holds the
//! parts that sit around it: reading the merchant's authorization, turning
//! script-tag attributes into widget options, choosing a locale, ordering
//! payment options, routing error notifications between UI components, and
//! wiring a host form to the SDK so the resulting nonce is posted with it.
//!
//! # Modules
//!
//! - [`authorization`] - Tokenization key / client token classification
//! - [`camel`] - Attribute-name case conversion
//! - [`config`] - Widget configuration object and typed options
//! - [`dom`] - Document abstraction and in-memory implementation
//! - [`encoding`] - Base64 helpers
//! - [`error`] - Error types
//! - [`events`] - Error notification channel
//! - [`locale`] - Locale selection and translation lookup
//! - [`payment_options`] - Payment options and their priority
//! - [`script_tag`] - Script-tag form integration
//! - [`sdk`] - Contracts of the external payment SDK
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation of the form integration

pub mod authorization;
pub mod camel;
pub mod config;
pub mod dom;
pub mod encoding;
pub mod error;
pub mod events;
pub mod locale;
pub mod payment_options;
pub mod script_tag;
pub mod sdk;

pub use authorization::{AuthType, Authorization, parse_authorization};
pub use config::{Configuration, DropinOptions};
pub use error::{IntegrationError, OptionsError, PaymentMethodError, SdkError};
pub use events::ErrorChannel;
pub use script_tag::ScriptTagIntegration;

/// Version of this crate, reported to the payment SDK as the widget version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
