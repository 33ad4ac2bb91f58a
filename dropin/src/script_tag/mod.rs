//! Script-tag integration.
//!
//! A merchant page can embed the widget without writing any code:
//!
//! ```html
//! <form action="/checkout" method="post">
//!   <script src="dropin.js"
//!           data-braintree-dropin-authorization="sandbox_abc_123"
//!           data-paypal.flow="checkout"
//!           data-paypal.amount="10.00"></script>
//!   <input type="submit" value="Purchase">
//! </form>
//! ```
//!
//! [`ScriptTagIntegration::bind`] reads the script tag, mounts a container
//! before it and stops the enclosing form from submitting on its own. Once
//! [`FormBinding::create`] has a widget instance, each submit requests a
//! payment method, writes the nonce (and device data, when present) into
//! hidden inputs and submits the form natively.
//!
//! A failed payment method request leaves the form unsubmitted; the customer
//! fixes the input and submits again. Submits arriving while a request is
//! still pending are ignored.

mod attributes;

pub use attributes::*;

use std::fmt::{self, Debug};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use uuid::Uuid;

use crate::config::Configuration;
use crate::dom::{Document, SubmitEvent, SubmitListener, find_parent_form, upsert_hidden_input};
use crate::error::{IntegrationError, SdkError};
use crate::events::ErrorChannel;
use crate::sdk::{BoxFuture, DropinFactory, DropinInstance, PaymentMethodPayload};

/// Prefix of the container element id.
pub const CONTAINER_ID_PREFIX: &str = "braintree-dropin-";

/// Hidden input receiving the payment method nonce.
pub const NONCE_INPUT_NAME: &str = "payment_method_nonce";

/// Hidden input receiving device data.
pub const DEVICE_DATA_INPUT_NAME: &str = "device_data";

/// Entry point of the script-tag integration.
#[derive(Debug)]
pub struct ScriptTagIntegration<D: Document> {
    document: Arc<D>,
    errors: Option<ErrorChannel>,
}

impl<D: Document> ScriptTagIntegration<D> {
    /// Creates an integration over `document`.
    #[must_use]
    pub const fn new(document: Arc<D>) -> Self {
        Self {
            document,
            errors: None,
        }
    }

    /// Reports payment method request failures on `channel`, and clears it
    /// on success.
    #[must_use]
    pub fn with_error_channel(mut self, channel: ErrorChannel) -> Self {
        self.errors = Some(channel);
        self
    }

    /// Binds the form enclosing `script`.
    ///
    /// Returns `Ok(None)` without touching the document when there is no
    /// script tag. Otherwise mounts the container, blocks native submission
    /// and assembles the configuration for [`FormBinding::create`].
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::MissingAuthorization`] if the script tag
    /// has no authorization attribute and [`IntegrationError::FormNotFound`]
    /// if it is not inside a form. The document is unchanged in both cases.
    pub fn bind(
        &self,
        script: Option<&D::Element>,
    ) -> Result<Option<FormBinding<D>>, IntegrationError> {
        let Some(script) = script else {
            return Ok(None);
        };
        let document = &*self.document;

        let authorization = document.attribute(script, AUTHORIZATION_ATTRIBUTE).ok_or(
            IntegrationError::MissingAuthorization {
                attribute: AUTHORIZATION_ATTRIBUTE,
            },
        )?;
        let form = find_parent_form(document, script).ok_or(IntegrationError::FormNotFound)?;

        let container_id = format!("{CONTAINER_ID_PREFIX}{}", Uuid::new_v4());
        let container = document.create_element("div");
        document.set_attribute(&container, "id", &container_id);

        document.add_submit_listener(&form, prevent_default_listener());

        if let Some(parent) = document.parent(script) {
            document.insert_before(&parent, &container, script);
        }

        let mut configuration = Configuration::new();
        configuration.insert("authorization", Value::String(authorization));
        configuration.insert("container", Value::String(format!("#{container_id}")));
        apply_attributes(document, script, &mut configuration);

        #[cfg(feature = "telemetry")]
        tracing::info!(
            container = %container_id,
            keys = configuration.len(),
            "Bound script tag integration"
        );

        Ok(Some(FormBinding {
            document: Arc::clone(&self.document),
            form,
            container,
            container_id,
            configuration,
            errors: self.errors.clone(),
        }))
    }
}

fn prevent_default_listener() -> SubmitListener {
    Arc::new(|event: &SubmitEvent| -> BoxFuture<'static, ()> {
        event.prevent_default();
        Box::pin(async {})
    })
}

/// A form bound to the integration, waiting for its widget instance.
pub struct FormBinding<D: Document> {
    document: Arc<D>,
    form: D::Element,
    container: D::Element,
    container_id: String,
    configuration: Configuration,
    errors: Option<ErrorChannel>,
}

impl<D: Document> Debug for FormBinding<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormBinding")
            .field("form", &self.form)
            .field("container_id", &self.container_id)
            .field("configuration", &self.configuration)
            .finish_non_exhaustive()
    }
}

impl<D: Document> FormBinding<D> {
    /// The enclosing form.
    #[must_use]
    pub const fn form(&self) -> &D::Element {
        &self.form
    }

    /// The container element mounted before the script tag.
    #[must_use]
    pub const fn container(&self) -> &D::Element {
        &self.container
    }

    /// The container element's id.
    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// The configuration that [`Self::create`] passes to the factory.
    #[must_use]
    pub const fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Creates the widget instance and starts handling form submission.
    ///
    /// # Errors
    ///
    /// Returns the factory's error unchanged. The form stays blocked from
    /// submitting in that case.
    pub async fn create<F>(self, factory: &F) -> Result<ReadyForm<D>, SdkError>
    where
        F: DropinFactory + ?Sized,
    {
        let instance = match factory.create(self.configuration).await {
            Ok(instance) => instance,
            Err(err) => {
                #[cfg(feature = "telemetry")]
                tracing::error!(error = %err, "Drop-in creation failed");
                return Err(err);
            }
        };

        let in_flight = Arc::new(AtomicBool::new(false));
        self.document.add_submit_listener(
            &self.form,
            request_payment_method_listener(
                Arc::clone(&self.document),
                self.form.clone(),
                Arc::clone(&instance),
                Arc::clone(&in_flight),
                self.errors,
            ),
        );

        #[cfg(feature = "telemetry")]
        tracing::debug!(container = %self.container_id, "Drop-in instance ready");

        Ok(ReadyForm {
            form: self.form,
            container_id: self.container_id,
            instance,
            in_flight,
        })
    }
}

/// A bound form with a live widget instance.
pub struct ReadyForm<D: Document> {
    form: D::Element,
    container_id: String,
    instance: Arc<dyn DropinInstance>,
    in_flight: Arc<AtomicBool>,
}

impl<D: Document> Debug for ReadyForm<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadyForm")
            .field("form", &self.form)
            .field("container_id", &self.container_id)
            .field("submitting", &self.is_submitting())
            .finish_non_exhaustive()
    }
}

impl<D: Document> ReadyForm<D> {
    /// The enclosing form.
    #[must_use]
    pub const fn form(&self) -> &D::Element {
        &self.form
    }

    /// The container element's id.
    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// The widget instance.
    #[must_use]
    pub fn instance(&self) -> &Arc<dyn DropinInstance> {
        &self.instance
    }

    /// Returns `true` while a payment method request is pending.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}

fn request_payment_method_listener<D: Document>(
    document: Arc<D>,
    form: D::Element,
    instance: Arc<dyn DropinInstance>,
    in_flight: Arc<AtomicBool>,
    errors: Option<ErrorChannel>,
) -> SubmitListener {
    Arc::new(move |_event: &SubmitEvent| -> BoxFuture<'static, ()> {
        if in_flight.swap(true, Ordering::SeqCst) {
            #[cfg(feature = "telemetry")]
            tracing::debug!("Ignoring submit while a payment method request is pending");
            return Box::pin(async {});
        }

        let document = Arc::clone(&document);
        let form = form.clone();
        let instance = Arc::clone(&instance);
        let guard = InFlightGuard(Arc::clone(&in_flight));
        let errors = errors.clone();
        Box::pin(async move {
            let _guard = guard;
            match instance.request_payment_method().await {
                Ok(payload) => {
                    if let Some(errors) = &errors {
                        errors.clear();
                    }
                    inject_payload(&*document, &form, &payload);
                    document.submit(&form);
                }
                Err(err) => {
                    #[cfg(feature = "telemetry")]
                    tracing::warn!(code = %err.code, "Payment method request failed");
                    if let Some(errors) = &errors {
                        errors.report(err.code);
                    }
                }
            }
        })
    })
}

/// Clears the in-flight flag when the request finishes or is dropped.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Writes the nonce and, when present, the device data into hidden inputs.
fn inject_payload<D: Document + ?Sized>(
    document: &D,
    form: &D::Element,
    payload: &PaymentMethodPayload,
) {
    upsert_hidden_input(document, form, NONCE_INPUT_NAME, &payload.nonce);
    if let Some(device_data) = &payload.device_data {
        upsert_hidden_input(document, form, DEVICE_DATA_INPUT_NAME, device_data);
    }
}
