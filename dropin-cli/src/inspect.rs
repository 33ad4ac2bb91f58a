//! Binds a described page and reports the resulting widget options.

use std::sync::Arc;

use dropin::authorization::Authorization;
use dropin::dom::{MemoryDocument, NodeId};
use dropin::locale::TranslationRegistry;
use dropin::payment_options::PaymentOption;
use dropin::{Configuration, ScriptTagIntegration};
use serde::Serialize;

use crate::config::PageConfig;
use crate::error::CliError;

/// What the widget would be created with for a page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    /// Id of the mounted container element.
    pub container_id: String,
    /// Configuration passed to the widget factory.
    pub configuration: Configuration,
    /// Descriptor derived from the authorization attribute.
    pub authorization: Authorization,
    /// Locale the widget would display.
    pub locale: String,
    /// Payment options in display order.
    pub payment_options: Vec<PaymentOption>,
}

fn attributes(map: &std::collections::BTreeMap<String, String>) -> Vec<(&str, &str)> {
    map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

/// Builds the page in memory, returning the document and its script tag.
fn build_page(page: &PageConfig) -> (Arc<MemoryDocument>, NodeId) {
    let doc = Arc::new(MemoryDocument::new());
    let body = doc.element(doc.root(), "body", &[]);
    let form = doc.element(body, "form", &attributes(&page.form));
    let parent = if page.inside_form { form } else { body };
    let script = doc.element(parent, "script", &attributes(&page.script));
    (doc, script)
}

/// Binds `page` and derives the report.
///
/// # Errors
///
/// Returns an error if the page has no script tag, the bridge rejects it, or
/// the resulting configuration is not valid widget options.
pub fn inspect(page: &PageConfig) -> Result<InspectReport, CliError> {
    if page.script.is_empty() {
        return Err(CliError::NoScript);
    }

    let (doc, script) = build_page(page);
    let binding = ScriptTagIntegration::new(doc)
        .bind(Some(&script))?
        .ok_or(CliError::NoScript)?;

    let configuration = binding.configuration().clone();
    let options = configuration.to_options()?;
    let authorization = options.parse_authorization()?;
    let payment_options = options.payment_options()?;
    let locale = TranslationRegistry::supported()
        .resolve_locale(options.locale.as_deref())
        .to_owned();

    tracing::debug!(
        container = binding.container_id(),
        auth_type = %authorization.auth_type,
        %locale,
        "Inspected page"
    );

    Ok(InspectReport {
        container_id: binding.container_id().to_owned(),
        configuration,
        authorization,
        locale,
        payment_options,
    })
}
