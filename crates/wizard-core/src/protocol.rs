//! Answer submission protocol
//!
//! An answer is written into a copy of the current payload, the whole
//! document is sent back as an update, and the reply is classified. A
//! validation failure (status 400) is a rejection of this answer; anything
//! else that goes wrong is a protocol failure.

use serde_json::{json, Value};
use wizard_payload::{resolve_and_set, PathResolutionError};

use crate::error::ServiceError;
use crate::service::ConfigurationService;
use crate::types::{BasicFields, ConfigurationDocument, ConfigurationFields, ConfigurationId, ConfigurationRecord};

/// How the service answered an update
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Update stored; the record carries the new document
    Accepted(ConfigurationRecord),
    /// Service refused the value
    Rejected { detail: String },
    /// Request failed for another reason
    Failed(ServiceError),
}

/// Body of the initial create request
///
/// The service fills in payload and questions; the client sends an empty
/// document.
#[must_use]
pub fn create_request(fields: &BasicFields) -> ConfigurationFields {
    fields.to_request(json!({}))
}

/// Body of an update carrying `document` in full
///
/// # Errors
/// Returns [`ServiceError::InvalidRequest`] if the document cannot be encoded
pub fn update_request(
    fields: &BasicFields,
    document: &ConfigurationDocument,
) -> Result<ConfigurationFields, ServiceError> {
    let data = document
        .to_value()
        .map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;
    Ok(fields.to_request(data))
}

/// Copy of `document` with `value` written at `path`
///
/// `document` itself is never touched, so a rejected or failed submission
/// leaves the caller's copy as the last accepted state.
///
/// # Errors
/// Returns [`PathResolutionError`] if `path` does not fit the payload
pub fn patch_document(
    document: &ConfigurationDocument,
    path: &str,
    value: Value,
) -> Result<ConfigurationDocument, PathResolutionError> {
    let payload = resolve_and_set(document.payload.clone(), path, value)?;
    Ok(document.with_payload(payload))
}

/// Send an update and classify the reply
pub async fn submit<S>(
    service: &S,
    id: ConfigurationId,
    request: &ConfigurationFields,
) -> SubmissionOutcome
where
    S: ConfigurationService + ?Sized,
{
    match service.update_configuration(id, request).await {
        Ok(record) => {
            tracing::debug!(
                "Configuration {} accepted, {} question(s) remaining",
                id,
                record.configuration_data.questions.len()
            );
            SubmissionOutcome::Accepted(record)
        }
        Err(e) if e.is_validation_failure() => {
            tracing::info!("Configuration {} rejected: {}", id, e.detail());
            SubmissionOutcome::Rejected { detail: e.detail() }
        }
        Err(e) => {
            tracing::warn!("Configuration {} update failed: {}", id, e);
            SubmissionOutcome::Failed(e)
        }
    }
}
