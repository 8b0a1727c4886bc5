//! HTTP implementation of [`ConfigurationService`]

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use wizard_core::{
    ConfigurationFields, ConfigurationId, ConfigurationRecord, ConfigurationService, HealthStatus,
    ServiceError,
};

use crate::config::ServiceConfig;

/// Longest raw body quoted in an error detail
const MAX_DETAIL_CHARS: usize = 200;

/// Configuration service reached over HTTP
///
/// Endpoints:
/// - `POST {base}/configurations/`
/// - `PUT {base}/configurations/{id}`
/// - `DELETE {base}/configurations/{id}`
/// - `GET {base}/health`
#[derive(Debug, Clone)]
pub struct HttpConfigurationService {
    http: Client,
    config: ServiceConfig,
}

impl HttpConfigurationService {
    /// Create a client for `config`
    ///
    /// # Errors
    /// Returns [`ServiceError::Transport`] if the HTTP client cannot be built
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn configuration_url(&self, id: ConfigurationId) -> String {
        self.config.url(&format!("/configurations/{id}"))
    }
}

#[async_trait::async_trait]
impl ConfigurationService for HttpConfigurationService {
    async fn create_configuration(
        &self,
        fields: &ConfigurationFields,
    ) -> Result<ConfigurationRecord, ServiceError> {
        let url = self.config.url("/configurations/");
        tracing::debug!("POST {}: {}", url, body_preview(fields));
        let response = self
            .http
            .post(&url)
            .json(fields)
            .send()
            .await
            .map_err(transport)?;
        read_record(response).await
    }

    async fn update_configuration(
        &self,
        id: ConfigurationId,
        fields: &ConfigurationFields,
    ) -> Result<ConfigurationRecord, ServiceError> {
        let url = self.configuration_url(id);
        tracing::debug!("PUT {}: {}", url, body_preview(fields));
        let response = self
            .http
            .put(&url)
            .json(fields)
            .send()
            .await
            .map_err(transport)?;
        read_record(response).await
    }

    async fn delete_configuration(&self, id: ConfigurationId) -> Result<(), ServiceError> {
        let url = self.configuration_url(id);
        tracing::debug!("DELETE {}", url);
        let response = self.http.delete(&url).send().await.map_err(transport)?;
        check_status(response).await.map(|_| ())
    }

    async fn health_check(&self) -> Result<HealthStatus, ServiceError> {
        let url = self.config.url("/health");
        tracing::debug!("GET {}", url);
        let response = self.http.get(&url).send().await.map_err(transport)?;
        read_json(check_status(response).await?).await
    }
}

/// Record as returned by the service, with or without an envelope
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordEnvelope {
    Wrapped { configuration: ConfigurationRecord },
    Bare(ConfigurationRecord),
}

impl From<RecordEnvelope> for ConfigurationRecord {
    fn from(envelope: RecordEnvelope) -> Self {
        match envelope {
            RecordEnvelope::Wrapped { configuration } => configuration,
            RecordEnvelope::Bare(record) => record,
        }
    }
}

async fn read_record(response: Response) -> Result<ConfigurationRecord, ServiceError> {
    let response = check_status(response).await?;
    let envelope: RecordEnvelope = read_json(response).await?;
    let record = ConfigurationRecord::from(envelope);
    tracing::debug!(
        "Configuration {} returned with {} question(s)",
        record.id,
        record.configuration_data.questions.len()
    );
    Ok(record)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let text = response.text().await.map_err(transport)?;
    serde_json::from_str(&text).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
}

/// Pass successful responses through; turn the rest into [`ServiceError::Status`]
async fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = error_detail(status, &body);
    tracing::debug!("Service answered {}: {}", status, detail);
    Err(ServiceError::Status {
        status: status.as_u16(),
        detail,
    })
}

/// User-facing detail for an error response
///
/// Prefers the `detail` member of a JSON body, then the raw body, then the
/// status reason.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body) {
        match object.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(other) => return other.to_string(),
            None => {}
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.chars().take(MAX_DETAIL_CHARS).collect();
    }

    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_string(), str::to_string)
}

fn transport(error: reqwest::Error) -> ServiceError {
    if error.is_timeout() {
        ServiceError::Transport(format!("request timed out: {error}"))
    } else {
        ServiceError::Transport(error.to_string())
    }
}

fn body_preview(fields: &ConfigurationFields) -> String {
    serde_json::to_string(fields).unwrap_or_default()
}
