//! Configuration service seam
//!
//! The dialogue talks to storage and the rule engine only through
//! [`ConfigurationService`]. `wizard-http` provides the HTTP client;
//! tests substitute scripted or mocked implementations.

use std::sync::Arc;

use crate::error::ServiceError;
use crate::types::{ConfigurationFields, ConfigurationId, ConfigurationRecord, HealthStatus};

/// Remote configuration store and rule engine
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ConfigurationService: Send + Sync {
    /// Create a configuration; the service answers with the first questions
    async fn create_configuration(
        &self,
        fields: &ConfigurationFields,
    ) -> Result<ConfigurationRecord, ServiceError>;

    /// Replace a configuration; the service answers with the remaining questions
    async fn update_configuration(
        &self,
        id: ConfigurationId,
        fields: &ConfigurationFields,
    ) -> Result<ConfigurationRecord, ServiceError>;

    /// Delete a configuration
    async fn delete_configuration(&self, id: ConfigurationId) -> Result<(), ServiceError>;

    /// Probe service availability
    async fn health_check(&self) -> Result<HealthStatus, ServiceError>;
}

#[async_trait::async_trait]
impl<T: ConfigurationService + ?Sized> ConfigurationService for Arc<T> {
    async fn create_configuration(
        &self,
        fields: &ConfigurationFields,
    ) -> Result<ConfigurationRecord, ServiceError> {
        (**self).create_configuration(fields).await
    }

    async fn update_configuration(
        &self,
        id: ConfigurationId,
        fields: &ConfigurationFields,
    ) -> Result<ConfigurationRecord, ServiceError> {
        (**self).update_configuration(id, fields).await
    }

    async fn delete_configuration(&self, id: ConfigurationId) -> Result<(), ServiceError> {
        (**self).delete_configuration(id).await
    }

    async fn health_check(&self) -> Result<HealthStatus, ServiceError> {
        (**self).health_check().await
    }
}
