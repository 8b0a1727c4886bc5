//! Testing utilities for the configurator workspace
//!
//! Shared fixtures and a scripted [`ConfigurationService`].

#![allow(missing_docs)]

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use wizard_core::{
    ConfigurationDocument, ConfigurationFields, ConfigurationId, ConfigurationRecord,
    ConfigurationService, HealthStatus, PendingQuestion, ServiceError,
};

/// A call received by [`ScriptedService`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Create(ConfigurationFields),
    Update {
        id: ConfigurationId,
        fields: ConfigurationFields,
    },
    Delete(ConfigurationId),
    Health,
}

#[derive(Debug, Default)]
struct Script {
    creates: VecDeque<Result<ConfigurationRecord, ServiceError>>,
    updates: VecDeque<Result<ConfigurationRecord, ServiceError>>,
    deletes: VecDeque<Result<(), ServiceError>>,
    calls: Vec<RecordedCall>,
}

/// Service answering from queued responses
///
/// Clones share the same script, so a test can keep a handle after moving
/// one into a session. Unscripted creates and updates fail with a
/// transport error; unscripted deletes succeed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedService {
    script: Arc<Mutex<Script>>,
}

impl ScriptedService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer to the next create
    #[must_use]
    pub fn with_create(self, response: Result<ConfigurationRecord, ServiceError>) -> Self {
        self.script.lock().creates.push_back(response);
        self
    }

    /// Queue the answer to the next update
    #[must_use]
    pub fn with_update(self, response: Result<ConfigurationRecord, ServiceError>) -> Self {
        self.script.lock().updates.push_back(response);
        self
    }

    /// Queue the answer to the next delete
    #[must_use]
    pub fn with_delete(self, response: Result<(), ServiceError>) -> Self {
        self.script.lock().deletes.push_back(response);
        self
    }

    /// Every call received so far
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.script.lock().calls.clone()
    }

    /// Bodies of the updates received so far
    #[must_use]
    pub fn updates(&self) -> Vec<ConfigurationFields> {
        self.script
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Update { fields, .. } => Some(fields.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of calls that reached the service
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.script.lock().calls.len()
    }
}

fn unscripted(operation: &str) -> ServiceError {
    ServiceError::Transport(format!("no scripted response for {operation}"))
}

#[async_trait::async_trait]
impl ConfigurationService for ScriptedService {
    async fn create_configuration(
        &self,
        fields: &ConfigurationFields,
    ) -> Result<ConfigurationRecord, ServiceError> {
        let mut script = self.script.lock();
        script.calls.push(RecordedCall::Create(fields.clone()));
        script
            .creates
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("create")))
    }

    async fn update_configuration(
        &self,
        id: ConfigurationId,
        fields: &ConfigurationFields,
    ) -> Result<ConfigurationRecord, ServiceError> {
        let mut script = self.script.lock();
        script.calls.push(RecordedCall::Update {
            id,
            fields: fields.clone(),
        });
        script
            .updates
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("update")))
    }

    async fn delete_configuration(&self, id: ConfigurationId) -> Result<(), ServiceError> {
        let mut script = self.script.lock();
        script.calls.push(RecordedCall::Delete(id));
        script.deletes.pop_front().unwrap_or(Ok(()))
    }

    async fn health_check(&self) -> Result<HealthStatus, ServiceError> {
        self.script.lock().calls.push(RecordedCall::Health);
        Ok(HealthStatus {
            status: "healthy".to_string(),
            service: "scripted".to_string(),
        })
    }
}

/// Question with the given path, text and `type_info`
pub fn question(path: &str, text: &str, type_info: Value) -> PendingQuestion {
    PendingQuestion::new(path, text, type_info)
}

/// Document with `payload` (an object) and `questions`
pub fn document(payload: Value, questions: Vec<PendingQuestion>) -> ConfigurationDocument {
    let payload = match payload {
        Value::Object(map) => map,
        other => panic!("payload fixture must be an object, got {other}"),
    };
    ConfigurationDocument {
        payload,
        questions,
        extra: Default::default(),
    }
}

/// Record with `id` holding `document`
pub fn record(id: ConfigurationId, document: ConfigurationDocument) -> ConfigurationRecord {
    ConfigurationRecord::new(id, document)
}

/// Validation failure as the service reports it
pub fn rejection(detail: &str) -> ServiceError {
    ServiceError::Status {
        status: 400,
        detail: detail.to_string(),
    }
}

/// Non-validation status failure
pub fn server_error(status: u16, detail: &str) -> ServiceError {
    ServiceError::Status {
        status,
        detail: detail.to_string(),
    }
}
