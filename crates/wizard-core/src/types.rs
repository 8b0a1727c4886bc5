//! Configuration records and the documents exchanged with the service

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use wizard_payload::{JsonObject, PathSyntaxError, QuestionPath};
use wizard_question::{decode, DecodeError, TypeDescriptor};

use crate::error::FieldError;

/// Server-assigned configuration identifier
pub type ConfigurationId = i64;

/// Maximum configuration name length, in characters
pub const MAX_NAME_LEN: usize = 100;

/// Maximum description length, in characters
pub const MAX_DESCRIPTION_LEN: usize = 500;

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("version pattern is a valid regex"));

/// Unique identifier for a dialogue session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a stored configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationStatus {
    #[default]
    Draft,
    Active,
    Inactive,
    Archived,
}

impl ConfigurationStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Archived => "archived",
        }
    }
}

impl Display for ConfigurationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigurationStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "archived" => Ok(Self::Archived),
            _ => Err(FieldError::UnknownStatus(s.to_string())),
        }
    }
}

/// Fields the user supplies before the first submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicFields {
    pub name: String,
    pub description: String,
    pub version: String,
    pub status: ConfigurationStatus,
    /// Comma-separated tag list as typed
    pub tags: String,
}

impl BasicFields {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: ConfigurationStatus) -> Self {
        self.status = status;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Tags split on commas, trimmed, empties dropped
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Check the fields against the service's constraints
    ///
    /// # Errors
    /// Returns the first [`FieldError`] found
    pub fn validate(&self) -> Result<(), FieldError> {
        let name_len = self.name.trim().chars().count();
        if name_len == 0 {
            return Err(FieldError::EmptyName);
        }
        if name_len > MAX_NAME_LEN {
            return Err(FieldError::NameTooLong {
                len: name_len,
                max: MAX_NAME_LEN,
            });
        }

        let description_len = self.description.chars().count();
        if description_len > MAX_DESCRIPTION_LEN {
            return Err(FieldError::DescriptionTooLong {
                len: description_len,
                max: MAX_DESCRIPTION_LEN,
            });
        }

        if !VERSION_PATTERN.is_match(self.version.trim()) {
            return Err(FieldError::InvalidVersion(self.version.clone()));
        }

        Ok(())
    }

    /// Request body carrying `configuration_data`
    #[must_use]
    pub fn to_request(&self, configuration_data: Value) -> ConfigurationFields {
        let description = self.description.trim();
        ConfigurationFields {
            name: self.name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            cluster_type: None,
            version: self.version.trim().to_string(),
            status: self.status,
            configuration_data,
            tags: self.tags(),
        }
    }
}

impl Default for BasicFields {
    fn default() -> Self {
        Self {
            name: "cfg1".to_string(),
            description: String::new(),
            version: "1.0.0".to_string(),
            status: ConfigurationStatus::Draft,
            tags: String::new(),
        }
    }
}

/// Body of create and update requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationFields {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_type: Option<String>,
    pub version: String,
    pub status: ConfigurationStatus,
    pub configuration_data: Value,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A question the service wants answered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingQuestion {
    /// Where the answer is written in the payload
    pub path: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default)]
    pub type_info: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_type_name: Option<String>,
    /// Members this client does not interpret, sent back unchanged
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl PendingQuestion {
    #[must_use]
    pub fn new(path: impl Into<String>, text: impl Into<String>, type_info: Value) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            info: None,
            type_info,
            common_type_name: None,
            extra: JsonObject::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Decode `type_info`
    ///
    /// # Errors
    /// Returns [`DecodeError`] for unknown or malformed descriptors
    pub fn decode_type(&self) -> Result<TypeDescriptor, DecodeError> {
        decode(&self.type_info)
    }

    /// Parse `path`
    ///
    /// # Errors
    /// Returns [`PathSyntaxError`] if the path is malformed
    pub fn parsed_path(&self) -> Result<QuestionPath, PathSyntaxError> {
        self.path.parse()
    }
}

/// The `configuration_data` document: payload plus outstanding questions
///
/// Only the head of `questions` is ever presented. Members other than
/// `payload` and `questions` are preserved across updates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: JsonObject,
    #[serde(default, deserialize_with = "null_as_default")]
    pub questions: Vec<PendingQuestion>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl ConfigurationDocument {
    /// Question to present next
    #[inline]
    #[must_use]
    pub fn pending_question(&self) -> Option<&PendingQuestion> {
        self.questions.first()
    }

    /// Check if the service has no more questions
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.questions.is_empty()
    }

    /// Same document with a replaced payload
    #[must_use]
    pub fn with_payload(&self, payload: JsonObject) -> Self {
        Self {
            payload,
            questions: self.questions.clone(),
            extra: self.extra.clone(),
        }
    }

    /// Serialize as the `configuration_data` value
    ///
    /// # Errors
    /// Returns error if a member cannot be represented as JSON
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Configuration as stored by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    pub id: ConfigurationId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cluster_type: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub status: Option<ConfigurationStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub configuration_data: ConfigurationDocument,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ConfigurationRecord {
    /// Record holding `document`, other members empty
    #[must_use]
    pub fn new(id: ConfigurationId, document: ConfigurationDocument) -> Self {
        Self {
            id,
            name: String::new(),
            description: None,
            cluster_type: None,
            version: None,
            status: None,
            configuration_data: document,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Answer of the service health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
}

impl HealthStatus {
    #[inline]
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}
