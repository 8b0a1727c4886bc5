//! Dialogue configuration

use wizard_question::{WidgetSelector, DEFAULT_TYPE_TAG_KEY};

/// Transcript greeting shown before the first submission
pub const DEFAULT_WELCOME: &str =
    "Hello! I am here to help you configure your cluster. Press 'Start Configuration' when you are ready.";

/// Dialogue configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    /// Member that names the concrete type of synthesized collection elements
    pub type_tag_key: String,
    /// Greeting appended when a session is created; none when empty
    pub welcome_message: String,
    /// Label of the Boolean `true` option
    pub yes_label: String,
    /// Label of the Boolean `false` option
    pub no_label: String,
}

impl WizardConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With type tag key
    #[inline]
    #[must_use]
    pub fn with_type_tag_key(mut self, key: impl Into<String>) -> Self {
        self.type_tag_key = key.into();
        self
    }

    /// With welcome message
    #[inline]
    #[must_use]
    pub fn with_welcome_message(mut self, message: impl Into<String>) -> Self {
        self.welcome_message = message.into();
        self
    }

    /// With Boolean labels
    #[inline]
    #[must_use]
    pub fn with_boolean_labels(mut self, yes: impl Into<String>, no: impl Into<String>) -> Self {
        self.yes_label = yes.into();
        self.no_label = no.into();
        self
    }

    /// Widget selector honoring this configuration
    #[must_use]
    pub fn selector(&self) -> WidgetSelector {
        WidgetSelector::new()
            .with_type_tag_key(self.type_tag_key.clone())
            .with_boolean_labels(self.yes_label.clone(), self.no_label.clone())
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            type_tag_key: DEFAULT_TYPE_TAG_KEY.to_string(),
            welcome_message: DEFAULT_WELCOME.to_string(),
            yes_label: "Yes".to_string(),
            no_label: "No".to_string(),
        }
    }
}
