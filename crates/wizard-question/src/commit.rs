//! Turning raw widget input into an answer
//!
//! [`WidgetSpec::commit`] is the last local step before an answer leaves for
//! the server. Malformed input stops here as a [`LocalValidationError`].

use serde_json::{Number, Value};

use crate::widget::WidgetSpec;

/// Largest collection a count entry will synthesize, whatever `maxSize` says
pub const MAX_SYNTHESIZED_ELEMENTS: usize = 10_000;

/// What the user did with a widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetInput {
    /// Pressed the button at this position
    Choice(usize),
    /// Typed this text and committed it
    Text(String),
}

/// Value to write at the question path, plus its transcript echo
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub value: Value,
    pub echo: String,
}

impl Answer {
    /// Answer picked from a button
    #[inline]
    #[must_use]
    pub fn selected(label: &str, value: Value) -> Self {
        Self {
            value,
            echo: format!("Selected: {label}"),
        }
    }

    /// Answer typed into a field
    #[inline]
    #[must_use]
    pub fn entered(value: Value) -> Self {
        let shown = match &value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self {
            value,
            echo: format!("Entered: {shown}"),
        }
    }
}

impl WidgetSpec {
    /// Convert raw input into an [`Answer`]
    ///
    /// # Errors
    /// Returns [`LocalValidationError`] when the input cannot become a value
    /// for this widget
    pub fn commit(&self, input: WidgetInput) -> Result<Answer, LocalValidationError> {
        match (self, input) {
            (Self::Buttons { options }, WidgetInput::Choice(index)) => options
                .get(index)
                .map(|o| Answer::selected(&o.label, o.answer.clone()))
                .ok_or_else(|| LocalValidationError::NoSuchOption(index.to_string())),

            (Self::Buttons { options }, WidgetInput::Text(text)) => {
                let wanted = text.trim();
                options
                    .iter()
                    .find(|o| {
                        o.label.eq_ignore_ascii_case(wanted)
                            || answer_text(&o.answer).is_some_and(|a| a.eq_ignore_ascii_case(wanted))
                    })
                    .map(|o| Answer::selected(&o.label, o.answer.clone()))
                    .ok_or(LocalValidationError::NoSuchOption(text))
            }

            (Self::NumberEntry { integral, .. }, WidgetInput::Text(text)) => {
                parse_number(&text, *integral).map(Answer::entered)
            }

            (Self::TextEntry { .. }, WidgetInput::Text(text)) => {
                Ok(Answer::entered(Value::String(text)))
            }

            (Self::CountEntry { min, max, element }, WidgetInput::Text(text)) => {
                let count = text
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| LocalValidationError::NotAnInteger(text.clone()))?;
                let limit = (*max).min(MAX_SYNTHESIZED_ELEMENTS);
                if count < *min || count > limit {
                    return Err(LocalValidationError::CountOutOfRange {
                        count,
                        min: *min,
                        max: limit,
                    });
                }
                let elements = (0..count).map(|_| element.instance()).collect();
                Ok(Answer {
                    value: Value::Array(elements),
                    echo: format!("Entered: {count}"),
                })
            }

            (spec, WidgetInput::Choice(_)) => Err(LocalValidationError::InputMismatch {
                widget: spec.kind(),
            }),
        }
    }
}

fn answer_text(answer: &Value) -> Option<String> {
    match answer {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_number(text: &str, integral: bool) -> Result<Value, LocalValidationError> {
    let trimmed = text.trim();
    if integral {
        return trimmed
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| LocalValidationError::NotAnInteger(text.to_string()));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| LocalValidationError::NotANumber(text.to_string()))
}

/// Widget-level input errors caught before any network call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocalValidationError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not a whole number")]
    NotAnInteger(String),

    #[error("{count} is outside the allowed range {min}..={max}")]
    CountOutOfRange { count: usize, min: usize, max: usize },

    #[error("no option matches '{0}'")]
    NoSuchOption(String),

    #[error("a {widget} widget does not accept a button choice")]
    InputMismatch { widget: &'static str },
}
