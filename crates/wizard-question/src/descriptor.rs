//! Question type descriptors
//!
//! The configuration service describes each question's answer type as a
//! JSON object tagged by `type`. [`decode`] turns that object into a closed
//! [`TypeDescriptor`]; anything outside the known tags is reported, never
//! guessed at.

use std::fmt::{self, Display, Formatter};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value carried by an enumerated option
///
/// The service sends either strings or booleans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    Flag(bool),
    Text(String),
}

impl ChoiceValue {
    /// JSON form submitted as the answer
    #[inline]
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Flag(b) => Value::Bool(*b),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

impl Display for ChoiceValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One selectable option: the value to submit and the label to show
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Choice {
    #[serde(alias = "v")]
    pub value: ChoiceValue,
    #[serde(alias = "l", default)]
    pub label: String,
}

impl Choice {
    /// Create new choice
    #[inline]
    #[must_use]
    pub fn new(value: ChoiceValue, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }

    /// Text-valued choice
    #[inline]
    #[must_use]
    pub fn text(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(ChoiceValue::Text(value.into()), label)
    }

    /// Label to display; falls back to the value when the service sent none
    #[inline]
    #[must_use]
    pub fn display_label(&self) -> String {
        if self.label.is_empty() {
            self.value.to_string()
        } else {
            self.label.clone()
        }
    }
}

/// Bounds for a numeric question
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl NumberConstraints {
    /// Integer entry when the step is exactly one
    #[inline]
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.step == Some(1.0)
    }
}

/// Bounds for a free-text question
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextConstraints {
    #[serde(rename = "minLength")]
    pub min_length: Option<u64>,
    #[serde(rename = "maxLength")]
    pub max_length: Option<u64>,
    #[serde(alias = "regex")]
    pub pattern: Option<String>,
}

/// How a collection question is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionForm {
    /// No element allowed: only "None"
    Empty,
    /// Zero or one element: pick a type or "None"
    Optional,
    /// Exactly one element: pick its type
    Required,
    /// Several elements of the first declared type: enter a count
    Counted,
}

/// Size bounds and candidate element types of a collection question
///
/// Invariant: `min_size <= max_size`, and `possible_types` is non-empty
/// whenever at least one element can be required or counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionShape {
    min_size: usize,
    max_size: usize,
    possible_types: Vec<Choice>,
}

impl CollectionShape {
    /// Create a validated shape
    ///
    /// # Errors
    /// Returns [`DecodeError::InvalidShape`] if bounds are inverted or no
    /// element type is available where one is needed
    pub fn new(
        min_size: usize,
        max_size: usize,
        possible_types: Vec<Choice>,
    ) -> Result<Self, DecodeError> {
        if min_size > max_size {
            return Err(DecodeError::InvalidShape {
                tag: TAG_OBJECT_COLLECTION,
                reason: format!("minSize {min_size} exceeds maxSize {max_size}"),
            });
        }
        if possible_types.is_empty() && (min_size > 0 || max_size > 1) {
            return Err(DecodeError::InvalidShape {
                tag: TAG_OBJECT_COLLECTION,
                reason: "no possible_types declared".to_string(),
            });
        }
        Ok(Self {
            min_size,
            max_size,
            possible_types,
        })
    }

    #[inline]
    #[must_use]
    pub fn min_size(&self) -> usize {
        self.min_size
    }

    #[inline]
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    #[inline]
    #[must_use]
    pub fn possible_types(&self) -> &[Choice] {
        &self.possible_types
    }

    /// Classify the shape
    #[must_use]
    pub fn form(&self) -> CollectionForm {
        match (self.min_size, self.max_size) {
            (0, 0) => CollectionForm::Empty,
            (0, 1) => CollectionForm::Optional,
            (1, 1) => CollectionForm::Required,
            _ => CollectionForm::Counted,
        }
    }
}

/// Decoded answer type of a question
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Enum { possible_values: Vec<Choice> },
    Boolean,
    Number(NumberConstraints),
    Text(TextConstraints),
    ObjectCollection(CollectionShape),
}

impl TypeDescriptor {
    /// Wire tag of this descriptor
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Enum { .. } => TAG_ENUM,
            Self::Boolean => TAG_BOOLEAN,
            Self::Number(_) => TAG_NUMBER,
            Self::Text(_) => TAG_TEXT,
            Self::ObjectCollection(_) => TAG_OBJECT_COLLECTION,
        }
    }
}

const TAG_ENUM: &str = "Enum";
const TAG_BOOLEAN: &str = "Boolean";
const TAG_NUMBER: &str = "Number";
const TAG_TEXT: &str = "Text";
const TAG_OBJECT_COLLECTION: &str = "ObjectCollection";

/// Every tag [`decode`] understands
pub const KNOWN_TAGS: [&str; 5] = [
    TAG_ENUM,
    TAG_BOOLEAN,
    TAG_NUMBER,
    TAG_TEXT,
    TAG_OBJECT_COLLECTION,
];

#[derive(Deserialize)]
struct EnumBody {
    possible_values: Vec<Choice>,
}

#[derive(Deserialize)]
struct CollectionBody {
    #[serde(rename = "minSize")]
    min_size: usize,
    #[serde(rename = "maxSize")]
    max_size: usize,
    #[serde(default)]
    possible_types: Vec<Choice>,
}

/// Decode a raw `type_info` object
///
/// Pure and deterministic: the same input always yields an equal result.
///
/// # Errors
/// - [`DecodeError::MissingTag`] if there is no string `type` member
/// - [`DecodeError::UnknownQuestionType`] for tags outside [`KNOWN_TAGS`]
/// - [`DecodeError::Malformed`] / [`DecodeError::InvalidShape`] if the
///   type-specific fields do not fit
pub fn decode(raw: &Value) -> Result<TypeDescriptor, DecodeError> {
    let tag = raw
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingTag)?;

    let descriptor = match tag {
        TAG_ENUM => {
            let body: EnumBody = fields(TAG_ENUM, raw)?;
            if body.possible_values.is_empty() {
                return Err(DecodeError::InvalidShape {
                    tag: TAG_ENUM,
                    reason: "no possible_values declared".to_string(),
                });
            }
            TypeDescriptor::Enum {
                possible_values: body.possible_values,
            }
        }
        TAG_BOOLEAN => TypeDescriptor::Boolean,
        TAG_NUMBER => TypeDescriptor::Number(fields(TAG_NUMBER, raw)?),
        TAG_TEXT => TypeDescriptor::Text(fields(TAG_TEXT, raw)?),
        TAG_OBJECT_COLLECTION => {
            let body: CollectionBody = fields(TAG_OBJECT_COLLECTION, raw)?;
            TypeDescriptor::ObjectCollection(CollectionShape::new(
                body.min_size,
                body.max_size,
                body.possible_types,
            )?)
        }
        other => {
            tracing::warn!("Unknown question type: {}", other);
            return Err(DecodeError::UnknownQuestionType(other.to_string()));
        }
    };

    tracing::debug!("Decoded question type {}", descriptor.tag());
    Ok(descriptor)
}

fn fields<T: DeserializeOwned>(tag: &'static str, raw: &Value) -> Result<T, DecodeError> {
    T::deserialize(raw).map_err(|e| DecodeError::Malformed {
        tag,
        reason: e.to_string(),
    })
}

/// Reasons a question type cannot be rendered
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// `type_info` has no `type` tag
    #[error("question type is missing")]
    MissingTag,

    /// Tag outside the known set
    #[error("unknown question type: {0}")]
    UnknownQuestionType(String),

    /// Type-specific fields have the wrong shape
    #[error("malformed {tag} question: {reason}")]
    Malformed { tag: &'static str, reason: String },

    /// Fields parse but violate the type's constraints
    #[error("invalid {tag} question: {reason}")]
    InvalidShape { tag: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn decode_enum_with_short_keys() {
        let raw = json!({
            "type": "Enum",
            "possible_values": [{"v": "auto", "l": "Auto"}, {"v": "manual", "l": "Manual"}]
        });
        assert_eq!(
            decode(&raw).unwrap(),
            TypeDescriptor::Enum {
                possible_values: vec![Choice::text("auto", "Auto"), Choice::text("manual", "Manual")]
            }
        );
    }

    #[test]
    fn decode_enum_with_long_keys_and_flags() {
        let raw = json!({
            "type": "Enum",
            "possible_values": [{"value": true, "label": "On"}]
        });
        let TypeDescriptor::Enum { possible_values } = decode(&raw).unwrap() else {
            panic!("expected enum");
        };
        assert_eq!(possible_values[0].value, ChoiceValue::Flag(true));
        assert_eq!(possible_values[0].label, "On");
    }

    #[test]
    fn decode_enum_without_values_is_invalid() {
        let raw = json!({"type": "Enum", "possible_values": []});
        assert!(matches!(decode(&raw), Err(DecodeError::InvalidShape { .. })));
        let raw = json!({"type": "Enum"});
        assert!(matches!(decode(&raw), Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn decode_boolean_ignores_extra_fields() {
        let raw = json!({"type": "Boolean", "default": true});
        assert_eq!(decode(&raw).unwrap(), TypeDescriptor::Boolean);
    }

    #[test]
    fn decode_number() {
        let raw = json!({"type": "Number", "min": 1, "max": 64, "step": 1});
        let TypeDescriptor::Number(c) = decode(&raw).unwrap() else {
            panic!("expected number");
        };
        assert_eq!(c.min, Some(1.0));
        assert_eq!(c.max, Some(64.0));
        assert!(c.is_integral());

        let raw = json!({"type": "Number", "step": 0.5});
        let TypeDescriptor::Number(c) = decode(&raw).unwrap() else {
            panic!("expected number");
        };
        assert!(!c.is_integral());
        assert_eq!(c.min, None);
    }

    #[test]
    fn decode_text_accepts_regex_alias() {
        let raw = json!({"type": "Text", "minLength": 2, "maxLength": 10, "regex": "^[a-z]+$"});
        assert_eq!(
            decode(&raw).unwrap(),
            TypeDescriptor::Text(TextConstraints {
                min_length: Some(2),
                max_length: Some(10),
                pattern: Some("^[a-z]+$".to_string()),
            })
        );
    }

    #[test]
    fn decode_object_collection_forms() {
        let types = json!([{"v": "demo.config.EmailNotification", "l": "Email"}]);
        let cases = [
            (0, 0, CollectionForm::Empty),
            (0, 1, CollectionForm::Optional),
            (1, 1, CollectionForm::Required),
            (1, 5, CollectionForm::Counted),
            (0, 3, CollectionForm::Counted),
        ];
        for (min, max, form) in cases {
            let raw = json!({"type": "ObjectCollection", "minSize": min, "maxSize": max, "possible_types": types});
            let TypeDescriptor::ObjectCollection(shape) = decode(&raw).unwrap() else {
                panic!("expected collection");
            };
            assert_eq!(shape.form(), form, "min={min} max={max}");
        }
    }

    #[test]
    fn decode_object_collection_rejects_inverted_bounds() {
        let raw = json!({"type": "ObjectCollection", "minSize": 3, "maxSize": 1, "possible_types": [{"v": "A", "l": "A"}]});
        assert!(matches!(decode(&raw), Err(DecodeError::InvalidShape { .. })));
    }

    #[test]
    fn decode_object_collection_requires_types_when_counted() {
        let raw = json!({"type": "ObjectCollection", "minSize": 1, "maxSize": 4});
        assert!(matches!(decode(&raw), Err(DecodeError::InvalidShape { .. })));

        let raw = json!({"type": "ObjectCollection", "minSize": 0, "maxSize": 1});
        assert!(decode(&raw).is_ok());
    }

    #[test]
    fn decode_unknown_tag() {
        let raw = json!({"type": "Date"});
        assert_eq!(
            decode(&raw),
            Err(DecodeError::UnknownQuestionType("Date".to_string()))
        );
    }

    #[test]
    fn decode_missing_tag() {
        assert_eq!(decode(&json!({})), Err(DecodeError::MissingTag));
        assert_eq!(decode(&json!({"type": 3})), Err(DecodeError::MissingTag));
        assert_eq!(decode(&Value::Null), Err(DecodeError::MissingTag));
    }

    #[test]
    fn choice_label_falls_back_to_value() {
        let choice: Choice = serde_json::from_value(json!({"v": "x"})).unwrap();
        assert_eq!(choice.display_label(), "x");
    }

    fn raw_descriptor() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(json!({"type": "Boolean"})),
            (any::<i32>(), any::<i32>(), prop::option::of(prop_oneof![Just(1.0), Just(0.5)]))
                .prop_map(|(min, max, step)| json!({"type": "Number", "min": min, "max": max, "step": step})),
            prop::option::of(0u64..20)
                .prop_map(|max| json!({"type": "Text", "maxLength": max})),
            prop::collection::vec("[a-z]{1,5}", 1..4).prop_map(|vals| {
                let values: Vec<Value> = vals.iter().map(|v| json!({"v": v, "l": v.to_uppercase()})).collect();
                json!({"type": "Enum", "possible_values": values})
            }),
            (0usize..3, 0usize..6).prop_map(|(min, max)| json!({
                "type": "ObjectCollection", "minSize": min, "maxSize": max,
                "possible_types": [{"v": "T", "l": "T"}]
            })),
            "[A-Z][a-z]{0,6}".prop_map(|tag| json!({"type": tag})),
        ]
    }

    proptest! {
        #[test]
        fn prop_decode_is_idempotent(raw in raw_descriptor()) {
            prop_assert_eq!(decode(&raw), decode(&raw));
        }
    }
}
