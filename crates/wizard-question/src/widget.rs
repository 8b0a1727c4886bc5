//! Widget selection
//!
//! Projects a [`TypeDescriptor`] onto the input affordance a renderer must
//! offer. Nothing here draws anything; a [`WidgetSpec`] only says which
//! controls exist and what each one submits.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::descriptor::{Choice, CollectionForm, CollectionShape, TypeDescriptor};

/// Default member carrying the concrete type of a synthesized object
pub const DEFAULT_TYPE_TAG_KEY: &str = "LGType_";

/// A button and the JSON value it submits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonOption {
    pub label: String,
    pub answer: Value,
}

impl ButtonOption {
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>, answer: Value) -> Self {
        Self {
            label: label.into(),
            answer,
        }
    }
}

/// Element type used when synthesizing collection members
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionElement {
    pub tag_key: String,
    pub type_name: String,
}

impl CollectionElement {
    /// A fresh element object: `{tag_key: type_name}`
    #[inline]
    #[must_use]
    pub fn instance(&self) -> Value {
        let mut object = Map::new();
        object.insert(self.tag_key.clone(), Value::String(self.type_name.clone()));
        Value::Object(object)
    }
}

/// Input affordance for one question
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidgetSpec {
    /// Button group; each button submits its `answer`
    Buttons { options: Vec<ButtonOption> },
    /// Numeric field; parsed as integer when `integral`
    NumberEntry {
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
        integral: bool,
    },
    /// Free text submitted verbatim
    TextEntry {
        min_length: Option<u64>,
        max_length: Option<u64>,
        pattern: Option<String>,
    },
    /// Element count for a homogeneous collection of `element`
    CountEntry {
        min: usize,
        max: usize,
        element: CollectionElement,
    },
}

impl WidgetSpec {
    /// Short name of the widget kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Buttons { .. } => "buttons",
            Self::NumberEntry { .. } => "number_entry",
            Self::TextEntry { .. } => "text_entry",
            Self::CountEntry { .. } => "count_entry",
        }
    }
}

/// Maps decoded question types to widgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSelector {
    type_tag_key: String,
    yes_label: String,
    no_label: String,
    none_label: String,
}

impl WidgetSelector {
    /// Create selector with default labels and type tag key
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With type tag key written into synthesized objects
    #[inline]
    #[must_use]
    pub fn with_type_tag_key(mut self, key: impl Into<String>) -> Self {
        self.type_tag_key = key.into();
        self
    }

    /// With labels for the Boolean options
    #[inline]
    #[must_use]
    pub fn with_boolean_labels(mut self, yes: impl Into<String>, no: impl Into<String>) -> Self {
        self.yes_label = yes.into();
        self.no_label = no.into();
        self
    }

    /// Type tag key
    #[inline]
    #[must_use]
    pub fn type_tag_key(&self) -> &str {
        &self.type_tag_key
    }

    /// Select the widget for a decoded type
    #[must_use]
    pub fn select(&self, decoded: &TypeDescriptor) -> WidgetSpec {
        match decoded {
            TypeDescriptor::Enum { possible_values } => WidgetSpec::Buttons {
                options: possible_values
                    .iter()
                    .map(|c| ButtonOption::new(c.display_label(), c.value.to_json()))
                    .collect(),
            },
            TypeDescriptor::Boolean => WidgetSpec::Buttons {
                options: vec![
                    ButtonOption::new(self.yes_label.clone(), Value::Bool(true)),
                    ButtonOption::new(self.no_label.clone(), Value::Bool(false)),
                ],
            },
            TypeDescriptor::Number(c) => WidgetSpec::NumberEntry {
                min: c.min,
                max: c.max,
                step: c.step,
                integral: c.is_integral(),
            },
            TypeDescriptor::Text(c) => WidgetSpec::TextEntry {
                min_length: c.min_length,
                max_length: c.max_length,
                pattern: c.pattern.clone(),
            },
            TypeDescriptor::ObjectCollection(shape) => self.select_collection(shape),
        }
    }

    fn select_collection(&self, shape: &CollectionShape) -> WidgetSpec {
        match shape.form() {
            CollectionForm::Empty => WidgetSpec::Buttons {
                options: vec![ButtonOption::new(self.none_label.clone(), json!([]))],
            },
            CollectionForm::Optional => {
                let mut options = vec![ButtonOption::new(self.none_label.clone(), json!([]))];
                options.extend(shape.possible_types().iter().map(|t| self.single_element(t)));
                WidgetSpec::Buttons { options }
            }
            CollectionForm::Required => WidgetSpec::Buttons {
                options: shape
                    .possible_types()
                    .iter()
                    .map(|t| self.single_element(t))
                    .collect(),
            },
            CollectionForm::Counted => {
                // Homogeneous collections only: every element takes the first declared type.
                let type_name = shape
                    .possible_types()
                    .first()
                    .map(|t| t.value.to_string())
                    .unwrap_or_default();
                WidgetSpec::CountEntry {
                    min: shape.min_size(),
                    max: shape.max_size(),
                    element: self.element(type_name),
                }
            }
        }
    }

    fn single_element(&self, choice: &Choice) -> ButtonOption {
        let element = self.element(choice.value.to_string());
        ButtonOption::new(choice.display_label(), Value::Array(vec![element.instance()]))
    }

    fn element(&self, type_name: String) -> CollectionElement {
        CollectionElement {
            tag_key: self.type_tag_key.clone(),
            type_name,
        }
    }
}

impl Default for WidgetSelector {
    fn default() -> Self {
        Self {
            type_tag_key: DEFAULT_TYPE_TAG_KEY.to_string(),
            yes_label: "Yes".to_string(),
            no_label: "No".to_string(),
            none_label: "None".to_string(),
        }
    }
}
