//! Wizard Question
//!
//! Decodes the type descriptor attached to each server-issued question and
//! projects it onto an input widget.
//!
//! # Core Concepts
//!
//! - [`decode`]: raw `type_info` JSON → [`TypeDescriptor`] (closed set of five tags)
//! - [`WidgetSelector`]: [`TypeDescriptor`] → [`WidgetSpec`]
//! - [`WidgetSpec::commit`]: [`WidgetInput`] → [`Answer`], or a [`LocalValidationError`]
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use wizard_question::{decode, WidgetInput, WidgetSelector};
//!
//! let decoded = decode(&json!({"type": "Number", "step": 1})).unwrap();
//! let widget = WidgetSelector::new().select(&decoded);
//! let answer = widget.commit(WidgetInput::Text("42".into())).unwrap();
//! assert_eq!(answer.value, json!(42));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod commit;
mod descriptor;
mod widget;

pub use commit::{Answer, LocalValidationError, WidgetInput, MAX_SYNTHESIZED_ELEMENTS};
pub use descriptor::{
    decode, Choice, ChoiceValue, CollectionForm, CollectionShape, DecodeError, NumberConstraints,
    TextConstraints, TypeDescriptor, KNOWN_TAGS,
};
pub use widget::{ButtonOption, CollectionElement, WidgetSelector, WidgetSpec, DEFAULT_TYPE_TAG_KEY};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
