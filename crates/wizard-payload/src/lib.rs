//! Wizard Payload
//!
//! Addressing and mutation of the nested JSON payload a configuration
//! dialogue fills in, one answer at a time.
//!
//! # Core Concepts
//!
//! - [`QuestionPath`]: dotted path with optional array indices (`nodes[2].cpu`)
//! - [`resolve_and_set`]: write a value at a path, failing instead of
//!   fabricating missing containers
//! - [`resolve`]: read a value back
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use wizard_payload::{resolve_and_set, JsonObject};
//!
//! let payload = resolve_and_set(JsonObject::new(), "mode", json!("auto")).unwrap();
//! assert_eq!(payload["mode"], json!("auto"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod path;
mod resolve;

pub use path::{PathSegment, PathSyntaxError, QuestionPath};
pub use resolve::{resolve, resolve_and_set, set_in_place, JsonObject, PathResolutionError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
