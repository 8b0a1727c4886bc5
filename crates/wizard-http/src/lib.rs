//! Wizard HTTP
//!
//! [`HttpConfigurationService`] speaks the configuration service's JSON
//! API with `reqwest`. Status 400 answers surface as validation failures;
//! the `detail` member of an error body becomes the user-facing message.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod client;
mod config;

pub use client::HttpConfigurationService;
pub use config::{ServiceConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
