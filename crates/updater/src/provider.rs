//! # Provider
//!
//! Provider defines external data interfaces for the crate.

pub use common::ModelService;
pub use realtime::HttpRequest;

/// Provider entry point implemented by the host application.
pub trait Provider: HttpRequest + ModelService {}
