//! # Realtime Core
//!
//! Core modules shared by the shuttle tracker crates.

mod error;
mod provider;

pub use crate::error::*;
pub use crate::provider::*;
