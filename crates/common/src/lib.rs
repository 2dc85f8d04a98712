//! # Common
//!
//! Shuttle domain model shared by the tracker crates.

pub mod fleet;
pub mod location;
pub mod model;
pub mod route;
pub mod store;

pub use crate::fleet::{Fleet, Vehicle};
pub use crate::location::Location;
pub use crate::model::ModelService;
pub use crate::route::{Point, Route};
pub use crate::store::MemoryStore;
