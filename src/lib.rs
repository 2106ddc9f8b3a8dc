//! Terminal journal for tracking everyday activities across a few areas of life, with a small
//! report that shows where the time went. Everything lives in a json-lines journal under the
//! user's data directory, so it works offline and can be inspected with standard tools.
//!

pub mod analytics;
pub mod cli;
pub mod identity;
pub mod model;
pub mod segments;
pub mod store;
pub mod utils;
