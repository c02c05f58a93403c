//! Geovault Types - Shared domain types
//!
//! This crate contains domain types used across Geovault crates:
//! - User identity and token subjects
//! - Identifiers of user-owned resources (datasets, analysis runs, places)
//! - Geometry descriptors stored alongside those resources

pub mod auth;
pub mod error;
pub mod geo;
pub mod resource;
pub mod user;

pub use auth::*;
pub use error::*;
pub use geo::*;
pub use resource::*;
pub use user::*;
