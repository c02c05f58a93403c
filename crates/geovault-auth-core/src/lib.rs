//! Geovault Auth Core - Authentication business logic
//!
//! Password hashing, signed bearer tokens and the service that ties both
//! to the user repository.

pub mod clock;
pub mod config;
pub mod error;
pub mod password;
pub mod secret;
pub mod service;
pub mod token;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use password::*;
pub use secret::*;
pub use service::*;
pub use token::*;
