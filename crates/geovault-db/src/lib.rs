//! Geovault DB - Storage layer
//!
//! SQLx-based persistence for users and the resources they own, plus the
//! versioned schema migrations that create those tables.
//!
//! # Example
//!
//! ```rust,ignore
//! use geovault_db::{create_pool, Migrator, Repositories, Target};
//!
//! let pool = create_pool("postgres://localhost/geovault").await?;
//! Migrator::new()?.upgrade(&pool, Target::Head).await?;
//!
//! let repos = Repositories::new(pool);
//! let user = repos.users.find_by_email("user@example.com").await?;
//! ```

pub mod error;
pub mod migrate;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{ConstraintKind, ConstraintViolation, DbError, DbResult};
pub use migrate::{Dialect, Migration, MigrationChain, MigrationError, Migrator, SchemaExecutor, Target};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, create_pool_with_options, DbPool, PoolOptions};
pub use repo::*;
