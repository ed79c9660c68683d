//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - One bounded pool, created at startup and injected (no globals)
//! - Reads run a single query; writes run in one transaction
//! - Uniqueness is pre-checked for a descriptive error and backed by
//!   unique indexes; store violations are remapped, never surfaced raw
//! - Callers go through the `Catalog` trait so tests can swap the store

pub mod catalog;
pub mod error;
pub mod memory;
pub mod pool;
pub mod repos;
pub mod schema;

pub use catalog::{Catalog, PgCatalog};
pub use error::{RepoError, Violation};
pub use memory::MemoryCatalog;
pub use pool::{create_pool, create_pool_from_config, create_pool_with_options};
pub use repos::*;
