//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Connection pool with an explicit connection limit
//! - Soft deletes: every table carries `deleted`, every read filters on it
//! - Rely on DB constraints for name uniqueness, map violations to conflicts
//! - Transactions for multi-step writes

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};

use crate::store::StoreError;

/// Turn unique-constraint violations into `StoreError::Conflict`.
pub(crate) fn map_conflict(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Conflict {
                constraint: db_err.constraint().unwrap_or("unique").to_owned(),
            };
        }
    }
    StoreError::Sqlx(err)
}
