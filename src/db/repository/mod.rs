//! Repository Module
//!
//! Module-level async functions over the shared [`sqlx::SqlitePool`], one
//! module per table. Multi-step writes (order placement, stock changes)
//! run inside explicit transactions; see `stock` and `orders::manager`.

pub mod discount_rule;
pub mod order;
pub mod product;
pub mod report;
pub mod route;
pub mod stock;
pub mod user;

use thiserror::Error;

/// Repository error types.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Referenced product, order, user, or route does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The write conflicts with current state: duplicate key, disallowed
    /// status transition, or a stock deduction that would go negative.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed input; nothing was written.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Underlying persistence failure. The surrounding transaction, if
    /// any, is rolled back.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;
