//! Persistence-level error types.

use thiserror::Error;

/// Repository-level errors.
///
/// Mapped to HTTP status codes at the API boundary: `NotFound` becomes 404,
/// `Constraint` becomes 409, everything else is a 500 with the detail kept
/// in the server log.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
