//! Core error types

use thiserror::Error;

/// Errors raised while coercing a fetched row
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoerceError {
    /// Declared column count and fetched value count disagree.
    ///
    /// The usual cause is duplicate column names collapsing in an
    /// associative fetch, so the payload names the offending columns.
    #[error(
        "statement declares {declared} columns but the fetched row has {received} values; \
         duplicated columns: [{}]",
        .duplicated.join(", ")
    )]
    SchemaMismatch {
        declared: usize,
        received: usize,
        duplicated: Vec<String>,
    },
}

/// Errors surfaced by database backends
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("backend is not connected")]
    NotConnected,

    #[error(transparent)]
    Coerce(#[from] CoerceError),
}
