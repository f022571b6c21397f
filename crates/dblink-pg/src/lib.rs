//! dblink PostgreSQL Backend
//!
//! This crate provides the PostgreSQL implementation of the dblink driver
//! interface, speaking the wire protocol through tokio-postgres.

pub mod backend;
pub mod config;
pub mod escape;

pub use backend::PgBackend;
pub use config::PgConfig;
pub use escape::escape_literal;
