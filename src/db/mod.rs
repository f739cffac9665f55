//! SQLite persistence for babylog.
//!
//! [`db::Db`] owns the connection and brings the schema up to date through
//! [`migrations`]; [`records::RecordStore`] is the typed CRUD and query
//! surface over it and [`shared::SharedStore`] wraps that for async callers.

/// Connection setup and schema bootstrap.
pub mod db;

/// Versioned schema changes and their history table.
pub mod migrations;

pub mod records;
pub mod shared;
