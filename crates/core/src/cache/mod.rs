//! SQLite-backed store for URL content records.
//!
//! This module provides a persistent, append-only record store using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Configurable table and column names
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Recency-filtered reads and batched inserts
//!
//! Stale rows are never deleted; readers filter them out by timestamp.

pub mod connection;
pub mod migrations;
pub mod records;
pub mod schema;
pub mod timed;

pub use crate::Error;

pub use connection::CacheDb;
pub use records::CacheRecord;
pub use schema::RecordSchema;
pub use timed::TimedStore;
