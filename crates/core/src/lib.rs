//! Core types and shared functionality for sitesnap.
//!
//! This crate provides:
//! - The fetch-or-cache resolver and its snapshot index
//! - Capability traits for the cache store and the site fetcher
//! - Record store implementation with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod resolve;
pub mod traits;

pub use cache::{CacheDb, CacheRecord, RecordSchema, TimedStore};
pub use config::{AppConfig, ConfigError, FieldNames};
pub use error::Error;
pub use resolve::{ContentSnapshot, ResolvedBatch, Resolver, ResolverConfig, SnapshotIndex};
pub use traits::{CacheStore, SiteFetcher};
