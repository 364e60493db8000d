//! Capability traits for the orchestrator's collaborators.
//!
//! The resolver only ever talks to a cache store and a site fetcher through
//! these traits, so either side can be swapped for a test double.

use crate::Error;
use crate::cache::CacheRecord;

/// Document store holding `(url, content, created_at)` records.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// All records with `created_at > after`, sorted by `created_at`
    /// ascending. Returns an empty list when nothing matches.
    async fn find_since(&self, after: i64) -> Result<Vec<CacheRecord>, Error>;

    /// Persist `records` in one batch. Partial-insert behavior is up to the
    /// store.
    async fn insert_many(&self, records: &[CacheRecord]) -> Result<(), Error>;
}

/// Retrieves the current content of a URL.
#[async_trait::async_trait]
pub trait SiteFetcher: Send + Sync {
    /// Fetch `url`, failing with [`Error::FetchFailed`] on any transport
    /// error or non-success status.
    async fn fetch(&self, url: &str) -> Result<String, Error>;
}
