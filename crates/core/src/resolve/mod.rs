//! Fetch-or-cache resolution of URL batches.
//!
//! A batch is resolved in three phases:
//!
//! 1. Read every record inside the recency window and index it by URL.
//!    A failed read is logged and treated as an empty cache.
//! 2. Reuse indexed content for hits and fetch all misses concurrently.
//!    The first failed fetch aborts the remaining ones and fails the batch.
//! 3. Write the freshly fetched content back in one batch. A failed write
//!    is logged and never affects the response.

pub mod index;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use crate::Error;
use crate::cache::CacheRecord;
use crate::traits::{CacheStore, SiteFetcher};

pub use index::SnapshotIndex;

/// Content returned to the caller for one requested URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ContentSnapshot {
    /// The URL exactly as requested.
    pub url: String,
    /// Page body, either cached or freshly fetched.
    #[serde(rename = "data")]
    pub content: String,
}

/// Immutable orchestrator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Maximum age of a cache record that may still be reused.
    pub recency_window: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { recency_window: Duration::from_secs(60) }
    }
}

/// Outcome of [`Resolver::lookup`]: snapshots in input order, plus the
/// positions that were fetched rather than served from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBatch {
    pub snapshots: Vec<ContentSnapshot>,
    /// Ascending positions into `snapshots`.
    pub fetched: Vec<usize>,
}

impl ResolvedBatch {
    pub fn into_snapshots(self) -> Vec<ContentSnapshot> {
        self.snapshots
    }
}

/// Resolves URL batches against a cache store and a site fetcher.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn CacheStore>,
    fetcher: Arc<dyn SiteFetcher>,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(store: Arc<dyn CacheStore>, fetcher: Arc<dyn SiteFetcher>, config: ResolverConfig) -> Self {
        Self { store, fetcher, config }
    }

    pub fn config(&self) -> ResolverConfig {
        self.config
    }

    /// Resolve `urls` to one snapshot each, in input order.
    ///
    /// Callers must pass a non-empty, already validated list. Fails only
    /// when a remote fetch fails; cache errors are absorbed.
    pub async fn resolve(&self, urls: &[String]) -> Result<Vec<ContentSnapshot>, Error> {
        let batch = self.lookup(urls).await?;
        self.persist(&batch).await;
        Ok(batch.snapshots)
    }

    /// Phases 1 and 2: read the cache window, reuse hits and fetch misses.
    ///
    /// Nothing is written to the store. Pass the result to [`Resolver::persist`]
    /// to cache what was fetched.
    pub async fn lookup(&self, urls: &[String]) -> Result<ResolvedBatch, Error> {
        let index = self.load_index().await;

        let mut slots: Vec<Option<String>> = vec![None; urls.len()];
        let mut join_set = JoinSet::new();

        for (position, url) in urls.iter().enumerate() {
            if let Some(record) = index.get(url) {
                tracing::debug!(url = %url, created_at = record.created_at, "cache hit");
                slots[position] = Some(record.content.clone());
                continue;
            }

            tracing::debug!(url = %url, "cache miss");
            let fetcher = Arc::clone(&self.fetcher);
            let url = url.clone();
            join_set.spawn(async move {
                let content = fetcher.fetch(&url).await?;
                Ok::<_, Error>((position, content))
            });
        }

        let mut fetched = Vec::with_capacity(join_set.len());
        while let Some(joined) = join_set.join_next().await {
            let outcome = joined
                .map_err(|e| Error::Internal(format!("fetch task failed: {e}")))
                .and_then(|result| result);

            match outcome {
                Ok((position, content)) => {
                    slots[position] = Some(content);
                    fetched.push(position);
                }
                Err(err) => {
                    join_set.shutdown().await;
                    return Err(err);
                }
            }
        }

        let snapshots = urls
            .iter()
            .zip(slots)
            .map(|(url, slot)| {
                slot.map(|content| ContentSnapshot { url: url.clone(), content })
                    .ok_or_else(|| Error::Internal(format!("no content resolved for {url}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        fetched.sort_unstable();

        Ok(ResolvedBatch { snapshots, fetched })
    }

    /// Phase 3: write the freshly fetched entries of `batch` back to the store.
    ///
    /// Best effort. A failed write is logged and swallowed.
    pub async fn persist(&self, batch: &ResolvedBatch) {
        self.write_back(&batch.snapshots, &batch.fetched).await;
    }

    async fn load_index(&self) -> SnapshotIndex {
        let window = i64::try_from(self.config.recency_window.as_secs()).unwrap_or(i64::MAX);
        let after = Utc::now().timestamp().saturating_sub(window);

        match self.store.find_since(after).await {
            Ok(records) => SnapshotIndex::from_records(records),
            Err(err) => {
                tracing::error!(error = %err, "failed to read cached records, continuing without cache");
                SnapshotIndex::default()
            }
        }
    }

    async fn write_back(&self, snapshots: &[ContentSnapshot], fetched: &[usize]) {
        if fetched.is_empty() {
            return;
        }

        let created_at = Utc::now().timestamp();
        let records: Vec<CacheRecord> = fetched
            .iter()
            .map(|&position| {
                let snapshot = &snapshots[position];
                CacheRecord::new(snapshot.url.clone(), snapshot.content.clone(), created_at)
            })
            .collect();

        if let Err(err) = self.store.insert_many(&records).await {
            tracing::error!(error = %err, records = records.len(), "failed to store fetched content");
        }
    }
}
