//! Deadline wrapper for cache stores.

use std::time::Duration;

use crate::Error;
use crate::cache::CacheRecord;
use crate::traits::CacheStore;

/// Applies a fixed deadline to every read and write of the wrapped store.
///
/// An elapsed deadline surfaces as [`Error::CacheUnavailable`].
#[derive(Debug, Clone)]
pub struct TimedStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S> TimedStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<S: CacheStore> CacheStore for TimedStore<S> {
    async fn find_since(&self, after: i64) -> Result<Vec<CacheRecord>, Error> {
        tokio::time::timeout(self.timeout, self.inner.find_since(after))
            .await
            .map_err(|_| Error::CacheUnavailable(format!("find timed out after {}ms", self.timeout.as_millis())))?
    }

    async fn insert_many(&self, records: &[CacheRecord]) -> Result<(), Error> {
        tokio::time::timeout(self.timeout, self.inner.insert_many(records))
            .await
            .map_err(|_| Error::CacheUnavailable(format!("insert timed out after {}ms", self.timeout.as_millis())))?
    }
}
