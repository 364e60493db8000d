//! Cache record reads and writes.
//!
//! Records are append-only: a URL may have any number of rows, and readers
//! pick the most recent one inside their recency window.

use super::connection::CacheDb;
use crate::Error;
use crate::traits::CacheStore;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;

/// A persisted snapshot of one URL's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub url: String,
    pub content: String,
    /// Unix timestamp in seconds.
    pub created_at: i64,
}

impl CacheRecord {
    pub fn new(url: impl Into<String>, content: impl Into<String>, created_at: i64) -> Self {
        Self { url: url.into(), content: content.into(), created_at }
    }
}

impl CacheDb {
    /// Fetch every record created strictly after `after`, oldest first.
    ///
    /// Rows sharing a timestamp come back in insertion order.
    pub async fn records_since(&self, after: i64) -> Result<Vec<CacheRecord>, Error> {
        let sql = self.select_since_sql.clone();
        self.conn
            .call(move |conn| -> Result<Vec<CacheRecord>, Error> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![after], |row| {
                    Ok(CacheRecord { url: row.get(0)?, content: row.get(1)?, created_at: row.get(2)? })
                })?;

                let mut records = Vec::new();
                for row in rows {
                    records.push(row?);
                }
                Ok(records)
            })
            .await
            .map_err(Error::from)
    }

    /// Insert all `records` in one transaction.
    ///
    /// An empty slice is a no-op and does not touch the database.
    pub async fn insert_records(&self, records: &[CacheRecord]) -> Result<(), Error> {
        if records.is_empty() {
            return Ok(());
        }

        let sql = self.insert_sql.clone();
        let records = records.to_vec();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(&sql)?;
                    for record in &records {
                        stmt.execute(params![record.url, record.content, record.created_at])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Count all stored records, fresh or stale.
    pub async fn count_records(&self) -> Result<u64, Error> {
        let sql = self.schema.render("SELECT COUNT(*) FROM {table}");
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait::async_trait]
impl CacheStore for CacheDb {
    async fn find_since(&self, after: i64) -> Result<Vec<CacheRecord>, Error> {
        self.records_since(after).await
    }

    async fn insert_many(&self, records: &[CacheRecord]) -> Result<(), Error> {
        self.insert_records(records).await
    }
}
