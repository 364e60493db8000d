//! Lookup of the most recent cached record per URL.

use std::collections::HashMap;

use crate::cache::CacheRecord;

/// Maps each URL to its most recent record.
///
/// Built from records sorted by `created_at` ascending: later records
/// overwrite earlier ones, so the newest record for a URL wins. Records
/// with equal timestamps keep whichever came last.
#[derive(Debug, Default, Clone)]
pub struct SnapshotIndex {
    entries: HashMap<String, CacheRecord>,
}

impl SnapshotIndex {
    pub fn from_records(records: impl IntoIterator<Item = CacheRecord>) -> Self {
        records.into_iter().collect()
    }

    pub fn get(&self, url: &str) -> Option<&CacheRecord> {
        self.entries.get(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CacheRecord> for SnapshotIndex {
    fn from_iter<I: IntoIterator<Item = CacheRecord>>(iter: I) -> Self {
        let mut entries = HashMap::new();
        for record in iter {
            entries.insert(record.url.clone(), record);
        }
        Self { entries }
    }
}
