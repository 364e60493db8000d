//! sites_data tool implementation.
//!
//! Resolves a batch of URLs to their content, reusing recently fetched
//! snapshots from the cache and fetching the rest in parallel.

use std::time::Instant;

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sitesnap_core::{AppConfig, ContentSnapshot, Error, Resolver};

use crate::validator::validate_urls;

/// Input parameters for sites_data tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SitesDataParams {
    /// URLs to resolve. The response keeps this order.
    pub urls: Vec<String>,
}

/// Implementation of the sites_data tool.
///
/// Every call is logged with its URL count, outcome and elapsed time: at
/// debug level on success, at error level with the full cause on failure.
pub async fn sites_data_impl(
    resolver: &Resolver, config: &AppConfig, params: SitesDataParams,
) -> Result<CallToolResult, McpError> {
    let started = Instant::now();
    let outcome = resolve_batch(resolver, config, &params.urls).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let snapshots = match outcome {
        Ok(snapshots) => {
            tracing::debug!(method = "sites_data", urls = params.urls.len(), elapsed_ms, "request served");
            snapshots
        }
        Err(err) => {
            tracing::error!(method = "sites_data", urls = ?params.urls, elapsed_ms, error = %err, "request failed");
            return Err(err.into());
        }
    };

    let json = serde_json::to_string_pretty(&snapshots)
        .map_err(|e| Error::Internal(format!("failed to encode response: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// The request deadline covers the cache read and the fetches.
/// The write-back runs after it, bounded only by the store timeout.
async fn resolve_batch(resolver: &Resolver, config: &AppConfig, urls: &[String]) -> Result<Vec<ContentSnapshot>, Error> {
    validate_urls(urls, config.max_urls_count)?;

    let batch = tokio::time::timeout(config.request_timeout(), resolver.lookup(urls))
        .await
        .map_err(|_| Error::RequestTimeout(format!("batch exceeded {}ms", config.request_timeout_ms)))??;

    resolver.persist(&batch).await;

    Ok(batch.into_snapshots())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitesnap_core::{CacheDb, CacheRecord, CacheStore, RecordSchema, ResolverConfig, SiteFetcher};
    use std::sync::Arc;
    use std::time::Duration;

    struct EchoFetcher;

    #[async_trait::async_trait]
    impl SiteFetcher for EchoFetcher {
        async fn fetch(&self, url: &str) -> Result<String, Error> {
            if url.contains("broken") {
                return Err(Error::fetch_failed(url, "failed to make request: connection reset"));
            }
            if url.contains("slow") {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Ok(format!("body of {url}"))
        }
    }

    async fn setup() -> (Resolver, CacheDb) {
        let db = CacheDb::open_in_memory(RecordSchema::default()).await.unwrap();
        let resolver = Resolver::new(Arc::new(db.clone()), Arc::new(EchoFetcher), ResolverConfig::default());
        (resolver, db)
    }

    fn params(list: &[&str]) -> SitesDataParams {
        SitesDataParams { urls: list.iter().map(|u| u.to_string()).collect() }
    }

    fn output_of(result: &CallToolResult) -> Vec<ContentSnapshot> {
        let text = &result.content[0].as_text().unwrap().text;
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_sites_data_success() {
        let (resolver, db) = setup().await;
        let ten_seconds_ago = chrono::Utc::now().timestamp() - 10;
        db.insert_records(&[CacheRecord::new("https://a.test", "A", ten_seconds_ago)])
            .await
            .unwrap();

        let result = sites_data_impl(&resolver, &AppConfig::default(), params(&["https://a.test", "https://b.test"]))
            .await
            .unwrap();

        let output = output_of(&result);
        assert_eq!(output[0], ContentSnapshot { url: "https://a.test".into(), content: "A".into() });
        assert_eq!(output[1], ContentSnapshot { url: "https://b.test".into(), content: "body of https://b.test".into() });
        assert_eq!(db.count_records().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_sites_data_json_shape() {
        let (resolver, _db) = setup().await;
        let result = sites_data_impl(&resolver, &AppConfig::default(), params(&["https://b.test"]))
            .await
            .unwrap();

        let text = &result.content[0].as_text().unwrap().text;
        let value: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(value[0]["url"], "https://b.test");
        assert_eq!(value[0]["data"], "body of https://b.test");
    }

    #[tokio::test]
    async fn test_sites_data_empty_urls() {
        let (resolver, _db) = setup().await;
        let err = sites_data_impl(&resolver, &AppConfig::default(), params(&[]))
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_sites_data_too_many_urls() {
        let (resolver, _db) = setup().await;
        let config = AppConfig { max_urls_count: 1, ..Default::default() };
        let err = sites_data_impl(&resolver, &config, params(&["https://a.test", "https://b.test"]))
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_sites_data_fetch_failure_maps_to_gateway_error() {
        let (resolver, db) = setup().await;
        let err = sites_data_impl(&resolver, &AppConfig::default(), params(&["https://a.test", "https://broken.test"]))
            .await
            .unwrap_err();

        assert_eq!(err.code.0, -32008);
        assert!(err.message.contains("https://broken.test"));
        assert!(!err.message.contains("connection reset"));
        assert_eq!(db.count_records().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sites_data_request_timeout() {
        let (resolver, _db) = setup().await;
        let config = AppConfig { request_timeout_ms: 200, ..Default::default() };
        let err = sites_data_impl(&resolver, &config, params(&["https://slow.test"]))
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32006);
    }

    /// Store whose writes outlast the request deadline and then fail.
    struct SlowWriteStore;

    #[async_trait::async_trait]
    impl CacheStore for SlowWriteStore {
        async fn find_since(&self, _after: i64) -> Result<Vec<CacheRecord>, Error> {
            Ok(Vec::new())
        }

        async fn insert_many(&self, _records: &[CacheRecord]) -> Result<(), Error> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Err(Error::CacheUnavailable("write timed out".into()))
        }
    }

    #[tokio::test]
    async fn test_slow_write_back_does_not_time_out_request() {
        let resolver = Resolver::new(Arc::new(SlowWriteStore), Arc::new(EchoFetcher), ResolverConfig::default());
        let config = AppConfig { request_timeout_ms: 200, ..Default::default() };

        let result = sites_data_impl(&resolver, &config, params(&["https://b.test"]))
            .await
            .unwrap();

        assert_eq!(
            output_of(&result),
            vec![ContentSnapshot { url: "https://b.test".into(), content: "body of https://b.test".into() }]
        );
    }
}
