//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::cache::schema::{has_distinct_columns, is_sql_identifier};
use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

const MAX_TIMEOUT_MS: u64 = 300_000;

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(invalid(field, "must be at least 1ms"));
    }
    if value > MAX_TIMEOUT_MS {
        return Err(invalid(field, "must not exceed 5 minutes (300000ms)"));
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `recency_window_secs` is 0 or exceeds one day
    /// - `max_urls_count` is 0 or exceeds 1000
    /// - any timeout is 0 or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - the table or a field name is not a plain SQL identifier
    /// - two field names collide, ignoring ASCII case
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recency_window_secs == 0 {
            return Err(invalid("recency_window_secs", "must be at least 1 second"));
        }
        if self.recency_window_secs > 86_400 {
            return Err(invalid("recency_window_secs", "must not exceed one day (86400s)"));
        }

        if self.max_urls_count == 0 {
            return Err(invalid("max_urls_count", "must be greater than 0"));
        }
        if self.max_urls_count > 1_000 {
            return Err(invalid("max_urls_count", "must not exceed 1000"));
        }

        check_timeout("fetch_timeout_ms", self.fetch_timeout_ms)?;
        check_timeout("store_timeout_ms", self.store_timeout_ms)?;
        check_timeout("request_timeout_ms", self.request_timeout_ms)?;

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        let names = [
            ("table", &self.table),
            ("field_names.url", &self.field_names.url),
            ("field_names.content", &self.field_names.content),
            ("field_names.created_at", &self.field_names.created_at),
        ];
        for (field, name) in names {
            if !is_sql_identifier(name) {
                return Err(invalid(
                    field,
                    "must contain only ASCII letters, digits and '_', not start with a digit, and not be an SQL keyword",
                ));
            }
        }

        if !has_distinct_columns(&self.field_names) {
            return Err(invalid("field_names", "column names must be distinct"));
        }

        if self.request_timeout_ms < self.fetch_timeout_ms {
            tracing::warn!(
                request_timeout_ms = self.request_timeout_ms,
                fetch_timeout_ms = self.fetch_timeout_ms,
                "request_timeout_ms is shorter than fetch_timeout_ms; \
                 slow fetches will hit the request deadline first"
            );
        }

        Ok(())
    }
}
