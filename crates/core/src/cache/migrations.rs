//! Database schema migrations.
//!
//! Uses a simple version table approach to track applied migrations.
//! Each migration is a SQL template rendered against the configured
//! [`RecordSchema`], and versions are tracked per records table.

use super::Error;
use super::schema::RecordSchema;
use tokio_rusqlite::{Connection, params};

/// Migration list: (version, SQL template).
///
/// Migrations must be applied in order. All migrations are idempotent
/// using CREATE IF NOT EXISTS.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_records.sql"))];

/// Run any pending migrations for the records table named by `schema`.
///
/// # Errors
///
/// Returns an error if a migration SQL fails to execute.
pub async fn run(conn: &Connection, schema: &RecordSchema) -> Result<(), Error> {
    let scope = schema.table().to_string();
    let pending: Vec<(i64, String)> = MIGRATIONS
        .iter()
        .map(|(version, template)| (*version, schema.render(template)))
        .collect();

    conn.call(move |conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                scope TEXT NOT NULL,
                version INTEGER NOT NULL,
                applied_at TEXT NOT NULL,
                PRIMARY KEY (scope, version)
            )",
            [],
        )
        .map_err(Error::from)?;

        let current: i64 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM _migrations WHERE scope = ?1",
                params![scope],
                |row| row.get(0),
            )
            .map_err(Error::from)?;

        for (version, sql) in pending {
            if version > current {
                conn.execute_batch(&sql)
                    .map_err(|e| Error::MigrationFailed(format!("version {version}: {e}")))?;
                conn.execute(
                    "INSERT INTO _migrations (scope, version, applied_at) VALUES (?1, ?2, ?3)",
                    params![scope, version, chrono::Utc::now().to_rfc3339()],
                )
                .map_err(Error::from)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldNames;

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().await.unwrap();
        let schema = RecordSchema::default();
        run(&conn, &schema).await.unwrap();
        run(&conn, &schema).await.unwrap();

        let has_sites: bool = conn
            .call(|conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='sites')",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();

        assert!(has_sites);
    }

    #[tokio::test]
    async fn test_migrations_version_tracking() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn, &RecordSchema::default()).await.unwrap();

        let count: i64 = conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0)))
            .await
            .unwrap();

        assert_eq!(count, MIGRATIONS.len() as i64);
    }

    #[tokio::test]
    async fn test_migrations_use_configured_names() {
        let conn = Connection::open_in_memory().await.unwrap();
        let fields = FieldNames { url: "link".into(), content: "body".into(), created_at: "ts".into() };
        let schema = RecordSchema::new("pages", fields).unwrap();
        run(&conn, &schema).await.unwrap();

        let columns: Vec<String> = conn
            .call(|conn| -> Result<Vec<String>, tokio_rusqlite::rusqlite::Error> {
                let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('pages') ORDER BY cid")?;
                let names = stmt.query_map([], |row| row.get(0))?.collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .unwrap();

        assert_eq!(columns, vec!["link", "body", "ts"]);
    }
}
