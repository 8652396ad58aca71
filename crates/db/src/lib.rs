//! SQLite pool factory and schema bootstrap.
//!
//! The pool is opened once at startup and handed to stores explicitly;
//! nothing in this crate keeps process-wide state.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use bookshelf_kernel::settings::DatabaseSettings;
use bookshelf_kernel::Schema;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if absent) the file-backed store described by `settings`
    pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Self> {
        if let Some(parent) = settings.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&settings.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_millis(settings.busy_timeout_ms));

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open database {}", settings.path.display()))?;

        tracing::info!(
            target: "bookshelf-db",
            path = %settings.path.display(),
            max_connections = settings.max_connections,
            "database opened"
        );

        Ok(Self { pool })
    }

    /// Open a private in-memory store.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the pool
    /// is pinned to a single connection that is never recycled.
    pub async fn connect_in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .with_context(|| "invalid in-memory database url")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .with_context(|| "failed to open in-memory database")?;

        Ok(Self { pool })
    }

    /// Shared pool handle for stores
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Execute one module's table definition
    pub async fn apply_schema(&self, module: &str, schema: &Schema) -> anyhow::Result<()> {
        tracing::info!(
            target: "bookshelf-db",
            module,
            schema = schema.id,
            "applying schema"
        );

        sqlx::raw_sql(schema.ddl)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to apply schema '{}' for module '{}'", schema.id, module))?;

        Ok(())
    }
}
