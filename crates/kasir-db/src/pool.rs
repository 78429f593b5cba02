//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pools                          │
//! │                                                                         │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pools + run migrations           │
//! │       │                                                                 │
//! │       ├──────────────────────────────┐                                  │
//! │       ▼                              ▼                                  │
//! │  ┌──────────────┐        ┌──────────────────────────────┐              │
//! │  │ writer pool  │        │        reader pool           │              │
//! │  │  ┌─────┐     │        │  ┌─────┐ ┌─────┐ ┌─────┐     │              │
//! │  │  │Conn │ (1) │        │  │Conn1│ │Conn2│ │Conn3│ ... │ (max_readers)│
//! │  │  └─────┘     │        │  └─────┘ └─────┘ └─────┘     │              │
//! │  └──────┬───────┘        └──────────────┬───────────────┘              │
//! │         │                               │                               │
//! │  checkout units queue here       reports run here in parallel          │
//! │  one at a time                   each on its own WAL snapshot          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Readers don't block the writer
//! - The writer doesn't block readers
//! - Each read transaction sees one committed snapshot
//!
//! A single writer connection means write units never contend for the
//! SQLite write lock inside one process. `busy_timeout` covers other
//! processes (for example the seed binary) touching the same file.

use std::path::PathBuf;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::product::ProductRepository;
use crate::repository::transaction::TransactionRepository;
use crate::store::SqliteStore;

/// Path value that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/kasir.db")
///     .max_readers(8)
///     .busy_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of reader connections.
    /// Default: 4
    pub max_readers: u32,

    /// How long to wait for a pooled connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a reader connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// How long SQLite waits on a locked database before giving up.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_readers: 4,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Reads and writes share one connection, so the database lives exactly
    /// as long as the `Database` handle.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_readers: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of reader connections.
    pub fn max_readers(mut self, max: u32) -> Self {
        self.max_readers = max.max(1);
        self
    }

    /// Sets the pool acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the SQLite busy timeout.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Checks if this configuration selects an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository and store access.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./kasir.db")).await?;
///
/// let checkout = CheckoutEngine::new(db.store());
/// let reports = ReportEngine::new(db.store());
/// let products = db.products().list(Some("kecap")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// Single-connection pool for every write unit.
    writer: SqlitePool,

    /// Pool for reports and lookups. Same pool as `writer` when in memory.
    reader: SqlitePool,
}

impl Database {
    /// Opens the database.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled
    ///    - busy_timeout
    /// 3. Creates the writer pool and runs migrations (if enabled)
    /// 4. Creates the reader pool
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        if config.is_in_memory() {
            return Self::new_in_memory(&config).await;
        }

        let connect_options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        debug!("Connection options configured");

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(None)
            .connect_with(connect_options.clone())
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        if config.run_migrations {
            migrations::run_migrations(&writer).await?;
        }

        let reader = SqlitePoolOptions::new()
            .max_connections(config.max_readers)
            .min_connections(0)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_readers = config.max_readers, "Database pools created");

        Ok(Database { writer, reader })
    }

    async fn new_in_memory(config: &DbConfig) -> DbResult<Self> {
        let connect_options = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        // The database disappears with its last connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        if config.run_migrations {
            migrations::run_migrations(&pool).await?;
        }

        info!("In-memory database ready");

        Ok(Database {
            writer: pool.clone(),
            reader: pool,
        })
    }

    /// Returns `(total_migrations, applied_migrations)`.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.writer).await
    }

    /// The writer pool. Prefer repositories and [`Database::store`].
    pub fn pool(&self) -> &SqlitePool {
        &self.writer
    }

    /// Catalog maintenance. Writes go through the writer connection.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.writer.clone())
    }

    /// Read access to persisted transactions.
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.reader.clone())
    }

    /// Store handle for `CheckoutEngine` and `ReportEngine`.
    pub fn store(&self) -> SqliteStore {
        SqliteStore::new(self.writer.clone(), self.reader.clone())
    }

    /// Closes both pools.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pools");
        self.reader.close().await;
        self.writer.close().await;
    }

    /// Checks if both pools can execute queries.
    pub async fn health_check(&self) -> bool {
        let writer_ok = sqlx::query("SELECT 1").execute(&self.writer).await.is_ok();
        let reader_ok = sqlx::query("SELECT 1").execute(&self.reader).await.is_ok();
        writer_ok && reader_ok
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        let (total, applied) = db.migration_status().await.unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);
    }

    #[tokio::test]
    async fn test_closed_database_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
        assert!(db.migration_status().await.is_err());
    }

    #[tokio::test]
    async fn test_unmigrated_database_reports_zero_applied() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let (total, applied) = db.migration_status().await.unwrap();
        assert!(total >= 1);
        assert_eq!(applied, 0);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/kasir.db")
            .max_readers(8)
            .busy_timeout(Duration::from_millis(250))
            .run_migrations(false);

        assert_eq!(config.max_readers, 8);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
        assert_eq!(DbConfig::new("x").max_readers(0).max_readers, 1);
    }
}
