//! CLI configuration.
//!
//! Loaded from environment variables (after an optional `.env` file) with
//! fallback to defaults.
//!
//! | Variable                      | Default      |
//! |-------------------------------|--------------|
//! | `KASIR_DB_PATH`               | `./kasir.db` |
//! | `KASIR_DB_MAX_READERS`        | `4`          |
//! | `KASIR_DB_CONNECT_TIMEOUT_MS` | `30000`      |
//! | `KASIR_DB_BUSY_TIMEOUT_MS`    | `5000`       |
//! | `KASIR_DB_RUN_MIGRATIONS`     | `true`       |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use kasir_db::DbConfig;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file, or `:memory:`
    pub db_path: PathBuf,

    /// Reader pool size
    pub max_readers: u32,

    /// Pool acquire timeout
    pub connect_timeout: Duration,

    /// SQLite busy timeout
    pub busy_timeout: Duration,

    /// Apply pending migrations on start
    pub run_migrations: bool,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is normal.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(AppConfig {
            db_path: lookup("KASIR_DB_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./kasir.db")),

            max_readers: parse_or(&lookup, "KASIR_DB_MAX_READERS", 4)?,

            connect_timeout: Duration::from_millis(parse_or(&lookup, "KASIR_DB_CONNECT_TIMEOUT_MS", 30_000)?),

            busy_timeout: Duration::from_millis(parse_or(&lookup, "KASIR_DB_BUSY_TIMEOUT_MS", 5000)?),

            run_migrations: parse_or(&lookup, "KASIR_DB_RUN_MIGRATIONS", true)?,
        })
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        let base = if self.db_path.as_os_str() == kasir_db::pool::IN_MEMORY_PATH {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.db_path).max_readers(self.max_readers)
        };

        base.connect_timeout(self.connect_timeout)
            .busy_timeout(self.busy_timeout)
            .run_migrations(self.run_migrations)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        _ => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
