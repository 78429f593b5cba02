//! # CLI Error Type
//!
//! Every failure ends up as one JSON [`ErrorResponse`] on stderr and a
//! non-zero exit status.
//!
//! ```text
//! CoreError ─────────────► ErrorResponse::from(&err)     exit 2..=5
//! DbError (repositories) ► STORAGE_ERROR                 exit 5
//! ConfigError, bad JSON ─► VALIDATION_ERROR              exit 1 / 2
//! ```

use kasir_core::{CoreError, ErrorCode, ErrorResponse};
use kasir_db::DbError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// The caller-facing error body.
    pub fn response(&self) -> ErrorResponse {
        match self {
            CliError::Core(err) => ErrorResponse::from(err),
            CliError::Database(_) => ErrorResponse {
                code: ErrorCode::StorageError,
                product_id: None,
                message: self.to_string(),
            },
            CliError::Config(_) | CliError::Json(_) => ErrorResponse {
                code: ErrorCode::ValidationError,
                product_id: None,
                message: self.to_string(),
            },
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) => 1,
            CliError::Json(_) => 2,
            CliError::Database(_) => 5,
            CliError::Core(err) => match err.code() {
                ErrorCode::ValidationError => 2,
                ErrorCode::ProductNotFound => 3,
                ErrorCode::InsufficientStock => 4,
                ErrorCode::StorageError => 5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_keep_their_code() {
        let err = CliError::from(CoreError::insufficient_stock(2, 1));
        let body = err.response();
        assert_eq!(body.code, ErrorCode::InsufficientStock);
        assert_eq!(body.product_id, Some(2));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_database_errors_are_storage_errors() {
        let err = CliError::from(DbError::PoolExhausted);
        assert_eq!(err.response().code, ErrorCode::StorageError);
        assert_eq!(err.exit_code(), 5);
    }
}
