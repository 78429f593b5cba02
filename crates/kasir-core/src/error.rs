//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  ├── CoreError        - What checkout/report callers see               │
//! │  ├── ValidationError  - Malformed cart or report input                 │
//! │  └── StoreError       - Persistence failures, adapter independent      │
//! │                                                                         │
//! │  kasir-db errors (separate crate)                                      │
//! │  └── DbError          - sqlx failures, converted into StoreError       │
//! │                                                                         │
//! │  Flow: DbError → StoreError → CoreError → ErrorResponse → Caller       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Core Error
// =============================================================================

/// Errors surfaced by checkout and reporting.
///
/// Every variant carries enough context (kind plus offending product id)
/// for the caller to build a user-facing message.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed cart or report input. Raised before any side effect.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A cart line references a product id that does not exist.
    #[error("Product id {0} not found")]
    ProductNotFound(i64),

    /// Requested quantity exceeds the available stock.
    ///
    /// ## When This Occurs
    /// ```text
    /// Checkout A (qty: 1) ──┐
    ///                       ├──► stock = 1
    /// Checkout B (qty: 1) ──┘
    ///      │
    ///      ▼
    /// A's conditional decrement wins, B's affects 0 rows
    ///      │
    ///      ▼
    /// B fails: InsufficientStock { product_id, requested: 1 }
    /// ```
    #[error("Insufficient stock for product id {product_id}: requested {requested}")]
    InsufficientStock { product_id: i64, requested: i64 },

    /// Underlying persistence failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl CoreError {
    /// Creates an InsufficientStock error.
    pub fn insufficient_stock(product_id: i64, requested: i64) -> Self {
        CoreError::InsufficientStock {
            product_id,
            requested,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::Storage(_) => ErrorCode::StorageError,
        }
    }

    /// The product id this error is about, if any.
    pub fn product_id(&self) -> Option<i64> {
        match self {
            CoreError::ProductNotFound(id) => Some(*id),
            CoreError::InsufficientStock { product_id, .. } => Some(*product_id),
            CoreError::Validation(_) | CoreError::Storage(_) => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any store is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

// =============================================================================
// Store Error
// =============================================================================

/// Persistence failures reported by a store adapter.
///
/// Adapters translate their native errors (sqlx, I/O) into these variants so
/// the engines stay storage-agnostic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store cannot be reached (pool closed, connection refused, timeout).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A constraint rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// A statement failed to execute.
    #[error("query failed: {0}")]
    Query(String),

    /// Beginning, committing or rolling back the unit failed.
    #[error("transaction failed: {0}")]
    Transaction(String),

    #[error("internal store error: {0}")]
    Internal(String),
}

// =============================================================================
// Caller-Facing Error Body
// =============================================================================

/// Error codes for callers.
///
/// HTTP status mapping is the caller's concern; a typical mapping is noted
/// on each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed input (400)
    ValidationError,
    /// Unknown product (404)
    ProductNotFound,
    /// Not enough stock (409)
    InsufficientStock,
    /// Persistence failure (500)
    StorageError,
}

/// Serializable error returned to callers.
///
/// ```json
/// { "code": "INSUFFICIENT_STOCK", "product_id": 2, "message": "..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub product_id: Option<i64>,
    pub message: String,
}

impl From<&CoreError> for ErrorResponse {
    fn from(err: &CoreError) -> Self {
        ErrorResponse {
            code: err.code(),
            product_id: err.product_id(),
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for ErrorResponse {
    fn from(err: CoreError) -> Self {
        ErrorResponse::from(&err)
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for store adapter results.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
