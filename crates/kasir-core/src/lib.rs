//! # kasir-core: Pure Business Types for Kasir POS
//!
//! This crate holds the domain model shared by the checkout engine, the
//! report engine and the SQLite adapter. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Caller (CLI today, HTTP layer elsewhere)           │   │
//! │  │        checkout(items) ──────────────── report(start, end)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        kasir-engine: CheckoutEngine, ReportEngine               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ uses types from                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ CoreError │  │ cart rules│  │   │
//! │  │   │  Report   │  │  checked  │  │ StoreError│  │   dates   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Transaction, Report, ReportWindow)
//! - [`money`] - Integer rupiah amounts with checked arithmetic
//! - [`error`] - Domain and storage error taxonomy
//! - [`validation`] - Cart and input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::money::Money;
//!
//! let price = Money::from_rupiah(3500);
//! let subtotal = price.checked_mul_quantity(3).unwrap();
//! assert_eq!(subtotal.rupiah(), 10500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{
    CoreError, CoreResult, ErrorCode, ErrorResponse, StoreError, StoreResult, ValidationError,
};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Name reported when a window has no sales at all.
pub const NO_TOP_PRODUCT_NAME: &str = "-";

/// Date format accepted for report window bounds.
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";
