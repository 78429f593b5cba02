//! # kasir-engine: Checkout and Reporting for Kasir POS
//!
//! The engines are written against the capability traits in [`store`]; the
//! SQLite adapter lives in `kasir-db`, the in-memory one in [`memory`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Caller ──► CheckoutEngine<S: CheckoutStore> ──┐                       │
//! │   Caller ──► ReportEngine<S: ReportStore> ──────┤                       │
//! │                                                 ▼                       │
//! │                              ┌──────────────────┴──────────────────┐    │
//! │                              │ MemoryStore        SqliteStore      │    │
//! │                              │ (this crate)       (kasir-db)       │    │
//! │                              └─────────────────────────────────────┘    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::{CheckoutItem, Product};
//! use kasir_engine::{CheckoutEngine, MemoryStore, ReportEngine};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = MemoryStore::with_products([Product {
//!     id: 1,
//!     name: "Kecap".to_string(),
//!     unit_price: 12000,
//!     stock: 20,
//! }]);
//!
//! let checkout = CheckoutEngine::new(store.clone());
//! let tx = checkout.execute(&[CheckoutItem::new(1, 2)]).await.unwrap();
//! assert_eq!(tx.total_amount, 24000);
//!
//! let report = ReportEngine::new(store).today().await.unwrap();
//! assert_eq!(report.total_transaction_count, 1);
//! # }
//! ```

pub mod checkout;
pub mod memory;
pub mod report;
pub mod store;

pub use checkout::CheckoutEngine;
pub use memory::{FailPoint, MemoryStore};
pub use report::ReportEngine;
pub use store::{CheckoutStore, CheckoutUnit, ReportSnapshot, ReportStore};
