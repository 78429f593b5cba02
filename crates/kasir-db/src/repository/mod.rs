//! # Repository Module
//!
//! Database repository implementations for Kasir POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller                                                                │
//! │       │  db.products().list(Some("kecap"))                             │
//! │       ▼                                                                 │
//! │  ProductRepository / TransactionRepository   (own a pool)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Statement functions on &mut SqliteConnection                          │
//! │       ▲                                                                 │
//! │       │                                                                 │
//! │  SqliteCheckoutUnit / SqliteReportSnapshot   (own a transaction)       │
//! │                                                                         │
//! │  The same SQL serves both: repositories acquire a pooled connection,   │
//! │  store units pass their open transaction.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog listing, lookup and insert
//! - [`transaction::TransactionRepository`] - Transaction lookup
//! - [`report`] - Window aggregates (no repository type, snapshot only)
//! - [`window`] - The shared report window predicate

pub mod product;
pub mod report;
pub mod transaction;
pub mod window;
