//! # Store Capabilities
//!
//! The persistence boundary the engines are written against.
//!
//! ## Two Kinds of Access
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CheckoutStore::begin()                 ReportStore::snapshot()         │
//! │       │                                      │                          │
//! │       ▼                                      ▼                          │
//! │  CheckoutUnit (write unit)              ReportSnapshot (read view)      │
//! │  ├── lookup_product                     ├── aggregate(window)           │
//! │  ├── decrement_stock  (conditional)     ├── top_product(window)         │
//! │  ├── insert_transaction                 └── finish()                    │
//! │  ├── insert_detail                                                      │
//! │  └── commit() / rollback()                                              │
//! │                                                                         │
//! │  Everything done through one unit becomes visible together on commit,   │
//! │  or not at all. Dropping a unit without committing rolls it back.       │
//! │  Every read through one snapshot sees the same committed state.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Implementations: [`crate::memory::MemoryStore`] here, and the SQLite store
//! in `kasir-db`.

use async_trait::async_trait;
use kasir_core::{
    Product, ReportWindow, SalesSummary, StoreResult, TopProduct, TransactionDetail,
    TransactionHeader,
};

// =============================================================================
// Checkout Side
// =============================================================================

/// A store that can open atomic write units.
#[async_trait]
pub trait CheckoutStore: Send + Sync {
    type Unit: CheckoutUnit + Send;

    /// Opens a new write unit.
    ///
    /// Units may be serialized by the store; `begin` waits until the unit
    /// can proceed.
    async fn begin(&self) -> StoreResult<Self::Unit>;
}

/// One atomic unit of checkout work.
#[async_trait]
pub trait CheckoutUnit: Send {
    /// Reads a product as seen by this unit, including its own decrements.
    async fn lookup_product(&mut self, product_id: i64) -> StoreResult<Option<Product>>;

    /// Decrements stock only if at least `quantity` units remain.
    ///
    /// Returns `false` when the condition did not hold and nothing changed.
    /// This answer is the sole authority on stock sufficiency.
    async fn decrement_stock(&mut self, product_id: i64, quantity: i64) -> StoreResult<bool>;

    /// Inserts the transaction header. The store assigns id and timestamp.
    async fn insert_transaction(&mut self, total_amount: i64) -> StoreResult<TransactionHeader>;

    /// Inserts one line item referencing a header inserted by this unit.
    async fn insert_detail(&mut self, detail: &TransactionDetail) -> StoreResult<()>;

    /// Makes every change of this unit visible at once.
    async fn commit(self) -> StoreResult<()>;

    /// Discards every change of this unit.
    async fn rollback(self) -> StoreResult<()>;
}

// =============================================================================
// Report Side
// =============================================================================

/// A store that can hand out consistent read snapshots.
#[async_trait]
pub trait ReportStore: Send + Sync {
    type Snapshot: ReportSnapshot + Send;

    /// Opens a read view pinned to the latest committed state.
    async fn snapshot(&self) -> StoreResult<Self::Snapshot>;
}

/// A consistent read view used to build one report.
#[async_trait]
pub trait ReportSnapshot: Send {
    /// Revenue and transaction count of transactions inside `window`.
    async fn aggregate(&mut self, window: &ReportWindow) -> StoreResult<SalesSummary>;

    /// Product with the largest summed quantity inside `window`.
    ///
    /// Ties go to the smallest product id. The reported name is the most
    /// recent snapshot of that product within the window. `None` when the
    /// window has no sales.
    async fn top_product(&mut self, window: &ReportWindow) -> StoreResult<Option<TopProduct>>;

    /// Releases the view.
    async fn finish(self) -> StoreResult<()>;
}
