//! # In-Memory Store
//!
//! A store kept entirely in process memory, used by the engine tests and by
//! anyone who needs the engines without SQLite.
//!
//! ## Isolation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   writer: Mutex<()>          committed: RwLock<Arc<MemoryState>>        │
//! │        │                               │                                │
//! │  begin()                         snapshot()                             │
//! │   ├── lock writer (owned)          └── clone the Arc (no copy)          │
//! │   └── clone committed state                                             │
//! │        │                                                                │
//! │   unit mutates its own copy                                             │
//! │        │                                                                │
//! │   commit() ──► swap copy into committed, release writer                 │
//! │   rollback() / drop ──► discard copy, release writer                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures can be injected at any step with [`MemoryStore::fail_next`].

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use kasir_core::{
    NewProduct, Product, ReportWindow, SalesSummary, StoreError, StoreResult, TopProduct,
    Transaction, TransactionDetail, TransactionHeader,
};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::store::{CheckoutStore, CheckoutUnit, ReportSnapshot, ReportStore};

// =============================================================================
// State
// =============================================================================

/// Everything the store holds, as one immutable value per commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryState {
    pub products: BTreeMap<i64, Product>,
    pub transactions: Vec<Transaction>,
    next_product_id: i64,
    next_transaction_id: i64,
}

impl MemoryState {
    fn transactions_in<'a>(
        &'a self,
        window: &'a ReportWindow,
        today: NaiveDate,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |tx| window.contains(tx.created_at.date_naive(), today))
    }
}

/// Step at which the next unit should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Begin,
    Lookup,
    Decrement,
    /// The decrement for this product id reports "not enough stock" even
    /// though the lookup saw plenty, as when another writer got there first.
    RejectDecrement(i64),
    InsertTransaction,
    InsertDetail,
    Commit,
}

type FailSlot = Arc<Mutex<Option<FailPoint>>>;

/// Disarms `point` if it is the one armed.
async fn take(slot: &FailSlot, point: FailPoint) -> bool {
    let mut armed = slot.lock().await;
    if *armed == Some(point) {
        *armed = None;
        return true;
    }
    false
}

/// Fires an armed fail point once.
async fn trip(slot: &FailSlot, point: FailPoint) -> StoreResult<()> {
    if take(slot, point).await {
        return Err(StoreError::Internal(format!(
            "injected failure at {:?}",
            point
        )));
    }
    Ok(())
}

// =============================================================================
// Store
// =============================================================================

/// In-memory implementation of both store capabilities.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    writer: Arc<Mutex<()>>,
    committed: Arc<RwLock<Arc<MemoryState>>>,
    fail_point: FailSlot,
    clock: Option<DateTime<Utc>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with `products`, keeping their ids.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut state = MemoryState::default();
        for product in products {
            state.next_product_id = state.next_product_id.max(product.id);
            state.products.insert(product.id, product);
        }
        MemoryStore {
            committed: Arc::new(RwLock::new(Arc::new(state))),
            ..Self::default()
        }
    }

    /// Pins the store clock. Used for timestamps and for "today".
    pub fn with_fixed_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }

    /// Arms a one-shot failure for the next unit reaching `point`.
    pub async fn fail_next(&self, point: FailPoint) {
        *self.fail_point.lock().await = Some(point);
    }

    /// The latest committed state.
    pub async fn state(&self) -> Arc<MemoryState> {
        Arc::clone(&*self.committed.read().await)
    }

    pub async fn product(&self, product_id: i64) -> Option<Product> {
        self.state().await.products.get(&product_id).cloned()
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.state().await.transactions.clone()
    }

    /// Adds a product outside of any checkout.
    pub async fn insert_product(&self, new: NewProduct) -> Product {
        let _writer = self.writer.lock().await;
        let mut committed = self.committed.write().await;
        let mut state = MemoryState::clone(&committed);

        state.next_product_id += 1;
        let product = Product {
            id: state.next_product_id,
            name: new.name,
            unit_price: new.unit_price,
            stock: new.stock,
        };
        state.products.insert(product.id, product.clone());

        *committed = Arc::new(state);
        product
    }

    /// Stores a finished transaction with an explicit timestamp.
    ///
    /// Stock is left untouched. Report tests use this to place sales on
    /// specific dates.
    pub async fn import_transaction(
        &self,
        created_at: DateTime<Utc>,
        details: Vec<TransactionDetail>,
    ) -> Transaction {
        let _writer = self.writer.lock().await;
        let mut committed = self.committed.write().await;
        let mut state = MemoryState::clone(&committed);

        state.next_transaction_id += 1;
        let id = state.next_transaction_id;
        let details: Vec<TransactionDetail> = details
            .into_iter()
            .map(|detail| TransactionDetail {
                transaction_id: id,
                ..detail
            })
            .collect();
        let transaction = Transaction {
            id,
            total_amount: details.iter().map(|d| d.subtotal).sum(),
            created_at,
            details,
        };
        state.transactions.push(transaction.clone());

        *committed = Arc::new(state);
        transaction
    }
}

// =============================================================================
// Checkout Unit
// =============================================================================

/// A write unit holding the writer lock and a private copy of the state.
pub struct MemoryCheckoutUnit {
    _writer: OwnedMutexGuard<()>,
    committed: Arc<RwLock<Arc<MemoryState>>>,
    working: MemoryState,
    fail_point: FailSlot,
    now: DateTime<Utc>,
}

#[async_trait]
impl CheckoutStore for MemoryStore {
    type Unit = MemoryCheckoutUnit;

    async fn begin(&self) -> StoreResult<Self::Unit> {
        trip(&self.fail_point, FailPoint::Begin).await?;

        let writer = Arc::clone(&self.writer).lock_owned().await;
        let working = MemoryState::clone(&*self.committed.read().await);

        Ok(MemoryCheckoutUnit {
            _writer: writer,
            committed: Arc::clone(&self.committed),
            working,
            fail_point: Arc::clone(&self.fail_point),
            now: self.now(),
        })
    }
}

#[async_trait]
impl CheckoutUnit for MemoryCheckoutUnit {
    async fn lookup_product(&mut self, product_id: i64) -> StoreResult<Option<Product>> {
        trip(&self.fail_point, FailPoint::Lookup).await?;
        Ok(self.working.products.get(&product_id).cloned())
    }

    async fn decrement_stock(&mut self, product_id: i64, quantity: i64) -> StoreResult<bool> {
        trip(&self.fail_point, FailPoint::Decrement).await?;
        if take(&self.fail_point, FailPoint::RejectDecrement(product_id)).await {
            return Ok(false);
        }
        match self.working.products.get_mut(&product_id) {
            Some(product) if product.stock >= quantity => {
                product.stock -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_transaction(&mut self, total_amount: i64) -> StoreResult<TransactionHeader> {
        trip(&self.fail_point, FailPoint::InsertTransaction).await?;

        self.working.next_transaction_id += 1;
        let header = TransactionHeader {
            id: self.working.next_transaction_id,
            total_amount,
            created_at: self.now,
        };
        self.working
            .transactions
            .push(Transaction::from_parts(header.clone(), Vec::new()));
        Ok(header)
    }

    async fn insert_detail(&mut self, detail: &TransactionDetail) -> StoreResult<()> {
        trip(&self.fail_point, FailPoint::InsertDetail).await?;

        let transaction = self
            .working
            .transactions
            .iter_mut()
            .find(|tx| tx.id == detail.transaction_id)
            .ok_or_else(|| {
                StoreError::Constraint(format!(
                    "transaction {} does not exist",
                    detail.transaction_id
                ))
            })?;
        transaction.details.push(detail.clone());
        Ok(())
    }

    async fn commit(self) -> StoreResult<()> {
        trip(&self.fail_point, FailPoint::Commit).await?;
        *self.committed.write().await = Arc::new(self.working);
        Ok(())
    }

    async fn rollback(self) -> StoreResult<()> {
        Ok(())
    }
}

// =============================================================================
// Report Snapshot
// =============================================================================

/// A pinned committed state plus the date "today" resolved when it was taken.
pub struct MemorySnapshot {
    state: Arc<MemoryState>,
    today: NaiveDate,
}

#[async_trait]
impl ReportStore for MemoryStore {
    type Snapshot = MemorySnapshot;

    async fn snapshot(&self) -> StoreResult<Self::Snapshot> {
        Ok(MemorySnapshot {
            state: self.state().await,
            today: self.now().date_naive(),
        })
    }
}

#[async_trait]
impl ReportSnapshot for MemorySnapshot {
    async fn aggregate(&mut self, window: &ReportWindow) -> StoreResult<SalesSummary> {
        let mut summary = SalesSummary::default();
        for tx in self.state.transactions_in(window, self.today) {
            summary.total_revenue += tx.total_amount;
            summary.transaction_count += 1;
        }
        Ok(summary)
    }

    async fn top_product(&mut self, window: &ReportWindow) -> StoreResult<Option<TopProduct>> {
        // product id → (quantity sold, latest name in window)
        let mut sold: BTreeMap<i64, (i64, &str)> = BTreeMap::new();
        for tx in self.state.transactions_in(window, self.today) {
            for detail in &tx.details {
                let entry = sold.entry(detail.product_id).or_insert((0, ""));
                entry.0 += detail.quantity;
                entry.1 = &detail.product_name;
            }
        }

        let mut best: Option<(i64, &str)> = None;
        for (quantity, name) in sold.into_values() {
            if best.map_or(true, |(top, _)| quantity > top) {
                best = Some((quantity, name));
            }
        }

        Ok(best.map(|(quantity_sold, name)| TopProduct {
            name: name.to_string(),
            quantity_sold,
        }))
    }

    async fn finish(self) -> StoreResult<()> {
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
