//! # Checkout Engine
//!
//! Turns a cart into a persisted transaction, all or nothing.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        execute(items)                                   │
//! │                                                                         │
//! │  validate_cart(items) ──✗──► ValidationError (nothing touched)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.begin() ─────────────────────────────┐ one atomic unit           │
//! │       │                                     │                           │
//! │       ▼  for each item, in input order      │                           │
//! │  lookup_product ──✗ none ──► ProductNotFound│                           │
//! │  stock < qty?  ───✗────────► InsufficientStock                          │
//! │  subtotal = harga × qty (checked)           │                           │
//! │  decrement_stock ─✗ false ─► InsufficientStock (lost race)              │
//! │       │                                     │                           │
//! │       ▼                                     │                           │
//! │  insert_transaction(total) → header         │                           │
//! │  insert_detail × n                          │                           │
//! │       │                                     │                           │
//! │       ▼                                     │                           │
//! │  commit() ◄─────────────────────────────────┘                           │
//! │                                                                         │
//! │  Any ✗ above: rollback(), return the first error.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kasir_core::validation::validate_cart;
use kasir_core::{
    CheckoutItem, CoreError, CoreResult, Money, Transaction, TransactionDetail, ValidationError,
};
use tracing::{debug, info, instrument, warn};

use crate::store::{CheckoutStore, CheckoutUnit};

// =============================================================================
// Engine
// =============================================================================

/// Executes checkouts against a [`CheckoutStore`].
///
/// The engine holds no state of its own beyond the store handle, so one
/// instance can be shared across tasks behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CheckoutEngine<S> {
    store: S,
}

impl<S: CheckoutStore> CheckoutEngine<S> {
    pub fn new(store: S) -> Self {
        CheckoutEngine { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one checkout.
    ///
    /// ## Returns
    /// * `Ok(Transaction)` - Committed sale with details in input order
    /// * `Err(CoreError::Validation)` - Empty cart or non-positive quantity
    /// * `Err(CoreError::ProductNotFound)` - Unknown product id
    /// * `Err(CoreError::InsufficientStock)` - Not enough stock, or lost a race
    /// * `Err(CoreError::Storage)` - The store failed; nothing was written
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn execute(&self, items: &[CheckoutItem]) -> CoreResult<Transaction> {
        validate_cart(items)?;

        let mut unit = self.store.begin().await?;

        match apply(&mut unit, items).await {
            Ok(transaction) => {
                unit.commit().await?;
                info!(
                    transaction_id = transaction.id,
                    total_amount = transaction.total_amount,
                    "Checkout committed"
                );
                Ok(transaction)
            }
            Err(err) => {
                if let Err(rollback_err) = unit.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed after checkout error");
                }
                debug!(error = %err, "Checkout rolled back");
                Err(err)
            }
        }
    }
}

// =============================================================================
// Unit Body
// =============================================================================

/// A priced cart line waiting for its header id.
struct PricedLine {
    product_id: i64,
    product_name: String,
    quantity: i64,
    subtotal: Money,
}

async fn apply<U: CheckoutUnit>(unit: &mut U, items: &[CheckoutItem]) -> CoreResult<Transaction> {
    let mut lines = Vec::with_capacity(items.len());
    let mut total = Money::zero();

    for item in items {
        let product = unit
            .lookup_product(item.product_id)
            .await?
            .ok_or(CoreError::ProductNotFound(item.product_id))?;

        if !product.has_stock_for(item.quantity) {
            return Err(CoreError::insufficient_stock(item.product_id, item.quantity));
        }

        let subtotal = product
            .price()
            .checked_mul_quantity(item.quantity)
            .ok_or_else(|| amount_overflow("subtotal"))?;
        total = total
            .checked_add(subtotal)
            .ok_or_else(|| amount_overflow("total_amount"))?;

        if !unit.decrement_stock(item.product_id, item.quantity).await? {
            return Err(CoreError::insufficient_stock(item.product_id, item.quantity));
        }

        debug!(
            product_id = item.product_id,
            quantity = item.quantity,
            subtotal = %subtotal,
            "Line reserved"
        );

        lines.push(PricedLine {
            product_id: product.id,
            product_name: product.name,
            quantity: item.quantity,
            subtotal,
        });
    }

    let header = unit.insert_transaction(total.rupiah()).await?;

    let mut details = Vec::with_capacity(lines.len());
    for line in lines {
        let detail = TransactionDetail {
            transaction_id: header.id,
            product_id: line.product_id,
            product_name: line.product_name,
            quantity: line.quantity,
            subtotal: line.subtotal.rupiah(),
        };
        unit.insert_detail(&detail).await?;
        details.push(detail);
    }

    Ok(Transaction::from_parts(header, details))
}

fn amount_overflow(field: &str) -> CoreError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kasir_core::{ErrorCode, Product};

    use super::*;
    use crate::memory::{FailPoint, MemoryStore};

    fn product(id: i64, name: &str, unit_price: i64, stock: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            unit_price,
            stock,
        }
    }

    fn engine(products: Vec<Product>) -> CheckoutEngine<MemoryStore> {
        CheckoutEngine::new(MemoryStore::with_products(products))
    }

    #[tokio::test]
    async fn scenario_two_products() {
        let engine = engine(vec![product(1, "A", 100, 2), product(2, "B", 50, 0)]);
        let store = engine.store();

        let err = engine
            .execute(&[CheckoutItem::new(1, 1), CheckoutItem::new(2, 1)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { product_id: 2, .. }
        ));
        assert_eq!(store.product(1).await.unwrap().stock, 2);
        assert!(store.transactions().await.is_empty());

        let tx = engine.execute(&[CheckoutItem::new(1, 2)]).await.unwrap();
        assert_eq!(tx.total_amount, 200);
        assert_eq!(tx.details.len(), 1);
        assert_eq!(tx.details[0].subtotal, 200);
        assert_eq!(store.product(1).await.unwrap().stock, 0);

        let err = engine.execute(&[CheckoutItem::new(1, 1)]).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { product_id: 1, .. }
        ));
        assert_eq!(store.transactions().await.len(), 1);
    }

    #[tokio::test]
    async fn committed_transaction_is_consistent() {
        let engine = engine(vec![
            product(1, "Indomie Godog", 3500, 10),
            product(2, "Kecap", 12000, 20),
        ]);

        let tx = engine
            .execute(&[CheckoutItem::new(2, 3), CheckoutItem::new(1, 2)])
            .await
            .unwrap();

        assert_eq!(tx.total_amount, 3 * 12000 + 2 * 3500);
        assert_eq!(tx.details_total().rupiah(), tx.total_amount);
        assert_eq!(
            tx.details.iter().map(|d| d.product_id).collect::<Vec<_>>(),
            vec![2, 1]
        );
        assert!(tx.details.iter().all(|d| d.quantity > 0 && d.transaction_id == tx.id));
        assert_eq!(tx.details[0].product_name, "Kecap");

        let stored = engine.store().transactions().await;
        assert_eq!(stored, vec![tx]);
        assert_eq!(engine.store().product(1).await.unwrap().stock, 8);
        assert_eq!(engine.store().product(2).await.unwrap().stock, 17);
    }

    #[tokio::test]
    async fn repeated_product_lines_share_stock() {
        let engine = engine(vec![product(1, "A", 100, 3)]);

        let err = engine
            .execute(&[CheckoutItem::new(1, 2), CheckoutItem::new(1, 2)])
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientStock);
        assert_eq!(engine.store().product(1).await.unwrap().stock, 3);

        let tx = engine
            .execute(&[CheckoutItem::new(1, 2), CheckoutItem::new(1, 1)])
            .await
            .unwrap();
        assert_eq!(tx.details.len(), 2);
        assert_eq!(engine.store().product(1).await.unwrap().stock, 0);
    }

    #[tokio::test]
    async fn unknown_product_leaves_store_untouched() {
        let engine = engine(vec![product(1, "A", 100, 5)]);
        let before = engine.store().state().await;

        let err = engine
            .execute(&[CheckoutItem::new(1, 1), CheckoutItem::new(99, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ProductNotFound(99)));
        assert_eq!(err.product_id(), Some(99));
        assert_eq!(*engine.store().state().await, *before);
    }

    #[tokio::test]
    async fn invalid_cart_is_rejected_before_begin() {
        let engine = engine(vec![product(1, "A", 100, 5)]);
        engine.store().fail_next(FailPoint::Begin).await;

        let err = engine.execute(&[]).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let err = engine
            .execute(&[CheckoutItem::new(1, 1), CheckoutItem::new(1, 0)])
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        // The armed failure is still waiting: begin() was never reached.
        let err = engine.execute(&[CheckoutItem::new(1, 1)]).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::StorageError);
        assert_eq!(engine.store().product(1).await.unwrap().stock, 5);
    }

    #[tokio::test]
    async fn store_failure_at_any_step_rolls_back() {
        for point in [
            FailPoint::Lookup,
            FailPoint::Decrement,
            FailPoint::InsertTransaction,
            FailPoint::InsertDetail,
            FailPoint::Commit,
        ] {
            let engine = engine(vec![product(1, "A", 100, 5), product(2, "B", 50, 5)]);
            let before = engine.store().state().await;
            engine.store().fail_next(point).await;

            let err = engine
                .execute(&[CheckoutItem::new(1, 1), CheckoutItem::new(2, 2)])
                .await
                .unwrap_err();

            assert!(matches!(err, CoreError::Storage(_)), "{:?}", point);
            assert_eq!(*engine.store().state().await, *before, "{:?}", point);
        }
    }

    #[tokio::test]
    async fn lost_decrement_race_rolls_back_earlier_lines() {
        let engine = engine(vec![product(1, "A", 100, 5), product(2, "B", 50, 5)]);
        let before = engine.store().state().await;
        engine.store().fail_next(FailPoint::RejectDecrement(2)).await;

        let err = engine
            .execute(&[CheckoutItem::new(1, 2), CheckoutItem::new(2, 1)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                product_id: 2,
                requested: 1
            }
        ));
        assert_eq!(*engine.store().state().await, *before);

        let tx = engine
            .execute(&[CheckoutItem::new(1, 2), CheckoutItem::new(2, 1)])
            .await
            .unwrap();
        assert_eq!(tx.total_amount, 250);
        assert_eq!(engine.store().product(1).await.unwrap().stock, 3);
        assert_eq!(engine.store().product(2).await.unwrap().stock, 4);
    }

    #[tokio::test]
    async fn amount_overflow_is_a_validation_error() {
        let engine = engine(vec![product(1, "Mahal", i64::MAX / 2, 10)]);

        let err = engine.execute(&[CheckoutItem::new(1, 3)]).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let err = engine
            .execute(&[CheckoutItem::new(1, 2), CheckoutItem::new(1, 2)])
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(engine.store().product(1).await.unwrap().stock, 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_checkouts_never_oversell() {
        const STOCK: i64 = 5;
        const BUYERS: usize = 20;

        let engine = Arc::new(engine(vec![product(1, "A", 100, STOCK)]));

        let mut handles = Vec::with_capacity(BUYERS);
        for _ in 0..BUYERS {
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                engine.execute(&[CheckoutItem::new(1, 1)]).await
            }));
        }

        let mut succeeded = 0;
        let mut out_of_stock = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(CoreError::InsufficientStock { product_id: 1, .. }) => out_of_stock += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(succeeded, STOCK as usize);
        assert_eq!(out_of_stock, BUYERS - STOCK as usize);
        assert_eq!(engine.store().product(1).await.unwrap().stock, 0);
        assert_eq!(engine.store().transactions().await.len(), STOCK as usize);
    }
}
