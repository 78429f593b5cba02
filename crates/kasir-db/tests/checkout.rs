//! Checkout against a real SQLite file.

use std::sync::Arc;

use kasir_core::{CheckoutItem, CoreError, ErrorCode, NewProduct, Product};
use kasir_db::{Database, DbConfig};
use kasir_engine::CheckoutEngine;
use tempfile::TempDir;

async fn open(products: &[(&str, i64, i64)]) -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(DbConfig::new(dir.path().join("kasir.db")).max_readers(4))
        .await
        .unwrap();
    for &(name, price, stock) in products {
        db.products()
            .insert(&NewProduct::new(name, price, stock))
            .await
            .unwrap();
    }
    (dir, db)
}

async fn stock_of(db: &Database, id: i64) -> i64 {
    db.products().get_by_id(id).await.unwrap().unwrap().stock
}

#[tokio::test]
async fn scenario_two_products() {
    let (_dir, db) = open(&[("A", 100, 2), ("B", 50, 0)]).await;
    let engine = CheckoutEngine::new(db.store());

    let err = engine
        .execute(&[CheckoutItem::new(1, 1), CheckoutItem::new(2, 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InsufficientStock { product_id: 2, .. }));
    assert_eq!(stock_of(&db, 1).await, 2);
    assert_eq!(db.transactions().count().await.unwrap(), 0);

    let tx = engine.execute(&[CheckoutItem::new(1, 2)]).await.unwrap();
    assert_eq!(tx.total_amount, 200);
    assert_eq!(stock_of(&db, 1).await, 0);

    let err = engine.execute(&[CheckoutItem::new(1, 1)]).await.unwrap_err();
    assert!(matches!(err, CoreError::InsufficientStock { product_id: 1, .. }));
    assert_eq!(db.transactions().count().await.unwrap(), 1);
}

#[tokio::test]
async fn committed_transaction_reads_back_identically() {
    let (_dir, db) = open(&[("Indomie Godog", 3500, 10), ("Vit 1000ml", 3000, 40), ("Kecap", 12000, 20)]).await;
    let engine = CheckoutEngine::new(db.store());

    let tx = engine
        .execute(&[CheckoutItem::new(3, 1), CheckoutItem::new(1, 4), CheckoutItem::new(2, 2)])
        .await
        .unwrap();

    assert_eq!(tx.total_amount, 12000 + 4 * 3500 + 2 * 3000);
    assert_eq!(tx.details_total().rupiah(), tx.total_amount);
    assert_eq!(
        tx.details.iter().map(|d| d.product_id).collect::<Vec<_>>(),
        vec![3, 1, 2]
    );

    let stored = db.transactions().get_by_id(tx.id).await.unwrap().unwrap();
    assert_eq!(stored, tx);

    assert_eq!(stock_of(&db, 1).await, 6);
    assert_eq!(stock_of(&db, 2).await, 38);
    assert_eq!(stock_of(&db, 3).await, 19);
}

#[tokio::test]
async fn unknown_product_changes_nothing() {
    let (_dir, db) = open(&[("A", 100, 5), ("B", 50, 5)]).await;
    let engine = CheckoutEngine::new(db.store());
    engine.execute(&[CheckoutItem::new(2, 1)]).await.unwrap();

    let products_before: Vec<Product> = db.products().list(None).await.unwrap();
    let count_before = db.transactions().count().await.unwrap();

    let err = engine
        .execute(&[CheckoutItem::new(1, 2), CheckoutItem::new(2, 1), CheckoutItem::new(42, 1)])
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::ProductNotFound(42)));
    assert_eq!(db.products().list(None).await.unwrap(), products_before);
    assert_eq!(db.transactions().count().await.unwrap(), count_before);
}

#[tokio::test]
async fn invalid_cart_is_rejected() {
    let (_dir, db) = open(&[("A", 100, 5)]).await;
    let engine = CheckoutEngine::new(db.store());

    let err = engine.execute(&[]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    let err = engine.execute(&[CheckoutItem::new(1, -3)]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    assert_eq!(stock_of(&db, 1).await, 5);
    assert_eq!(db.transactions().count().await.unwrap(), 0);
}

#[tokio::test]
async fn closed_database_is_a_storage_error() {
    let (_dir, db) = open(&[("A", 100, 5)]).await;
    let engine = CheckoutEngine::new(db.store());
    db.close().await;

    let err = engine.execute(&[CheckoutItem::new(1, 1)]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::StorageError);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_checkouts_never_oversell() {
    const STOCK: i64 = 5;
    const BUYERS: usize = 20;

    let (_dir, db) = open(&[("Kecap", 12000, STOCK)]).await;
    let engine = Arc::new(CheckoutEngine::new(db.store()));

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
    assert_eq!(stock_of(&db, 1).await, 0);
    assert_eq!(db.transactions().count().await.unwrap(), STOCK);
}
