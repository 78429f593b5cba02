//! # SQLite Store
//!
//! [`CheckoutStore`] and [`ReportStore`] backed by SQLite transactions.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  begin()    ──► writer.begin()  ──► SqliteCheckoutUnit { tx }           │
//! │                  (single connection: units queue on acquire)            │
//! │                                                                         │
//! │  snapshot() ──► reader.begin()  ──► SELECT date('now'), EXISTS(..)      │
//! │                  (first table read pins the WAL snapshot and "today")   │
//! │             ──► SqliteReportSnapshot { tx, today }                      │
//! │                                                                         │
//! │  Dropping either without commit rolls the SQLite transaction back.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use kasir_core::{
    Product, ReportWindow, SalesSummary, StoreResult, TopProduct, TransactionDetail,
    TransactionHeader,
};
use kasir_engine::store::{CheckoutStore, CheckoutUnit, ReportSnapshot, ReportStore};
use sqlx::{Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbError;
use crate::repository::{product, report, transaction};

/// Store handle over the writer and reader pools.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    writer: SqlitePool,
    reader: SqlitePool,
}

impl SqliteStore {
    pub fn new(writer: SqlitePool, reader: SqlitePool) -> Self {
        SqliteStore { writer, reader }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// An open write transaction on the writer connection.
pub struct SqliteCheckoutUnit {
    tx: sqlx::Transaction<'static, Sqlite>,
}

#[async_trait]
impl CheckoutStore for SqliteStore {
    type Unit = SqliteCheckoutUnit;

    async fn begin(&self) -> StoreResult<Self::Unit> {
        let tx = self.writer.begin().await.map_err(DbError::transaction)?;
        debug!("Checkout unit opened");
        Ok(SqliteCheckoutUnit { tx })
    }
}

#[async_trait]
impl CheckoutUnit for SqliteCheckoutUnit {
    async fn lookup_product(&mut self, product_id: i64) -> StoreResult<Option<Product>> {
        Ok(product::fetch_product(&mut self.tx, product_id).await?)
    }

    async fn decrement_stock(&mut self, product_id: i64, quantity: i64) -> StoreResult<bool> {
        Ok(product::decrement_stock(&mut self.tx, product_id, quantity).await?)
    }

    async fn insert_transaction(&mut self, total_amount: i64) -> StoreResult<TransactionHeader> {
        Ok(transaction::insert_header(&mut self.tx, total_amount).await?)
    }

    async fn insert_detail(&mut self, detail: &TransactionDetail) -> StoreResult<()> {
        Ok(transaction::insert_detail(&mut self.tx, detail).await?)
    }

    async fn commit(self) -> StoreResult<()> {
        self.tx.commit().await.map_err(DbError::transaction)?;
        Ok(())
    }

    async fn rollback(self) -> StoreResult<()> {
        self.tx.rollback().await.map_err(DbError::transaction)?;
        Ok(())
    }
}

// =============================================================================
// Reports
// =============================================================================

/// An open read transaction on a reader connection.
pub struct SqliteReportSnapshot {
    tx: sqlx::Transaction<'static, Sqlite>,
    today: NaiveDate,
}

#[async_trait]
impl ReportStore for SqliteStore {
    type Snapshot = SqliteReportSnapshot;

    async fn snapshot(&self) -> StoreResult<Self::Snapshot> {
        let mut tx = self.reader.begin().await.map_err(DbError::transaction)?;
        let today = report::current_date(&mut tx).await?;
        debug!(%today, "Report snapshot opened");
        Ok(SqliteReportSnapshot { tx, today })
    }
}

#[async_trait]
impl ReportSnapshot for SqliteReportSnapshot {
    async fn aggregate(&mut self, window: &ReportWindow) -> StoreResult<SalesSummary> {
        Ok(report::sales_summary(&mut self.tx, window, self.today).await?)
    }

    async fn top_product(&mut self, window: &ReportWindow) -> StoreResult<Option<TopProduct>> {
        Ok(report::top_product(&mut self.tx, window, self.today).await?)
    }

    async fn finish(self) -> StoreResult<()> {
        self.tx.commit().await.map_err(DbError::transaction)?;
        Ok(())
    }
}
