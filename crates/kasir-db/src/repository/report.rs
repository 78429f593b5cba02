//! # Report Queries
//!
//! Aggregates run inside a [`crate::store::SqliteReportSnapshot`]'s read
//! transaction.
//!
//! ## Top Product
//! ```text
//! sold:  per product_id in window → SUM(quantity), MAX(detail id)
//!   │
//!   ▼
//! join back to the detail row with that MAX(id) → latest name in window
//!   │
//!   ▼
//! ORDER BY qty DESC, product_id ASC LIMIT 1
//! ```
//! Grouping is by id, never by name: renamed products keep one tally.

use chrono::NaiveDate;
use kasir_core::{ReportWindow, SalesSummary, TopProduct};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::error::{DbError, DbResult};
use crate::repository::window::push_window;

/// Reads the store clock's current UTC date.
///
/// The statement also reads `transactions`. Inside a deferred transaction
/// that first table read is what starts the WAL read, so the snapshot and
/// "today" are fixed by the same statement.
pub(crate) async fn current_date(conn: &mut SqliteConnection) -> DbResult<NaiveDate> {
    let (raw, _): (String, i64) =
        sqlx::query_as("SELECT date('now'), EXISTS (SELECT 1 FROM transactions)")
            .fetch_one(conn)
            .await?;

    NaiveDate::parse_from_str(&raw, kasir_core::REPORT_DATE_FORMAT)
        .map_err(|e| DbError::Internal(format!("unexpected date '{}': {}", raw, e)))
}

/// Revenue and count of transactions inside `window`.
pub(crate) async fn sales_summary(
    conn: &mut SqliteConnection,
    window: &ReportWindow,
    today: NaiveDate,
) -> DbResult<SalesSummary> {
    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT COALESCE(SUM(t.total_amount), 0) AS total_revenue, COUNT(t.id) AS transaction_count \
         FROM transactions t",
    );
    push_window(&mut query, window, today);

    let summary = query
        .build_query_as::<SalesSummary>()
        .fetch_one(conn)
        .await?;

    Ok(summary)
}

/// Best seller inside `window`, or `None` when nothing sold.
pub(crate) async fn top_product(
    conn: &mut SqliteConnection,
    window: &ReportWindow,
    today: NaiveDate,
) -> DbResult<Option<TopProduct>> {
    let mut query = QueryBuilder::<Sqlite>::new(
        "WITH sold AS ( \
             SELECT td.product_id, SUM(td.quantity) AS quantity_sold, MAX(td.id) AS last_detail_id \
             FROM transaction_details td \
             JOIN transactions t ON t.id = td.transaction_id",
    );
    push_window(&mut query, window, today);
    query.push(
        " GROUP BY td.product_id \
         ) \
         SELECT d.product_name AS name, s.quantity_sold AS quantity_sold \
         FROM sold s \
         JOIN transaction_details d ON d.id = s.last_detail_id \
         ORDER BY s.quantity_sold DESC, s.product_id ASC \
         LIMIT 1",
    );

    let top = query
        .build_query_as::<TopProduct>()
        .fetch_optional(conn)
        .await?;

    Ok(top)
}
