//! # Transaction Repository
//!
//! Inserts used by checkout units, and read access to finished sales.
//!
//! ## Snapshot Pattern
//! Product name and subtotal are copied into each detail row at sale time.
//! Editing or removing a product never rewrites history.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use kasir_core::{Transaction, TransactionDetail, TransactionHeader};

// =============================================================================
// Statements
// =============================================================================

/// Inserts a header. SQLite assigns id and created_at.
pub(crate) async fn insert_header(
    conn: &mut SqliteConnection,
    total_amount: i64,
) -> DbResult<TransactionHeader> {
    let header = sqlx::query_as::<_, TransactionHeader>(
        "INSERT INTO transactions (total_amount) VALUES (?1) RETURNING id, total_amount, created_at",
    )
    .bind(total_amount)
    .fetch_one(conn)
    .await?;

    debug!(transaction_id = header.id, "Transaction header inserted");
    Ok(header)
}

/// Inserts one detail row.
pub(crate) async fn insert_detail(
    conn: &mut SqliteConnection,
    detail: &TransactionDetail,
) -> DbResult<()> {
    sqlx::query(
        "INSERT INTO transaction_details (transaction_id, product_id, product_name, quantity, subtotal) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(detail.transaction_id)
    .bind(detail.product_id)
    .bind(&detail.product_name)
    .bind(detail.quantity)
    .bind(detail.subtotal)
    .execute(conn)
    .await?;

    Ok(())
}

// =============================================================================
// Repository
// =============================================================================

/// Read access to persisted transactions.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Gets a transaction with its details in insertion order.
    ///
    /// Header and details are read in one read transaction.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Transaction>> {
        let mut tx = self.pool.begin().await?;

        let header = sqlx::query_as::<_, TransactionHeader>(
            "SELECT id, total_amount, created_at FROM transactions WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(header) = header else {
            tx.commit().await?;
            return Ok(None);
        };

        let details = sqlx::query_as::<_, TransactionDetail>(
            "SELECT transaction_id, product_id, product_name, quantity, subtotal \
             FROM transaction_details WHERE transaction_id = ?1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(Transaction::from_parts(header, details)))
    }

    /// Counts persisted transactions.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let header = {
            let mut conn = db.pool().acquire().await.unwrap();
            let header = insert_header(&mut conn, 7000).await.unwrap();
            for (product_id, subtotal) in [(2, 3000), (1, 4000)] {
                let detail = TransactionDetail {
                    transaction_id: header.id,
                    product_id,
                    product_name: format!("p{}", product_id),
                    quantity: 1,
                    subtotal,
                };
                insert_detail(&mut conn, &detail).await.unwrap();
            }
            header
        };

        let repo = db.transactions();
        let tx = repo.get_by_id(header.id).await.unwrap().unwrap();
        assert_eq!(tx.total_amount, 7000);
        assert_eq!(tx.created_at, header.created_at);
        assert_eq!(
            tx.details.iter().map(|d| d.product_id).collect::<Vec<_>>(),
            vec![2, 1]
        );
        assert_eq!(tx.details_total().rupiah(), 7000);
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo.get_by_id(header.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_detail_requires_header() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let detail = TransactionDetail {
            transaction_id: 404,
            product_id: 1,
            product_name: "x".to_string(),
            quantity: 1,
            subtotal: 1,
        };
        let err = insert_detail(&mut conn, &detail).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
