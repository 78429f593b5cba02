//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Stock Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  UPDATE products SET stock = stock - :qty                               │
//! │  WHERE id = :id AND stock >= :qty                                       │
//! │       │                                                                 │
//! │       ├── rows_affected = 1 → decremented                               │
//! │       └── rows_affected = 0 → not enough stock (or no such product)     │
//! │                                                                         │
//! │  The check and the write are one statement, so no reader of an older   │
//! │  stock value can ever push stock below zero.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use kasir_core::{NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, name, price AS unit_price, stock";

// =============================================================================
// Statements
// =============================================================================

/// Reads one product on an open connection.
pub(crate) async fn fetch_product(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products WHERE id = ?1",
        PRODUCT_COLUMNS
    ))
    .bind(product_id)
    .fetch_optional(conn)
    .await?;

    Ok(product)
}

/// Conditionally decrements stock. Returns whether a row changed.
pub(crate) async fn decrement_stock(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> DbResult<bool> {
    let result = sqlx::query("UPDATE products SET stock = stock - ?2 WHERE id = ?1 AND stock >= ?2")
        .bind(product_id)
        .bind(quantity)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() == 1)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let all = repo.list(None).await?;
/// let kecap = repo.list(Some("KECAP")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_product(&mut conn, id).await
    }

    /// Lists products ordered by id.
    ///
    /// `name` filters by substring, case-insensitive for ASCII. A blank
    /// filter lists everything.
    pub async fn list(&self, name: Option<&str>) -> DbResult<Vec<Product>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM products", PRODUCT_COLUMNS));

        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            query.push(" WHERE name LIKE ");
            query.push_bind(format!("%{}%", name));
        }
        query.push(" ORDER BY id");

        let products = query
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Products listed");
        Ok(products)
    }

    /// Inserts a new product and returns it with its assigned id.
    ///
    /// Callers validate `product` first; the schema rejects negative
    /// price or stock as a `CheckViolation`.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, "Inserting product");

        let inserted = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, price, stock) VALUES (?1, ?2, ?3) RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(&product.name)
        .bind(product.unit_price)
        .bind(product.stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    /// Counts products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
