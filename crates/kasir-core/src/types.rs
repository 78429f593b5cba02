//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌───────────────────┐     │
//! │  │    Product      │   │   Transaction   │   │ TransactionDetail │     │
//! │  │  ─────────────  │   │  ─────────────  │   │  ───────────────  │     │
//! │  │  id             │   │  id (store)     │   │  transaction_id   │     │
//! │  │  nama           │   │  total_amount   │   │  product_id       │     │
//! │  │  harga          │   │  created_at     │   │  product_name ❄   │     │
//! │  │  stok           │   │  details[]      │   │  quantity         │     │
//! │  └─────────────────┘   └─────────────────┘   │  subtotal ❄       │     │
//! │                                              └───────────────────┘     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌───────────────────┐     │
//! │  │  CheckoutItem   │   │  ReportWindow   │   │      Report       │     │
//! │  │  product_id     │   │  Today          │   │  total_revenue    │     │
//! │  │  quantity       │   │  Range{s, e}    │   │  total_transaksi  │     │
//! │  └─────────────────┘   └─────────────────┘   │  produk_terlaris  │     │
//! │                                              └───────────────────┘     │
//! │  ❄ = snapshot frozen at sale time                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{NO_TOP_PRODUCT_NAME, REPORT_DATE_FORMAT};

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// Field names on the wire follow the existing API: `nama`, `harga`, `stok`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique, immutable identifier assigned by the catalog.
    pub id: i64,

    /// Display name shown to the cashier and snapshotted on sale.
    #[serde(rename = "nama")]
    pub name: String,

    /// Unit price in whole rupiah.
    #[serde(rename = "harga")]
    pub unit_price: i64,

    /// Units on hand. Never negative.
    #[serde(rename = "stok")]
    pub stock: i64,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_rupiah(self.unit_price)
    }

    /// Checks whether `quantity` units can be taken from current stock.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// Input for adding a product to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "harga")]
    pub unit_price: i64,
    #[serde(rename = "stok")]
    pub stock: i64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, unit_price: i64, stock: i64) -> Self {
        NewProduct {
            name: name.into(),
            unit_price,
            stock,
        }
    }
}

// =============================================================================
// Checkout Input
// =============================================================================

/// One requested line of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i64,
}

impl CheckoutItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        CheckoutItem {
            product_id,
            quantity,
        }
    }
}

/// Checkout request body: `{ "items": [{ "product_id": 1, "quantity": 2 }] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

// =============================================================================
// Transaction
// =============================================================================

/// The header row of a persisted transaction, as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionHeader {
    pub id: i64,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
}

/// A line item of a transaction.
/// Uses snapshot pattern to freeze product name and subtotal at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionDetail {
    pub transaction_id: i64,
    /// Reference to the product (not ownership).
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// quantity × unit price at time of sale (frozen).
    pub subtotal: i64,
}

/// A completed sale. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    pub id: i64,
    pub total_amount: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub details: Vec<TransactionDetail>,
}

impl Transaction {
    /// Builds a transaction from its stored header and details.
    pub fn from_parts(header: TransactionHeader, details: Vec<TransactionDetail>) -> Self {
        Transaction {
            id: header.id,
            total_amount: header.total_amount,
            created_at: header.created_at,
            details,
        }
    }

    /// Sum of detail subtotals. Equals `total_amount` for every stored sale.
    pub fn details_total(&self) -> Money {
        self.details
            .iter()
            .map(|d| Money::from_rupiah(d.subtotal))
            .sum()
    }
}

// =============================================================================
// Report Window
// =============================================================================

/// The date range a report aggregates over.
///
/// Dates are calendar dates of `created_at` on the store's clock (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportWindow {
    /// The store's current calendar date.
    #[default]
    Today,
    /// Inclusive closed interval `[start, end]`.
    Range { start: NaiveDate, end: NaiveDate },
}

impl ReportWindow {
    /// Builds a window from optional bounds.
    ///
    /// Only when both bounds are present is an explicit range used; a lone
    /// start or end date falls back to [`ReportWindow::Today`].
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) => ReportWindow::Range { start, end },
            _ => ReportWindow::Today,
        }
    }

    /// Parses `YYYY-MM-DD` bounds. Blank strings count as absent.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ValidationError> {
        let (start, end) = ReportWindow::parse_bounds(start, end)?;
        Ok(ReportWindow::from_bounds(start, end))
    }

    /// Parses `YYYY-MM-DD` bounds without deciding the window yet.
    pub fn parse_bounds(
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ValidationError> {
        Ok((
            parse_report_date("start_date", start)?,
            parse_report_date("end_date", end)?,
        ))
    }

    /// Resolves the window to inclusive bounds given the store's current date.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            ReportWindow::Today => (today, today),
            ReportWindow::Range { start, end } => (start, end),
        }
    }

    /// Checks whether a calendar date falls inside the window.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let (start, end) = self.bounds(today);
        start <= date && date <= end
    }
}

fn parse_report_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, REPORT_DATE_FORMAT)
            .map(Some)
            .map_err(|_| ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "expected YYYY-MM-DD".to_string(),
            }),
    }
}

// =============================================================================
// Report
// =============================================================================

/// Revenue and transaction count over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesSummary {
    pub total_revenue: i64,
    pub transaction_count: i64,
}

/// Best-selling product of a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TopProduct {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "qty_terjual")]
    pub quantity_sold: i64,
}

impl TopProduct {
    /// The sentinel reported when a window has no sales: `("-", 0)`.
    pub fn none() -> Self {
        TopProduct {
            name: NO_TOP_PRODUCT_NAME.to_string(),
            quantity_sold: 0,
        }
    }
}

/// Sales report over a window. Computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Report {
    pub total_revenue: i64,
    #[serde(rename = "total_transaksi")]
    pub total_transaction_count: i64,
    #[serde(rename = "produk_terlaris")]
    pub top_product: TopProduct,
}

impl Report {
    /// Combines the aggregate and the top seller read from one snapshot.
    pub fn new(summary: SalesSummary, top_product: Option<TopProduct>) -> Self {
        Report {
            total_revenue: summary.total_revenue,
            total_transaction_count: summary.transaction_count,
            top_product: top_product.unwrap_or_else(TopProduct::none),
        }
    }

    /// A report for a window with no sales.
    pub fn empty() -> Self {
        Report::new(SalesSummary::default(), None)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_product_wire_names() {
        let product = Product {
            id: 1,
            name: "Indomie Godog".to_string(),
            unit_price: 3500,
            stock: 10,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["nama"], "Indomie Godog");
        assert_eq!(json["harga"], 3500);
        assert_eq!(json["stok"], 10);
        assert!(product.has_stock_for(10));
        assert!(!product.has_stock_for(11));
    }

    #[test]
    fn test_report_wire_names() {
        let report = Report::new(
            SalesSummary {
                total_revenue: 45000,
                transaction_count: 3,
            },
            Some(TopProduct {
                name: "Kecap".to_string(),
                quantity_sold: 4,
            }),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_revenue"], 45000);
        assert_eq!(json["total_transaksi"], 3);
        assert_eq!(json["produk_terlaris"]["nama"], "Kecap");
        assert_eq!(json["produk_terlaris"]["qty_terjual"], 4);
    }

    #[test]
    fn test_empty_report_uses_sentinel() {
        let report = Report::empty();
        assert_eq!(report.total_revenue, 0);
        assert_eq!(report.total_transaction_count, 0);
        assert_eq!(report.top_product.name, "-");
        assert_eq!(report.top_product.quantity_sold, 0);
    }

    #[test]
    fn test_window_needs_both_bounds() {
        let d1 = date(2026, 1, 1);
        let d2 = date(2026, 2, 1);
        assert_eq!(
            ReportWindow::from_bounds(Some(d1), Some(d2)),
            ReportWindow::Range { start: d1, end: d2 }
        );
        assert_eq!(ReportWindow::from_bounds(Some(d1), None), ReportWindow::Today);
        assert_eq!(ReportWindow::from_bounds(None, Some(d2)), ReportWindow::Today);
        assert_eq!(ReportWindow::from_bounds(None, None), ReportWindow::Today);
    }

    #[test]
    fn test_window_parse() {
        let window = ReportWindow::parse(Some("2026-01-01"), Some("2026-02-01")).unwrap();
        assert_eq!(
            window,
            ReportWindow::Range {
                start: date(2026, 1, 1),
                end: date(2026, 2, 1)
            }
        );

        assert_eq!(ReportWindow::parse(Some(""), Some("")).unwrap(), ReportWindow::Today);
        assert_eq!(ReportWindow::parse(Some("2026-01-01"), None).unwrap(), ReportWindow::Today);

        let err = ReportWindow::parse(Some("01/02/2026"), Some("2026-02-01")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "start_date"));
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let today = date(2026, 10, 19);
        let window = ReportWindow::Range {
            start: date(2026, 1, 1),
            end: date(2026, 1, 31),
        };
        assert!(window.contains(date(2026, 1, 1), today));
        assert!(window.contains(date(2026, 1, 31), today));
        assert!(!window.contains(date(2026, 2, 1), today));

        assert!(ReportWindow::Today.contains(today, today));
        assert!(!ReportWindow::Today.contains(date(2026, 10, 18), today));
    }

    #[test]
    fn test_details_total() {
        let detail = |product_id, subtotal| TransactionDetail {
            transaction_id: 1,
            product_id,
            product_name: format!("p{}", product_id),
            quantity: 1,
            subtotal,
        };
        let tx = Transaction {
            id: 1,
            total_amount: 150,
            created_at: Utc::now(),
            details: vec![detail(1, 100), detail(2, 50)],
        };
        assert_eq!(tx.details_total().rupiah(), tx.total_amount);
    }
}
