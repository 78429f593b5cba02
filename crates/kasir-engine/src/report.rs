//! # Report Engine
//!
//! Sales figures over a date window, read from one consistent snapshot.
//!
//! ```text
//! generate_parsed("YYYY-MM-DD"?, ..) ──► generate(start?, end?)
//!      │
//!      ├── both present → Range { start, end }
//!      └── otherwise    → Today
//!      │
//!      ▼
//! store.snapshot() ──► aggregate(window)    → total_revenue, total_transaksi
//!                  └─► top_product(window)  → produk_terlaris | ("-", 0)
//!                  └─► finish()
//! ```

use chrono::NaiveDate;
use kasir_core::{CoreResult, Report, ReportWindow};
use tracing::{info, instrument, warn};

use crate::store::{ReportSnapshot, ReportStore};

/// Builds sales reports against a [`ReportStore`].
#[derive(Debug, Clone)]
pub struct ReportEngine<S> {
    store: S,
}

impl<S: ReportStore> ReportEngine<S> {
    pub fn new(store: S) -> Self {
        ReportEngine { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Report over `[start, end]`, or over today unless both are given.
    ///
    /// A window whose start is after its end simply matches nothing.
    pub async fn generate(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> CoreResult<Report> {
        if start.is_some() != end.is_some() {
            warn!(?start, ?end, "Only one report bound given, reporting today");
        }
        self.generate_for(&ReportWindow::from_bounds(start, end))
            .await
    }

    /// [`ReportEngine::generate`] for `YYYY-MM-DD` strings as callers send them.
    ///
    /// Blank strings count as absent. A malformed date is a validation error.
    pub async fn generate_parsed(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> CoreResult<Report> {
        let (start, end) = ReportWindow::parse_bounds(start, end)?;
        self.generate(start, end).await
    }

    /// Report over the store's current calendar date.
    pub async fn today(&self) -> CoreResult<Report> {
        self.generate_for(&ReportWindow::Today).await
    }

    /// Report over an explicit window.
    #[instrument(skip(self))]
    pub async fn generate_for(&self, window: &ReportWindow) -> CoreResult<Report> {
        let mut snapshot = self.store.snapshot().await?;

        let summary = snapshot.aggregate(window).await?;
        let top_product = snapshot.top_product(window).await?;
        snapshot.finish().await?;

        let report = Report::new(summary, top_product);
        info!(
            total_revenue = report.total_revenue,
            total_transaksi = report.total_transaction_count,
            "Report generated"
        );
        Ok(report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
