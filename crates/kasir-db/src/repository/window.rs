//! # Report Window Predicate
//!
//! Every report query filters transactions through [`push_window`], so the
//! revenue, the count and the top seller always agree on which rows count.
//!
//! ```text
//! ReportWindow::Today            → date(t.created_at) BETWEEN :today AND :today
//! ReportWindow::Range{start,end} → date(t.created_at) BETWEEN :start AND :end
//! ```
//!
//! `:today` is resolved once per snapshot from SQLite's own clock.
//! Queries must alias `transactions` as `t`.

use chrono::NaiveDate;
use kasir_core::{ReportWindow, REPORT_DATE_FORMAT};
use sqlx::{QueryBuilder, Sqlite};

/// Appends ` WHERE date(t.created_at) BETWEEN ? AND ?` with bound dates.
pub(crate) fn push_window(query: &mut QueryBuilder<'_, Sqlite>, window: &ReportWindow, today: NaiveDate) {
    let (start, end) = window.bounds(today);

    query.push(" WHERE date(t.created_at) BETWEEN ");
    query.push_bind(start.format(REPORT_DATE_FORMAT).to_string());
    query.push(" AND ");
    query.push_bind(end.format(REPORT_DATE_FORMAT).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_shape() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM transactions t");
        push_window(&mut query, &ReportWindow::Today, today);
        let sql = query.sql();

        assert!(sql.starts_with("SELECT COUNT(*) FROM transactions t WHERE date(t.created_at) BETWEEN "));
        assert_eq!(sql.matches('?').count(), 2);
    }
}
