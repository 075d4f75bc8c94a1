//! # Sale Repository
//!
//! Read-side queries over the immutable sale ledger.
//!
//! Sales are written only by the ledger workflow (`ledger.rs`), inside a
//! transaction with the stock decrement. This repository exposes no
//! mutation: there is no UPDATE or DELETE path for a sale anywhere in
//! the crate.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use shopledger_core::{Money, Sale};

/// Columns selected for every Sale row mapping.
const SALE_COLUMNS: &str = "id, user_id, product_id, product_name, quantity_hundredths, \
     price_cents, total_cents, customer, sale_date, created_at, updated_at";

/// Repository for sale queries.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists a tenant's sales, newest first.
    ///
    /// Both window bounds are optional and inclusive; an omitted bound
    /// leaves that side open.
    pub async fn list(
        &self,
        user_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> DbResult<Vec<Sale>> {
        debug!(user_id = %user_id, start = ?start, end = ?end, "Listing sales");

        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales \
             WHERE user_id = ?1 \
             AND (?2 IS NULL OR sale_date >= ?2) \
             AND (?3 IS NULL OR sale_date <= ?3) \
             ORDER BY sale_date DESC"
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets a sale owned by the tenant.
    ///
    /// Foreign and missing sales both come back as `None`.
    pub async fn get_by_id(&self, user_id: &str, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1 AND user_id = ?2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists today's sales (midnight to end of the current day, UTC).
    pub async fn today(&self, user_id: &str) -> DbResult<Vec<Sale>> {
        let (start, end) = today_bounds(Utc::now());
        self.list(user_id, Some(start), Some(end)).await
    }

    /// Returns (sum of totals, sale count) for today.
    pub async fn today_total(&self, user_id: &str) -> DbResult<(Money, i64)> {
        let (start, end) = today_bounds(Utc::now());

        let (total_cents, count) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COALESCE(SUM(total_cents), 0), COUNT(*) FROM sales \
             WHERE user_id = ?1 AND sale_date >= ?2 AND sale_date <= ?3",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok((Money::from_cents(total_cents), count))
    }
}

/// Day bounds: midnight .. one millisecond before the next midnight.
fn today_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let end = start + Duration::days(1) - Duration::milliseconds(1);
    (start, end)
}

// =============================================================================
// Unit Tests
// =============================================================================
