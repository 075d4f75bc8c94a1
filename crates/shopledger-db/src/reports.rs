//! # Reports Facade
//!
//! Fetches a tenant's rows and delegates the math to the pure analytics
//! engine in `shopledger-core`.
//!
//! ## Split of Responsibilities
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Report Request Flow                              │
//! │                                                                         │
//! │  Reports::dashboard(user_id)                                           │
//! │       │                                                                 │
//! │       ├── SELECT sales WHERE user_id AND sale_date >= window start     │
//! │       ├── SELECT products WHERE user_id (active AND inactive)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  shopledger_core::analytics::dashboard(&sales, &products, Utc::now())  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DashboardSummary                                                      │
//! │                                                                         │
//! │  This module owns I/O and the clock; the core owns every number.       │
//! │  Reports are recomputed from raw rows on each call (no caching).       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inactive products ARE fetched: historical sales of a deactivated
//! product must still resolve to its category and cost. The analytics
//! functions themselves exclude inactive products where it matters
//! (inventory health).

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::product::PRODUCT_COLUMNS;
use crate::repository::sale::SaleRepository;
use shopledger_core::analytics::{
    self, CategoryBreakdown, DashboardSummary, InventorySummary, Period, ProductPerformance,
    SalesBucket, TrendPoint,
};
use shopledger_core::{Product, Sale};

/// Report queries for one tenant's data.
#[derive(Debug, Clone)]
pub struct Reports {
    pool: SqlitePool,
}

impl Reports {
    /// Creates a new Reports facade.
    pub fn new(pool: SqlitePool) -> Self {
        Reports { pool }
    }

    /// Calendar-aligned sales buckets for the period.
    pub async fn sales_by_period(
        &self,
        user_id: &str,
        period: Period,
    ) -> DbResult<Vec<SalesBucket>> {
        let now = Utc::now();
        let sales = self.sales_since(user_id, analytics::period_window(period, now).0).await?;
        Ok(analytics::sales_by_period(&sales, period, now))
    }

    /// Revenue-ranked products over the period.
    pub async fn top_products(
        &self,
        user_id: &str,
        period: Period,
        limit: usize,
    ) -> DbResult<Vec<ProductPerformance>> {
        let now = Utc::now();
        let sales = self.sales_since(user_id, analytics::period_window(period, now).0).await?;
        let products = self.all_products(user_id).await?;
        Ok(analytics::top_products(&sales, &products, period, now, limit))
    }

    /// Per-category rollups over the period.
    pub async fn category_breakdown(
        &self,
        user_id: &str,
        period: Period,
    ) -> DbResult<Vec<CategoryBreakdown>> {
        let now = Utc::now();
        let sales = self.sales_since(user_id, analytics::period_window(period, now).0).await?;
        let products = self.all_products(user_id).await?;
        Ok(analytics::category_breakdown(&sales, &products, period, now))
    }

    /// Per-date sales over the trailing `days` days.
    pub async fn sales_trend(&self, user_id: &str, days: i64) -> DbResult<Vec<TrendPoint>> {
        let now = Utc::now();
        let sales = self.sales_since(user_id, now - Duration::days(days)).await?;
        Ok(analytics::sales_trend(&sales, days, now))
    }

    /// Stock health and valuation over active products.
    pub async fn inventory_summary(&self, user_id: &str) -> DbResult<InventorySummary> {
        let products = self.all_products(user_id).await?;
        Ok(analytics::inventory_summary(&products))
    }

    /// Composite dashboard: today / weekly / monthly horizons + inventory.
    pub async fn dashboard(&self, user_id: &str) -> DbResult<DashboardSummary> {
        let now = Utc::now();
        // The monthly window is the widest horizon the dashboard needs
        let start = analytics::period_window(Period::Monthly, now).0;
        let sales = self.sales_since(user_id, start).await?;
        let products = self.all_products(user_id).await?;
        Ok(analytics::dashboard(&sales, &products, now))
    }

    /// Fetches a tenant's sales from `start` onward.
    async fn sales_since(&self, user_id: &str, start: DateTime<Utc>) -> DbResult<Vec<Sale>> {
        debug!(user_id = %user_id, start = %start, "Fetching sales for report");
        SaleRepository::new(self.pool.clone())
            .list(user_id, Some(start), None)
            .await
    }

    /// Fetches all of a tenant's products, active and inactive.
    async fn all_products(&self, user_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE user_id = ?1"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use shopledger_core::{NewProduct, NewSale, NewUser};

    async fn setup() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db
            .users()
            .insert(NewUser {
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                shop_name: "Corner Shop".to_string(),
                phone: None,
                role: None,
            })
            .await
            .unwrap();
        (db, user.id)
    }

    async fn seed_product(
        db: &Database,
        user_id: &str,
        sku: &str,
        category: &str,
        stock: i64,
        min_stock: i64,
        cost: i64,
        price: i64,
    ) -> String {
        db.products()
            .insert(
                user_id,
                NewProduct {
                    name: format!("Product {sku}"),
                    sku: sku.to_string(),
                    category: category.to_string(),
                    stock_hundredths: stock,
                    cost_cents: cost,
                    price_cents: price,
                    min_stock_hundredths: min_stock,
                    barcode: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    async fn sell(db: &Database, user_id: &str, product_id: &str, qty: i64, price: i64) {
        db.ledger()
            .record_sale(
                user_id,
                NewSale {
                    product_id: product_id.to_string(),
                    quantity_hundredths: qty,
                    price_cents: price,
                    customer: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_daily_buckets_from_live_data() {
        let (db, user_id) = setup().await;
        let p = seed_product(&db, &user_id, "A", "Drinks", 10_000, 0, 400, 999).await;

        sell(&db, &user_id, &p, 300, 999).await; // $29.97
        sell(&db, &user_id, &p, 100, 999).await; // $9.99

        let buckets = db.reports().sales_by_period(&user_id, Period::Daily).await.unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].sales_count, 2);
        assert_eq!(buckets[0].total_sales_cents, 2997 + 999);
        assert_eq!(buckets[0].unique_customers, 2); // both anonymous
    }

    #[tokio::test]
    async fn test_top_products_joins_catalog() {
        let (db, user_id) = setup().await;
        let a = seed_product(&db, &user_id, "A", "Drinks", 10_000, 0, 400, 999).await;
        let b = seed_product(&db, &user_id, "B", "Snacks", 10_000, 0, 100, 300).await;

        sell(&db, &user_id, &a, 300, 999).await; // revenue 2997
        sell(&db, &user_id, &b, 100, 300).await; // revenue 300

        let ranked = db
            .reports()
            .top_products(&user_id, Period::Daily, 10)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].product_id, a);
        assert_eq!(ranked[0].sku.as_deref(), Some("A"));
        assert_eq!(ranked[0].category, "Drinks");
        // profit = 2997 − 400 × 3.00
        assert_eq!(ranked[0].profit_cents, 1797);
    }

    #[tokio::test]
    async fn test_category_breakdown_survives_soft_delete() {
        let (db, user_id) = setup().await;
        let a = seed_product(&db, &user_id, "A", "Drinks", 10_000, 0, 400, 999).await;

        sell(&db, &user_id, &a, 100, 999).await;
        db.products().soft_delete(&user_id, &a).await.unwrap();

        // Deactivated product still resolves to its category
        let breakdown = db
            .reports()
            .category_breakdown(&user_id, Period::Daily)
            .await
            .unwrap();
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].category, "Drinks");
    }

    #[tokio::test]
    async fn test_trend_and_inventory() {
        let (db, user_id) = setup().await;
        // Stocks [0, 5.00, 3.00] vs thresholds [1.00, 5.00, 10.00]
        seed_product(&db, &user_id, "A", "X", 0, 100, 100, 200).await;
        seed_product(&db, &user_id, "B", "X", 500, 500, 100, 200).await;
        let c = seed_product(&db, &user_id, "C", "X", 300, 1000, 100, 200).await;

        sell(&db, &user_id, &c, 100, 200).await;

        let trend = db.reports().sales_trend(&user_id, 30).await.unwrap();
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].sales_count, 1);

        let inventory = db.reports().inventory_summary(&user_id).await.unwrap();
        assert_eq!(inventory.total_products, 3);
        assert_eq!(inventory.out_of_stock_products, 1);
        // C sold 1.00 → stock 2.00, still below 10.00; A below 1.00 → low = 2
        assert_eq!(inventory.low_stock_products, 2);
    }

    #[tokio::test]
    async fn test_dashboard_composition() {
        let (db, user_id) = setup().await;
        let p = seed_product(&db, &user_id, "A", "Drinks", 10_000, 0, 400, 999).await;
        sell(&db, &user_id, &p, 100, 999).await;

        let dash = db.reports().dashboard(&user_id).await.unwrap();
        assert_eq!(dash.today.sales_count, 1);
        assert_eq!(dash.today.total_sales_cents, 999);
        assert_eq!(dash.weekly.sales_count, 1);
        assert_eq!(dash.monthly.sales_count, 1);
        assert_eq!(dash.inventory.total_products, 1);
    }

    #[tokio::test]
    async fn test_reports_are_tenant_scoped() {
        let (db, user_id) = setup().await;
        let p = seed_product(&db, &user_id, "A", "Drinks", 10_000, 0, 400, 999).await;
        sell(&db, &user_id, &p, 100, 999).await;

        let other = db
            .users()
            .insert(NewUser {
                name: "Omar".to_string(),
                email: "omar@example.com".to_string(),
                shop_name: "Other Shop".to_string(),
                phone: None,
                role: None,
            })
            .await
            .unwrap();

        let dash = db.reports().dashboard(&other.id).await.unwrap();
        assert_eq!(dash.today.sales_count, 0);
        assert_eq!(dash.inventory.total_products, 0);
    }
}
