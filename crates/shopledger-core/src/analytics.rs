//! # Analytics Engine
//!
//! Pure report computation over raw sale and product records.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Report Computation Flow                            │
//! │                                                                         │
//! │  shopledger-db::Reports (fetches a tenant's rows)                      │
//! │       │                                                                 │
//! │       │  &[Sale], &[Product], now                                       │
//! │       ▼                                                                 │
//! │  ★ THIS MODULE ★                                                        │
//! │  ├── period_window()      resolve keyword → [start, now]               │
//! │  ├── sales_by_period()    calendar-aligned buckets                     │
//! │  ├── top_products()       revenue ranking + profit                     │
//! │  ├── category_breakdown() per-category rollups                         │
//! │  ├── sales_trend()        per-date points over trailing N days         │
//! │  ├── inventory_summary()  stock health + valuation                     │
//! │  └── dashboard()          composite of the above                       │
//! │                                                                         │
//! │  NO I/O, NO CLOCK: `now` is an explicit argument, so every report      │
//! │  is deterministic and testable with pinned instants.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every report is recomputed from raw records on each call; there is no
//! materialization or caching layer. If that ever becomes too expensive,
//! this module is the seam to put one behind.
//!
//! ## Bucket Ordering
//! Buckets are keyed by their calendar start date and emitted in
//! chronological order. (The system this replaces emitted buckets in
//! first-seen order, an artifact of hash iteration; chronological output is
//! a deliberate change.)

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{Money, Quantity};
use crate::types::{Product, Sale};

// =============================================================================
// Period
// =============================================================================

/// Reporting period keyword.
///
/// Each period maps to a trailing window ending now and to a calendar
/// bucketing rule (see [`period_window`] and [`sales_by_period`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl Period {
    /// Parses a period keyword, leniently.
    ///
    /// Unrecognized input falls back to [`Period::Daily`] (the narrowest
    /// window, midnight to now) rather than failing.
    pub fn parse(keyword: &str) -> Self {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "daily" => Period::Daily,
            "weekly" => Period::Weekly,
            "monthly" => Period::Monthly,
            "quarterly" => Period::Quarterly,
            "semi-annual" | "semiannual" => Period::SemiAnnual,
            "annual" => Period::Annual,
            _ => Period::Daily,
        }
    }

    /// Returns the canonical keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
            Period::SemiAnnual => "semi-annual",
            Period::Annual => "annual",
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::Daily
    }
}

// =============================================================================
// Report Types
// =============================================================================

/// One calendar-aligned aggregation bucket of sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesBucket {
    /// Human-readable bucket label ("Jan 5", "Q2 2026", "H1 2026", ...).
    pub label: String,
    /// Sum of sale totals in cents.
    pub total_sales_cents: i64,
    /// Sum of sold quantities in hundredths.
    pub total_quantity_hundredths: i64,
    /// Number of sales in the bucket.
    pub sales_count: i64,
    /// `total_sales / sales_count` in cents; 0 for an empty bucket.
    pub avg_order_value_cents: i64,
    /// Distinct customers. Named labels deduplicate; each anonymous sale
    /// counts as its own customer.
    pub unique_customers: i64,
}

/// Aggregated performance of one product over a period window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPerformance {
    pub product_id: String,
    /// Name snapshot from the sale records.
    pub product_name: String,
    /// SKU from the catalog; `None` when the product no longer resolves.
    pub sku: Option<String>,
    /// Category from the catalog, or "Unknown".
    pub category: String,
    pub total_quantity_hundredths: i64,
    /// Sum of sale totals in cents.
    pub revenue_cents: i64,
    /// `revenue - cost × quantity` in cents.
    pub profit_cents: i64,
    pub sales_count: i64,
    /// Always 0. True turnover needs historical stock snapshots, which are
    /// not modeled; better an honest zero than a fabricated rate.
    pub stock_turnover: i64,
}

/// Per-category sales rollup over a period window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: String,
    pub total_sales_cents: i64,
    pub total_quantity_hundredths: i64,
    pub sales_count: i64,
}

/// One calendar date with sales, for the trend report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Date formatted `YYYY-MM-DD`.
    pub date: String,
    pub total_sales_cents: i64,
    pub total_quantity_hundredths: i64,
    pub sales_count: i64,
}

/// Stock health and valuation over a tenant's active products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_products: i64,
    /// Products with `stock < min_stock` (strictly below threshold).
    pub low_stock_products: i64,
    /// Products with zero stock.
    pub out_of_stock_products: i64,
    /// Σ cost × stock, in cents.
    pub total_inventory_value_cents: i64,
    /// Σ price × stock, in cents.
    pub total_retail_value_cents: i64,
    /// Retail value minus inventory value, in cents.
    pub potential_profit_cents: i64,
}

/// Totals for one dashboard horizon (sum across that horizon's buckets).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonSummary {
    pub total_sales_cents: i64,
    pub sales_count: i64,
    pub unique_customers: i64,
}

/// Composite dashboard: three bucketing horizons plus inventory health.
///
/// Each horizon re-runs the full period resolution and grouping; with no
/// caching layer in scope, the recomputation cost is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub today: HorizonSummary,
    pub weekly: HorizonSummary,
    pub monthly: HorizonSummary,
    pub inventory: InventorySummary,
}

// =============================================================================
// Period Window Resolution
// =============================================================================

/// Resolves a period keyword to an inclusive `[start, now]` window.
///
/// `start` is now minus {0 days, 7 days, 1 month, 3 months, 6 months,
/// 1 year}, then floored to midnight of the resulting date. Month
/// arithmetic is calendar-aware (Mar 31 − 1 month = Feb 28/29).
pub fn period_window(period: Period, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();

    let start_date = match period {
        Period::Daily => today,
        Period::Weekly => today - Duration::days(7),
        Period::Monthly => sub_months(today, 1),
        Period::Quarterly => sub_months(today, 3),
        Period::SemiAnnual => sub_months(today, 6),
        Period::Annual => sub_months(today, 12),
    };

    (start_date.and_time(NaiveTime::MIN).and_utc(), now)
}

/// Calendar-month subtraction; clamps only at the edge of the supported
/// date range, where it degrades to the input date.
fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

/// First day of the month, reused by the bucketing rules.
fn first_of_month(year: i32, month: u32, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(fallback)
}

/// Returns the calendar start date of the bucket a sale date falls into.
fn bucket_start(period: Period, date: NaiveDate) -> NaiveDate {
    match period {
        Period::Daily => date,
        // Sunday-aligned week start
        Period::Weekly => date - Duration::days(date.weekday().num_days_from_sunday() as i64),
        Period::Monthly => first_of_month(date.year(), date.month(), date),
        Period::Quarterly => first_of_month(date.year(), (date.month0() / 3) * 3 + 1, date),
        Period::SemiAnnual => first_of_month(date.year(), if date.month() <= 6 { 1 } else { 7 }, date),
        Period::Annual => first_of_month(date.year(), 1, date),
    }
}

/// Renders the label for a bucket given its start date.
fn bucket_label(period: Period, start: NaiveDate) -> String {
    match period {
        // "Jan 5" style, no zero padding on the day
        Period::Daily | Period::Weekly => start.format("%b %-d").to_string(),
        Period::Monthly => start.format("%B").to_string(),
        Period::Quarterly => format!("Q{} {}", start.month0() / 3 + 1, start.year()),
        Period::SemiAnnual => format!(
            "H{} {}",
            if start.month() <= 6 { 1 } else { 2 },
            start.year()
        ),
        Period::Annual => start.year().to_string(),
    }
}

fn in_window(sale: &Sale, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    sale.sale_date >= start && sale.sale_date <= end
}

/// Customer identity for unique-customer counting.
///
/// A named customer contributes their label; an anonymous sale contributes
/// a synthetic per-sale token so each walk-in counts as one distinct
/// customer instead of all collapsing together.
fn customer_key(sale: &Sale) -> String {
    match &sale.customer {
        Some(label) => label.clone(),
        None => format!("anonymous_{}", sale.id),
    }
}

// =============================================================================
// Bucketed Sales Analytics
// =============================================================================

#[derive(Default)]
struct BucketAcc {
    total: Money,
    quantity: Quantity,
    count: i64,
    customers: HashSet<String>,
}

/// Groups a tenant's sales within the period window into calendar-aligned
/// buckets.
///
/// ## Bucket Keys
/// - daily → each calendar date
/// - weekly → the Sunday-aligned start of the sale's week
/// - monthly → each calendar month
/// - quarterly → `Q1`-`Q4` of each year
/// - semi-annual → `H1` (Jan-Jun) / `H2` (Jul-Dec) of each year
/// - annual → each calendar year
///
/// Output is in chronological bucket order.
pub fn sales_by_period(sales: &[Sale], period: Period, now: DateTime<Utc>) -> Vec<SalesBucket> {
    let (start, end) = period_window(period, now);

    let mut buckets: BTreeMap<NaiveDate, BucketAcc> = BTreeMap::new();

    for sale in sales.iter().filter(|s| in_window(s, start, end)) {
        let key = bucket_start(period, sale.sale_date.date_naive());
        let acc = buckets.entry(key).or_default();
        acc.total += sale.total();
        acc.quantity += sale.quantity();
        acc.count += 1;
        acc.customers.insert(customer_key(sale));
    }

    buckets
        .into_iter()
        .map(|(key, acc)| SalesBucket {
            label: bucket_label(period, key),
            total_sales_cents: acc.total.cents(),
            total_quantity_hundredths: acc.quantity.hundredths(),
            sales_count: acc.count,
            avg_order_value_cents: acc.total.divided_by(acc.count).cents(),
            unique_customers: acc.customers.len() as i64,
        })
        .collect()
}

// =============================================================================
// Top Products
// =============================================================================

/// Ranks products by revenue over the period window.
///
/// Sales are grouped by product id; the catalog is joined as an explicit
/// lookup map for SKU, category and unit cost. Profit is
/// `revenue − cost × quantity`. Ordering is revenue descending with ties
/// broken by product id ascending, so rankings are deterministic.
pub fn top_products(
    sales: &[Sale],
    products: &[Product],
    period: Period,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<ProductPerformance> {
    let (start, end) = period_window(period, now);

    struct ProductAcc {
        name: String,
        quantity: Quantity,
        revenue: Money,
        count: i64,
    }

    let mut by_product: BTreeMap<&str, ProductAcc> = BTreeMap::new();

    for sale in sales.iter().filter(|s| in_window(s, start, end)) {
        let acc = by_product
            .entry(sale.product_id.as_str())
            .or_insert_with(|| ProductAcc {
                name: sale.product_name.clone(),
                quantity: Quantity::zero(),
                revenue: Money::zero(),
                count: 0,
            });
        acc.quantity += sale.quantity();
        acc.revenue += sale.total();
        acc.count += 1;
    }

    let catalog: HashMap<&str, &Product> = products.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut ranked: Vec<ProductPerformance> = by_product
        .into_iter()
        .map(|(product_id, acc)| {
            let product = catalog.get(product_id);
            let cost = product.map(|p| p.cost()).unwrap_or_else(Money::zero);
            let profit = acc.revenue - cost.times(acc.quantity);

            ProductPerformance {
                product_id: product_id.to_string(),
                product_name: acc.name,
                sku: product.map(|p| p.sku.clone()),
                category: product
                    .map(|p| p.category.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                total_quantity_hundredths: acc.quantity.hundredths(),
                revenue_cents: acc.revenue.cents(),
                profit_cents: profit.cents(),
                sales_count: acc.count,
                stock_turnover: 0,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.revenue_cents
            .cmp(&a.revenue_cents)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(limit);
    ranked
}

// =============================================================================
// Category Breakdown
// =============================================================================

/// Rolls up windowed sales per product category.
///
/// Category resolution is an explicit map built from the tenant's products
/// (active or not — historical sales of deactivated products still resolve).
/// Sales whose product no longer exists land in an "Unknown" bucket.
/// Output is sorted by total sales descending, then category name.
pub fn category_breakdown(
    sales: &[Sale],
    products: &[Product],
    period: Period,
    now: DateTime<Utc>,
) -> Vec<CategoryBreakdown> {
    let (start, end) = period_window(period, now);

    let category_of: HashMap<&str, &str> = products
        .iter()
        .map(|p| (p.id.as_str(), p.category.as_str()))
        .collect();

    #[derive(Default)]
    struct CategoryAcc {
        total: Money,
        quantity: Quantity,
        count: i64,
    }

    let mut by_category: HashMap<&str, CategoryAcc> = HashMap::new();

    for sale in sales.iter().filter(|s| in_window(s, start, end)) {
        let category = category_of
            .get(sale.product_id.as_str())
            .copied()
            .unwrap_or("Unknown");
        let acc = by_category.entry(category).or_default();
        acc.total += sale.total();
        acc.quantity += sale.quantity();
        acc.count += 1;
    }

    let mut breakdown: Vec<CategoryBreakdown> = by_category
        .into_iter()
        .map(|(category, acc)| CategoryBreakdown {
            category: category.to_string(),
            total_sales_cents: acc.total.cents(),
            total_quantity_hundredths: acc.quantity.hundredths(),
            sales_count: acc.count,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.total_sales_cents
            .cmp(&a.total_sales_cents)
            .then_with(|| a.category.cmp(&b.category))
    });
    breakdown
}

// =============================================================================
// Sales Trend
// =============================================================================

/// Per-date sales over the trailing `days` days ending now.
///
/// Independent of period bucketing: always exact calendar dates. Dates
/// without sales are omitted, not zero-filled. Ascending by date.
pub fn sales_trend(sales: &[Sale], days: i64, now: DateTime<Utc>) -> Vec<TrendPoint> {
    let start = now - Duration::days(days);

    #[derive(Default)]
    struct DayAcc {
        total: Money,
        quantity: Quantity,
        count: i64,
    }

    let mut by_date: BTreeMap<NaiveDate, DayAcc> = BTreeMap::new();

    for sale in sales.iter().filter(|s| in_window(s, start, now)) {
        let acc = by_date.entry(sale.sale_date.date_naive()).or_default();
        acc.total += sale.total();
        acc.quantity += sale.quantity();
        acc.count += 1;
    }

    by_date
        .into_iter()
        .map(|(date, acc)| TrendPoint {
            date: date.format("%Y-%m-%d").to_string(),
            total_sales_cents: acc.total.cents(),
            total_quantity_hundredths: acc.quantity.hundredths(),
            sales_count: acc.count,
        })
        .collect()
}

// =============================================================================
// Inventory Summary
// =============================================================================

/// Stock health and valuation over active products.
///
/// Inactive products are excluded here even if present in the input slice;
/// they are gone from the shop floor.
pub fn inventory_summary(products: &[Product]) -> InventorySummary {
    let active: Vec<&Product> = products.iter().filter(|p| p.is_active).collect();

    let inventory_value: Money = active.iter().map(|p| p.cost().times(p.stock())).sum();
    let retail_value: Money = active.iter().map(|p| p.price().times(p.stock())).sum();

    InventorySummary {
        total_products: active.len() as i64,
        low_stock_products: active.iter().filter(|p| p.is_low_stock()).count() as i64,
        out_of_stock_products: active.iter().filter(|p| p.is_out_of_stock()).count() as i64,
        total_inventory_value_cents: inventory_value.cents(),
        total_retail_value_cents: retail_value.cents(),
        potential_profit_cents: (retail_value - inventory_value).cents(),
    }
}

// =============================================================================
// Dashboard
// =============================================================================

fn summarize(buckets: &[SalesBucket]) -> HorizonSummary {
    HorizonSummary {
        total_sales_cents: buckets.iter().map(|b| b.total_sales_cents).sum(),
        sales_count: buckets.iter().map(|b| b.sales_count).sum(),
        unique_customers: buckets.iter().map(|b| b.unique_customers).sum(),
    }
}

/// Composes the daily, weekly and monthly bucketed analytics plus the
/// inventory summary into one dashboard payload.
pub fn dashboard(sales: &[Sale], products: &[Product], now: DateTime<Utc>) -> DashboardSummary {
    DashboardSummary {
        today: summarize(&sales_by_period(sales, Period::Daily, now)),
        weekly: summarize(&sales_by_period(sales, Period::Weekly, now)),
        monthly: summarize(&sales_by_period(sales, Period::Monthly, now)),
        inventory: inventory_summary(products),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
