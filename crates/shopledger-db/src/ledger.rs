//! # Sale Ledger
//!
//! The transactional write side of the sale ledger: the only code path
//! that creates sale rows and the only one that decrements stock.
//!
//! ## Sale Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     record_sale Workflow                                │
//! │                                                                         │
//! │  1. Validate input (quantity > 0, price >= 0, customer length)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. BEGIN TRANSACTION                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. UPDATE products SET stock = stock - qty                            │
//! │     WHERE id AND user_id AND is_active AND stock >= qty                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. SELECT product (same transaction)                                  │
//! │       ├── no row            → ProductNotFound, ROLLBACK                │
//! │       ├── row, no decrement → InsufficientStock, ROLLBACK              │
//! │       ▼                                                                 │
//! │  5. INSERT sale (name snapshot, total = qty × price)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  6. COMMIT                                                             │
//! │                                                                         │
//! │  The decrement runs FIRST: it takes the write lock immediately and     │
//! │  its WHERE clause carries the stock check, so two concurrent sales     │
//! │  can never both pass a stale read. Rollback restores everything.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Batch sales reuse the same per-item steps inside one transaction; the
//! first failing item aborts the whole batch.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::product::ProductRepository;
use shopledger_core::validation::{
    validate_customer_label, validate_price_cents, validate_quantity_hundredths,
};
use shopledger_core::{BatchItem, CoreError, Money, NewSale, Quantity, Sale, ValidationError};

// =============================================================================
// Ledger Error
// =============================================================================

/// Errors surfaced by the sale workflow.
///
/// Business failures (`Core`) are user-actionable: the product is gone or
/// the stock ran out. Storage failures (`Db`) are infrastructure problems
/// and are never converted into business results.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::Core(CoreError::Validation(err))
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Db(err.into())
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Sale Ledger
// =============================================================================

/// Transactional sale recording.
///
/// ## Usage
/// ```rust,ignore
/// let sale = db.ledger().record_sale(user_id, NewSale {
///     product_id: product.id,
///     quantity_hundredths: 300,  // 3.00 units
///     price_cents: 999,          // $9.99 each
///     customer: None,
/// }).await?;
/// assert_eq!(sale.total_cents, 2997);
/// ```
#[derive(Debug, Clone)]
pub struct SaleLedger {
    pool: SqlitePool,
}

impl SaleLedger {
    /// Creates a new SaleLedger.
    pub fn new(pool: SqlitePool) -> Self {
        SaleLedger { pool }
    }

    /// Records a single sale, atomically decrementing stock.
    ///
    /// On any failure the transaction rolls back: no sale row exists and
    /// stock is untouched.
    ///
    /// ## Errors
    /// * `CoreError::Validation` - bad quantity, price, or customer label
    /// * `CoreError::ProductNotFound` - missing, inactive, or foreign product
    /// * `CoreError::InsufficientStock` - reports name, available, requested
    pub async fn record_sale(&self, user_id: &str, request: NewSale) -> LedgerResult<Sale> {
        validate_request(&request)?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let result = apply_sale(
            &mut tx,
            user_id,
            &request.product_id,
            Quantity::from_hundredths(request.quantity_hundredths),
            Money::from_cents(request.price_cents),
            request.customer.as_deref(),
        )
        .await;

        match result {
            Ok(sale) => {
                tx.commit().await.map_err(DbError::from)?;
                info!(
                    sale_id = %sale.id,
                    user_id = %user_id,
                    total = %sale.total(),
                    "Sale recorded"
                );
                Ok(sale)
            }
            Err(err) => {
                // Dropping the transaction would roll back too; being
                // explicit surfaces rollback failures in the logs.
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    /// Records a batch of sales as one all-or-nothing transaction.
    ///
    /// Items are applied in input order; the first failure aborts and
    /// rolls back every item, including those already applied. The
    /// customer label covers the whole batch.
    pub async fn record_batch(
        &self,
        user_id: &str,
        items: Vec<BatchItem>,
        customer: Option<String>,
    ) -> LedgerResult<Vec<Sale>> {
        // Validate everything up front: cheap rejection before any locks
        for item in &items {
            validate_quantity_hundredths(item.quantity_hundredths).map_err(CoreError::from)?;
            validate_price_cents(item.price_cents).map_err(CoreError::from)?;
        }
        if let Some(label) = customer.as_deref() {
            validate_customer_label(label).map_err(CoreError::from)?;
        }

        debug!(user_id = %user_id, items = items.len(), "Recording sale batch");

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        let mut sales = Vec::with_capacity(items.len());

        for item in &items {
            let result = apply_sale(
                &mut tx,
                user_id,
                &item.product_id,
                Quantity::from_hundredths(item.quantity_hundredths),
                Money::from_cents(item.price_cents),
                customer.as_deref(),
            )
            .await;

            match result {
                Ok(sale) => sales.push(sale),
                Err(err) => {
                    let _ = tx.rollback().await;
                    return Err(err);
                }
            }
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            user_id = %user_id,
            count = sales.len(),
            total = %sales.iter().map(Sale::total).sum::<Money>(),
            "Sale batch recorded"
        );
        Ok(sales)
    }
}

fn validate_request(request: &NewSale) -> Result<(), CoreError> {
    validate_quantity_hundredths(request.quantity_hundredths)?;
    validate_price_cents(request.price_cents)?;
    if let Some(label) = request.customer.as_deref() {
        validate_customer_label(label)?;
    }
    Ok(())
}

/// Applies one sale line on an open transaction.
///
/// Decrement first, then disambiguate with a SELECT through the same
/// transaction: a missing row means the product is gone (or foreign), a
/// present row with a failed decrement means insufficient stock, with the
/// available quantity read from the un-decremented row.
async fn apply_sale(
    conn: &mut SqliteConnection,
    user_id: &str,
    product_id: &str,
    quantity: Quantity,
    price: Money,
    customer: Option<&str>,
) -> LedgerResult<Sale> {
    let decremented =
        ProductRepository::decrement_stock(conn, user_id, product_id, quantity).await?;

    let product = ProductRepository::get_active_tx(conn, user_id, product_id)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    if !decremented {
        let available = product.stock();
        return Err(CoreError::InsufficientStock {
            name: product.name,
            available,
            requested: quantity,
        }
        .into());
    }

    let now = Utc::now();
    let sale = Sale {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        product_id: product_id.to_string(),
        product_name: product.name,
        quantity_hundredths: quantity.hundredths(),
        price_cents: price.cents(),
        total_cents: price.times(quantity).cents(),
        customer: customer.map(str::to_string),
        sale_date: now,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO sales (
            id, user_id, product_id, product_name, quantity_hundredths,
            price_cents, total_cents, customer, sale_date, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.user_id)
    .bind(&sale.product_id)
    .bind(&sale.product_name)
    .bind(sale.quantity_hundredths)
    .bind(sale.price_cents)
    .bind(sale.total_cents)
    .bind(&sale.customer)
    .bind(sale.sale_date)
    .bind(sale.created_at)
    .bind(sale.updated_at)
    .execute(conn)
    .await
    .map_err(DbError::from)?;

    Ok(sale)
}

// =============================================================================
// Unit Tests
// =============================================================================
