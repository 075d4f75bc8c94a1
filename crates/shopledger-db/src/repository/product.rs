//! # Product Repository
//!
//! Catalog operations for a tenant's products.
//!
//! ## Key Operations
//! - CRUD with soft delete (products are never physically removed)
//! - Filtered listing (category, case-insensitive substring search)
//! - Code lookup for the counter (barcode → SKU → name)
//! - Stock operations, including the conditional decrement the sale
//!   ledger composes into its transaction
//!
//! ## Conditional Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Why the decrement is a single UPDATE                       │
//! │                                                                         │
//! │  Naive (racy):                   Atomic (this repo):                    │
//! │  ─────────────                   ──────────────────                     │
//! │  SELECT stock        ◄─┐         UPDATE products                        │
//! │  if stock >= qty       │ gap       SET stock = stock - qty              │
//! │  UPDATE stock - qty  ◄─┘           WHERE ... AND stock >= qty           │
//! │                                                                         │
//! │  Two concurrent sales can        Zero rows affected == insufficient     │
//! │  both pass the check and         stock. The check and the write are     │
//! │  drive stock negative.           one statement; no gap exists.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use shopledger_core::validation::{validate_price_cents, validate_product_name, validate_sku};
use shopledger_core::{NewProduct, Product, Quantity, UpdateProduct};

/// Columns selected for every Product row mapping.
pub(crate) const PRODUCT_COLUMNS: &str = "id, user_id, name, sku, category, stock_hundredths, \
     cost_cents, price_cents, min_stock_hundredths, barcode, is_active, \
     created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.insert(user_id, new_product).await?;
/// let listing = repo.list(user_id, Some("Drinks"), None).await?;
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

    /// Inserts a new product into a tenant's catalog.
    ///
    /// Validates name, SKU and price before touching the database;
    /// generates the UUID and timestamps. A duplicate SKU (unique
    /// system-wide) surfaces as `DbError::UniqueViolation`.
    pub async fn insert(&self, user_id: &str, new_product: NewProduct) -> DbResult<Product> {
        validate_product_name(&new_product.name)?;
        validate_sku(&new_product.sku)?;
        validate_price_cents(new_product.price_cents)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: new_product.name,
            sku: new_product.sku,
            category: new_product.category,
            stock_hundredths: new_product.stock_hundredths,
            cost_cents: new_product.cost_cents,
            price_cents: new_product.price_cents,
            min_stock_hundredths: new_product.min_stock_hundredths,
            barcode: new_product.barcode,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(user_id = %user_id, sku = %product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, user_id, name, sku, category, stock_hundredths,
                cost_cents, price_cents, min_stock_hundredths, barcode,
                is_active, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&product.id)
        .bind(&product.user_id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(product.stock_hundredths)
        .bind(product.cost_cents)
        .bind(product.price_cents)
        .bind(product.min_stock_hundredths)
        .bind(&product.barcode)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets an active product owned by the tenant.
    ///
    /// Inactive products and other tenants' products both come back as
    /// `None`; a foreign product must not be distinguishable from a
    /// missing one.
    pub async fn get_active(&self, user_id: &str, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE id = ?1 AND user_id = ?2 AND is_active = 1"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists a tenant's active products, newest first.
    ///
    /// ## Filters
    /// * `category` - exact match; `None` or `"all"` disables the filter
    /// * `search` - case-insensitive substring across name, SKU and barcode
    pub async fn list(
        &self,
        user_id: &str,
        category: Option<&str>,
        search: Option<&str>,
    ) -> DbResult<Vec<Product>> {
        // "all" is the wire convention for no category filter
        let category = category.filter(|c| !c.eq_ignore_ascii_case("all"));
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        debug!(
            user_id = %user_id,
            category = ?category,
            search = ?search,
            "Listing products"
        );

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE user_id = ?1 AND is_active = 1 \
             AND (?2 IS NULL OR category = ?2) \
             AND (?3 IS NULL \
                  OR name LIKE '%' || ?3 || '%' \
                  OR sku LIKE '%' || ?3 || '%' \
                  OR (barcode IS NOT NULL AND barcode LIKE '%' || ?3 || '%')) \
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .bind(category)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Looks up a product by scanned or typed code.
    ///
    /// Exact barcode or SKU match first; if neither hits, falls back to a
    /// case-insensitive name substring match. Built for the counter, where
    /// the input may be a scan or a half-remembered name.
    pub async fn find_by_code(&self, user_id: &str, code: &str) -> DbResult<Option<Product>> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }

        let exact = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE user_id = ?1 AND is_active = 1 \
             AND (barcode = ?2 OR sku = ?2) \
             LIMIT 1"
        ))
        .bind(user_id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        if exact.is_some() {
            return Ok(exact);
        }

        let by_name = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE user_id = ?1 AND is_active = 1 \
             AND name LIKE '%' || ?2 || '%' \
             LIMIT 1"
        ))
        .bind(user_id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(by_name)
    }

    /// Partially updates an active owned product. `None` fields are left
    /// unchanged and skip validation. Returns the updated row, or `None`
    /// if no such product.
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        changes: UpdateProduct,
    ) -> DbResult<Option<Product>> {
        if let Some(name) = changes.name.as_deref() {
            validate_product_name(name)?;
        }
        if let Some(sku) = changes.sku.as_deref() {
            validate_sku(sku)?;
        }
        if let Some(price) = changes.price_cents {
            validate_price_cents(price)?;
        }

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = COALESCE(?3, name),
                sku = COALESCE(?4, sku),
                category = COALESCE(?5, category),
                stock_hundredths = COALESCE(?6, stock_hundredths),
                cost_cents = COALESCE(?7, cost_cents),
                price_cents = COALESCE(?8, price_cents),
                min_stock_hundredths = COALESCE(?9, min_stock_hundredths),
                barcode = COALESCE(?10, barcode),
                updated_at = ?11
            WHERE id = ?1 AND user_id = ?2 AND is_active = 1
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&changes.name)
        .bind(&changes.sku)
        .bind(&changes.category)
        .bind(changes.stock_hundredths)
        .bind(changes.cost_cents)
        .bind(changes.price_cents)
        .bind(changes.min_stock_hundredths)
        .bind(&changes.barcode)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_active(user_id, id).await
    }

    /// Soft-deletes a product (sets `is_active = 0`).
    ///
    /// Historical sales keep their reference; the product simply stops
    /// appearing in listings and can no longer be sold.
    pub async fn soft_delete(&self, user_id: &str, id: &str) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?3 \
             WHERE id = ?1 AND user_id = ?2 AND is_active = 1",
        )
        .bind(id)
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns the distinct categories of a tenant's active products.
    pub async fn categories(&self, user_id: &str) -> DbResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products \
             WHERE user_id = ?1 AND is_active = 1 \
             ORDER BY category",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Lists active products with stock strictly below their threshold.
    pub async fn low_stock(&self, user_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE user_id = ?1 AND is_active = 1 \
             AND stock_hundredths < min_stock_hundredths \
             ORDER BY stock_hundredths ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Adds stock to an active owned product.
    ///
    /// Non-positive deltas are rejected as a no-op; stock corrections
    /// downward go through `update` explicitly.
    pub async fn restock(&self, user_id: &str, id: &str, delta: Quantity) -> DbResult<bool> {
        if !delta.is_positive() {
            return Ok(false);
        }

        let now = Utc::now();

        debug!(user_id = %user_id, product_id = %id, delta = %delta, "Restocking product");

        let result = sqlx::query(
            "UPDATE products \
             SET stock_hundredths = stock_hundredths + ?4, updated_at = ?3 \
             WHERE id = ?1 AND user_id = ?2 AND is_active = 1",
        )
        .bind(id)
        .bind(user_id)
        .bind(now)
        .bind(delta.hundredths())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Conditionally decrements stock on an open transaction.
    ///
    /// The stock check is part of the UPDATE's WHERE clause, so the
    /// check and the write are one atomic statement. Returns `false`
    /// when no row matched: product missing, inactive, foreign, or
    /// insufficient stock — the caller disambiguates with a follow-up
    /// SELECT on the same transaction.
    pub(crate) async fn decrement_stock(
        conn: &mut SqliteConnection,
        user_id: &str,
        id: &str,
        quantity: Quantity,
    ) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products \
             SET stock_hundredths = stock_hundredths - ?4, updated_at = ?3 \
             WHERE id = ?1 AND user_id = ?2 AND is_active = 1 \
             AND stock_hundredths >= ?4",
        )
        .bind(id)
        .bind(user_id)
        .bind(now)
        .bind(quantity.hundredths())
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetches an active owned product on an open transaction.
    ///
    /// Same visibility rules as [`get_active`](Self::get_active), but
    /// reads through the transaction so it sees its own writes.
    pub(crate) async fn get_active_tx(
        conn: &mut SqliteConnection,
        user_id: &str,
        id: &str,
    ) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE id = ?1 AND user_id = ?2 AND is_active = 1"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(product)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use shopledger_core::{NewProduct, NewUser, Quantity, UpdateProduct};

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

    fn widget(sku: &str, category: &str, stock: i64, min_stock: i64) -> NewProduct {
        NewProduct {
            name: format!("Widget {sku}"),
            sku: sku.to_string(),
            category: category.to_string(),
            stock_hundredths: stock,
            cost_cents: 400,
            price_cents: 999,
            min_stock_hundredths: min_stock,
            barcode: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (db, user_id) = setup().await;
        let repo = db.products();

        let product = repo.insert(&user_id, widget("WID-1", "Hardware", 1000, 100)).await.unwrap();
        assert!(product.is_active);

        let fetched = repo.get_active(&user_id, &product.id).await.unwrap().unwrap();
        assert_eq!(fetched.sku, "WID-1");
        assert_eq!(fetched.stock_hundredths, 1000);
    }

    #[tokio::test]
    async fn test_insert_validates_fields() {
        let (db, user_id) = setup().await;
        let repo = db.products();

        let mut blank_name = widget("WID-1", "Hardware", 0, 0);
        blank_name.name = "".to_string();
        let mut blank_sku = widget("", "Hardware", 0, 0);
        blank_sku.name = "Widget".to_string();
        let mut bad_sku = widget("has space", "Hardware", 0, 0);
        bad_sku.name = "Widget".to_string();
        let mut negative_price = widget("WID-2", "Hardware", 0, 0);
        negative_price.price_cents = -100;

        for bad in [blank_name, blank_sku, bad_sku, negative_price] {
            let err = repo.insert(&user_id, bad).await.unwrap_err();
            assert!(matches!(err, DbError::InvalidInput(_)));
        }

        // Nothing was persisted
        assert!(repo.list(&user_id, None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_validates_provided_fields() {
        let (db, user_id) = setup().await;
        let repo = db.products();

        let product = repo.insert(&user_id, widget("WID-1", "Hardware", 100, 0)).await.unwrap();

        let err = repo
            .update(
                &user_id,
                &product.id,
                UpdateProduct {
                    sku: Some("".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidInput(_)));

        // The row is untouched
        let unchanged = repo.get_active(&user_id, &product.id).await.unwrap().unwrap();
        assert_eq!(unchanged.sku, "WID-1");
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let (db, user_id) = setup().await;
        let repo = db.products();

        repo.insert(&user_id, widget("WID-1", "Hardware", 0, 0)).await.unwrap();
        let err = repo
            .insert(&user_id, widget("WID-1", "Hardware", 0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_foreign_product_invisible() {
        let (db, user_id) = setup().await;
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

        let repo = db.products();
        let product = repo.insert(&user_id, widget("WID-1", "Hardware", 100, 0)).await.unwrap();

        // Looks identical to a missing product
        assert!(repo.get_active(&other.id, &product.id).await.unwrap().is_none());
        assert!(repo.list(&other.id, None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (db, user_id) = setup().await;
        let repo = db.products();

        repo.insert(&user_id, widget("COKE-330", "Drinks", 100, 0)).await.unwrap();
        repo.insert(&user_id, widget("CHIP-50", "Snacks", 100, 0)).await.unwrap();

        let all = repo.list(&user_id, None, None).await.unwrap();
        assert_eq!(all.len(), 2);

        // "all" disables the category filter
        let all_kw = repo.list(&user_id, Some("all"), None).await.unwrap();
        assert_eq!(all_kw.len(), 2);

        let drinks = repo.list(&user_id, Some("Drinks"), None).await.unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].sku, "COKE-330");

        // Case-insensitive substring search on name/sku
        let hit = repo.list(&user_id, None, Some("coke")).await.unwrap();
        assert_eq!(hit.len(), 1);

        let miss = repo.list(&user_id, None, Some("pepsi")).await.unwrap();
        assert!(miss.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_code() {
        let (db, user_id) = setup().await;
        let repo = db.products();

        let mut p = widget("COKE-330", "Drinks", 100, 0);
        p.barcode = Some("5449000000996".to_string());
        p.name = "Coca-Cola 330ml".to_string();
        repo.insert(&user_id, p).await.unwrap();

        // Exact barcode
        let by_barcode = repo.find_by_code(&user_id, "5449000000996").await.unwrap();
        assert!(by_barcode.is_some());

        // Exact SKU
        let by_sku = repo.find_by_code(&user_id, "COKE-330").await.unwrap();
        assert!(by_sku.is_some());

        // Name substring fallback
        let by_name = repo.find_by_code(&user_id, "cola").await.unwrap();
        assert!(by_name.is_some());

        assert!(repo.find_by_code(&user_id, "pepsi").await.unwrap().is_none());
        assert!(repo.find_by_code(&user_id, "  ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (db, user_id) = setup().await;
        let repo = db.products();

        let product = repo.insert(&user_id, widget("WID-1", "Hardware", 100, 0)).await.unwrap();

        let updated = repo
            .update(
                &user_id,
                &product.id,
                UpdateProduct {
                    price_cents: Some(1299),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        // Changed field applied, the rest untouched
        assert_eq!(updated.price_cents, 1299);
        assert_eq!(updated.sku, "WID-1");
        assert_eq!(updated.stock_hundredths, 100);

        // Missing product → None, not an error
        let none = repo.update(&user_id, "nope", UpdateProduct::default()).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_soft_delete_hides_product() {
        let (db, user_id) = setup().await;
        let repo = db.products();

        let product = repo.insert(&user_id, widget("WID-1", "Hardware", 100, 0)).await.unwrap();
        assert!(repo.soft_delete(&user_id, &product.id).await.unwrap());

        assert!(repo.get_active(&user_id, &product.id).await.unwrap().is_none());
        assert!(repo.list(&user_id, None, None).await.unwrap().is_empty());

        // Second delete is a no-op
        assert!(!repo.soft_delete(&user_id, &product.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_categories_distinct_sorted() {
        let (db, user_id) = setup().await;
        let repo = db.products();

        repo.insert(&user_id, widget("A", "Snacks", 0, 0)).await.unwrap();
        repo.insert(&user_id, widget("B", "Drinks", 0, 0)).await.unwrap();
        repo.insert(&user_id, widget("C", "Drinks", 0, 0)).await.unwrap();

        let categories = repo.categories(&user_id).await.unwrap();
        assert_eq!(categories, vec!["Drinks".to_string(), "Snacks".to_string()]);
    }

    #[tokio::test]
    async fn test_low_stock_is_strict() {
        let (db, user_id) = setup().await;
        let repo = db.products();

        repo.insert(&user_id, widget("AT", "X", 500, 500)).await.unwrap(); // at threshold
        repo.insert(&user_id, widget("BELOW", "X", 499, 500)).await.unwrap();
        repo.insert(&user_id, widget("OUT", "X", 0, 100)).await.unwrap();

        let low = repo.low_stock(&user_id).await.unwrap();
        let skus: Vec<&str> = low.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["OUT", "BELOW"]); // lowest stock first, AT excluded
    }

    #[tokio::test]
    async fn test_restock() {
        let (db, user_id) = setup().await;
        let repo = db.products();

        let product = repo.insert(&user_id, widget("WID-1", "X", 100, 0)).await.unwrap();

        assert!(repo.restock(&user_id, &product.id, Quantity::from_units(5)).await.unwrap());
        let after = repo.get_active(&user_id, &product.id).await.unwrap().unwrap();
        assert_eq!(after.stock_hundredths, 600);

        // Non-positive delta is a no-op
        assert!(!repo.restock(&user_id, &product.id, Quantity::zero()).await.unwrap());
        assert!(!repo
            .restock(&user_id, &product.id, Quantity::from_hundredths(-100))
            .await
            .unwrap());
    }
}
