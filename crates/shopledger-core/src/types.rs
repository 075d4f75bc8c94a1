//! # Domain Types
//!
//! Core domain types used throughout Shopledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  user_id        │   │  user_id        │   │  email          │       │
//! │  │  sku (business) │   │  product_name   │   │  shop_name      │       │
//! │  │  stock/price    │   │  total_cents    │   │  role           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tenant Scoping
//! Every Product and Sale carries the owning `user_id`. There is no
//! process-wide tenant context: the caller identity is an explicit argument
//! to every operation in the system.
//!
//! ## Storage Representation
//! Monetary fields are `*_cents` (i64), decimal quantities are
//! `*_hundredths` (i64). Typed accessors return [`Money`] / [`Quantity`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{Money, Quantity};

// =============================================================================
// Product
// =============================================================================

/// A product in a tenant's catalog.
///
/// Products are never physically deleted: deactivation (`is_active = false`)
/// is the only removal path, so historical sales keep a valid reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning tenant.
    pub user_id: String,

    /// Display name.
    pub name: String,

    /// Stock Keeping Unit - business identifier, unique system-wide.
    pub sku: String,

    /// Free-text category label.
    pub category: String,

    /// Current stock level in hundredths of a unit.
    pub stock_hundredths: i64,

    /// Unit cost in cents (for profit calculations).
    pub cost_cents: i64,

    /// Unit sale price in cents.
    pub price_cents: i64,

    /// Low-stock threshold in hundredths of a unit.
    pub min_stock_hundredths: i64,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Whether the product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the current stock as a Quantity.
    #[inline]
    pub fn stock(&self) -> Quantity {
        Quantity::from_hundredths(self.stock_hundredths)
    }

    /// Returns the unit cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the low-stock threshold as a Quantity.
    #[inline]
    pub fn min_stock(&self) -> Quantity {
        Quantity::from_hundredths(self.min_stock_hundredths)
    }

    /// Checks whether stock is strictly below the configured threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_hundredths < self.min_stock_hundredths
    }

    /// Checks whether the product is completely out of stock.
    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock_hundredths == 0
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable point-of-sale transaction record.
///
/// ## Snapshot Pattern
/// `product_name` is frozen at sale time, so historical reports survive
/// later renames or deactivation of the product.
///
/// ## Immutability
/// Sales are created only through the ledger workflow and never updated or
/// deleted afterwards. No mutation path exists in the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,

    /// Owning tenant.
    pub user_id: String,

    /// Product that was sold.
    pub product_id: String,

    /// Product name at time of sale (frozen).
    pub product_name: String,

    /// Quantity sold, in hundredths of a unit. Always positive.
    pub quantity_hundredths: i64,

    /// Unit price at time of sale, in cents.
    pub price_cents: i64,

    /// Line total (quantity × price) in cents.
    pub total_cents: i64,

    /// Customer label; `None` marks an anonymous walk-in transaction.
    pub customer: Option<String>,

    /// Business time of the sale (distinct from record creation time).
    pub sale_date: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sold quantity as a Quantity.
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_hundredths(self.quantity_hundredths)
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// User
// =============================================================================

/// A shop-owner tenant.
///
/// Users exist here only as the scoping key for catalog, ledger and report
/// data. Authentication and credential handling live outside this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub shop_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Request DTOs
// =============================================================================

/// Fields for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub stock_hundredths: i64,
    pub cost_cents: i64,
    pub price_cents: i64,
    pub min_stock_hundredths: i64,
    pub barcode: Option<String>,
}

/// Partial update for a product. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub stock_hundredths: Option<i64>,
    pub cost_cents: Option<i64>,
    pub price_cents: Option<i64>,
    pub min_stock_hundredths: Option<i64>,
    pub barcode: Option<String>,
}

/// Fields for recording a single sale.
///
/// The price is taken from the request, not the catalog: the shop owner may
/// sell below or above the listed price at the counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub product_id: String,
    pub quantity_hundredths: i64,
    pub price_cents: i64,
    pub customer: Option<String>,
}

/// One line of a batch sale. The customer label applies to the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    pub product_id: String,
    pub quantity_hundredths: i64,
    pub price_cents: i64,
}

/// Fields for creating a user (tenant).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub shop_name: String,
    pub phone: Option<String>,
    pub role: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
