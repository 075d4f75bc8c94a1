//! # Shopledger Core
//!
//! Pure business logic for the Shopledger shop-management backend.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Workspace Layout                                 │
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │                    shopledger-db                                  │  │
//! │  │  SQLite persistence: repositories, sale ledger, reports facade   │  │
//! │  └────────────────────────────┬──────────────────────────────────────┘  │
//! │                               │ depends on                              │
//! │                               ▼                                         │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │                ★ shopledger-core (this crate) ★                   │  │
//! │  │                                                                   │  │
//! │  │  money       - Money / Quantity scaled-integer types              │  │
//! │  │  types       - Product, Sale, User + request DTOs                 │  │
//! │  │  error       - CoreError, ValidationError                         │  │
//! │  │  validation  - field-level input validation                       │  │
//! │  │  analytics   - pure report computation (no I/O, no clock)         │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! - **No I/O**: this crate never touches a database, file, or clock.
//!   Analytics take `now` as an argument; persistence lives in
//!   `shopledger-db`.
//! - **Scaled integers**: money in cents, quantities in hundredths.
//!   Floating point never enters a financial calculation.
//! - **Explicit tenancy**: every operation takes the owning user id;
//!   there is no ambient tenant context.
//!
//! The optional `sqlx` feature derives `sqlx::FromRow` on the entity types
//! so the persistence crate can map rows directly.

pub mod analytics;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use analytics::{
    CategoryBreakdown, DashboardSummary, HorizonSummary, InventorySummary, Period,
    ProductPerformance, SalesBucket, TrendPoint,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Quantity};
pub use types::{BatchItem, NewProduct, NewSale, NewUser, Product, Sale, UpdateProduct, User};

// =============================================================================
// Domain Constants
// =============================================================================

/// Maximum quantity for a single sale line, in hundredths (999.00 units).
///
/// A guard against fat-finger entries at the counter, not a business rule.
pub const MAX_SALE_QUANTITY_HUNDREDTHS: i64 = 99_900;
