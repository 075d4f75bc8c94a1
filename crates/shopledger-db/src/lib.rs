//! # shopledger-db: Persistence Layer for Shopledger
//!
//! This crate provides database access for the Shopledger backend.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Shopledger Data Flow                              │
//! │                                                                         │
//! │  Caller (API layer, CLI, tests)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  shopledger-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌───────────────┐  │   │
//! │  │   │   Database    │   │  Repositories  │   │  Migrations   │  │   │
//! │  │   │   (pool.rs)   │   │ user/product/  │   │  (embedded)   │  │   │
//! │  │   │               │   │ sale           │   │               │  │   │
//! │  │   │ SqlitePool    │◄──│                │   │ 001_init.sql  │  │   │
//! │  │   │ WAL mode      │   │ SaleLedger     │   │ ...           │  │   │
//! │  │   │               │   │ Reports        │   │               │  │   │
//! │  │   └───────────────┘   └────────────────┘   └───────────────┘  │   │
//! │  │                                                                 │   │
//! │  └────────────────────────────┬────────────────────────────────────┘   │
//! │                               │ pure math delegated to                  │
//! │                               ▼                                         │
//! │                     shopledger-core::analytics                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Tenant-scoped repositories (user, product, sale)
//! - [`ledger`] - Transactional sale workflow (the only writer of sales)
//! - [`reports`] - Report data fetching, delegating math to the core crate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopledger_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("shopledger.db")).await?;
//!
//! let product = db.products().insert(user_id, new_product).await?;
//! let sale = db.ledger().record_sale(user_id, new_sale).await?;
//! let dashboard = db.reports().dashboard(user_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod reports;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use ledger::{LedgerError, LedgerResult, SaleLedger};
pub use pool::{Database, DbConfig};
pub use reports::Reports;

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::user::UserRepository;
