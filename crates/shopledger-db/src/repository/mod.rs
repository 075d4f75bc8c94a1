//! # Repository Module
//!
//! Repository implementations for database entities.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Repository Pattern                                  │
//! │                                                                         │
//! │  Caller                Repository              Database                 │
//! │  ──────                ──────────              ────────                 │
//! │  list(user, ...)  ──►  SQL query          ──►  SELECT ...              │
//! │  insert(product)  ──►  SQL + validation   ──►  INSERT ...              │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL isolated in one place per entity                                │
//! │  • Tenant scoping enforced at the query level                          │
//! │  • Testable against in-memory SQLite                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every query here is tenant-scoped: `user_id` is an explicit argument and
//! lands in the WHERE clause. There is no way to read another tenant's rows
//! through a repository method.

pub mod product;
pub mod sale;
pub mod user;
