//! # User Repository
//!
//! Database operations for users (tenants).
//!
//! Users exist as the scoping key for catalog, ledger and report data.
//! There is no authentication here; credentials live outside this system.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use shopledger_core::{NewUser, User};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user (tenant).
    ///
    /// Duplicate email → `DbError::UniqueViolation`.
    pub async fn insert(&self, new_user: NewUser) -> DbResult<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new_user.name,
            email: new_user.email,
            shop_name: new_user.shop_name,
            phone: new_user.phone,
            role: new_user.role.unwrap_or_else(|| "owner".to_string()),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        debug!(user_id = %user.id, email = %user.email, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, shop_name, phone, role, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.shop_name)
        .bind(&user.phone)
        .bind(&user.role)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, shop_name, phone, role, is_active, created_at, updated_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, shop_name, phone, role, is_active, created_at, updated_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use shopledger_core::NewUser;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Asha".to_string(),
            email: email.to_string(),
            shop_name: "Asha's Corner Shop".to_string(),
            phone: None,
            role: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        let user = users.insert(new_user("asha@example.com")).await.unwrap();
        assert_eq!(user.role, "owner");
        assert!(user.is_active);

        let fetched = users.get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "asha@example.com");

        let by_email = users.get_by_email("asha@example.com").await.unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        users.insert(new_user("dup@example.com")).await.unwrap();
        let err = users.insert(new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.users().get_by_id("nope").await.unwrap().is_none());
    }
}
