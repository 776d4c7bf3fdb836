//! Administrator credential storage

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{check_health, DbError};
use crate::models::AdminUser;

/// Lookup and provisioning of admin accounts
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, sqlx::Error>;

    /// Insert an account unless the username is taken; returns the new row
    async fn insert_if_absent(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error>;

    async fn health(&self) -> Result<(), DbError>;
}

/// Postgres-backed repository over the `admin_users` table
#[derive(Clone)]
pub struct PgAdminRepository {
    db_pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, sqlx::Error> {
        sqlx::query_as::<_, AdminUser>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM admin_users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db_pool)
        .await
    }

    async fn insert_if_absent(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        sqlx::query_as::<_, AdminUser>(
            r#"
            INSERT INTO admin_users (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.db_pool)
        .await
    }

    async fn health(&self) -> Result<(), DbError> {
        check_health(&self.db_pool).await
    }
}

/// Map-backed repository for tests and local runs
#[derive(Debug, Default, Clone)]
pub struct InMemoryAdminRepository {
    users: Arc<RwLock<HashMap<String, AdminUser>>>,
}

impl InMemoryAdminRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminRepository for InMemoryAdminRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, sqlx::Error> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert_if_absent(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Ok(None);
        }

        let user = AdminUser {
            id: users.len() as i32 + 1,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(username.to_string(), user.clone());

        Ok(Some(user))
    }

    async fn health(&self) -> Result<(), DbError> {
        Ok(())
    }
}
