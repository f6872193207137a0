use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use crate::core::{PageRequest, Result};
use crate::modules::users::models::{SystemUser, UserDetails};

/// Tenant-scoped storage of system users. Soft-deleted rows are never returned.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Page of users ordered by id, with the total count
    async fn list(&self, tenant_id: i64, page: PageRequest) -> Result<(Vec<SystemUser>, i64)>;

    async fn find_by_id(&self, tenant_id: i64, id: i64) -> Result<Option<SystemUser>>;

    async fn find_by_email(&self, tenant_id: i64, email: &str) -> Result<Option<SystemUser>>;

    async fn find_by_phone_number(
        &self,
        tenant_id: i64,
        phone_number: &str,
    ) -> Result<Option<SystemUser>>;

    async fn update_details(&self, tenant_id: i64, id: i64, details: &UserDetails) -> Result<()>;

    async fn set_active(&self, tenant_id: i64, id: i64, active: bool) -> Result<()>;

    async fn soft_delete(&self, tenant_id: i64, id: i64, deleted_at: DateTime<Utc>) -> Result<()>;
}

pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = r#"
    id, tenant_id, first_name, last_name, email, phone_number, active,
    invite_accepted_at, last_login_at, deleted_at, created_at, updated_at
"#;

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn list(&self, tenant_id: i64, page: PageRequest) -> Result<(Vec<SystemUser>, i64)> {
        let users = sqlx::query_as::<_, SystemUser>(&format!(
            "SELECT {} FROM users WHERE tenant_id = ? AND deleted_at IS NULL \
             ORDER BY id LIMIT ? OFFSET ?",
            USER_COLUMNS
        ))
        .bind(tenant_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE tenant_id = ? AND deleted_at IS NULL",
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((users, total))
    }

    async fn find_by_id(&self, tenant_id: i64, id: i64) -> Result<Option<SystemUser>> {
        let user = sqlx::query_as::<_, SystemUser>(&format!(
            "SELECT {} FROM users WHERE tenant_id = ? AND id = ? AND deleted_at IS NULL",
            USER_COLUMNS
        ))
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, tenant_id: i64, email: &str) -> Result<Option<SystemUser>> {
        let user = sqlx::query_as::<_, SystemUser>(&format!(
            "SELECT {} FROM users WHERE tenant_id = ? AND email = ? AND deleted_at IS NULL",
            USER_COLUMNS
        ))
        .bind(tenant_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_phone_number(
        &self,
        tenant_id: i64,
        phone_number: &str,
    ) -> Result<Option<SystemUser>> {
        let user = sqlx::query_as::<_, SystemUser>(&format!(
            "SELECT {} FROM users WHERE tenant_id = ? AND phone_number = ? AND deleted_at IS NULL",
            USER_COLUMNS
        ))
        .bind(tenant_id)
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_details(&self, tenant_id: i64, id: i64, details: &UserDetails) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, email = ?, phone_number = ?, updated_at = NOW()
            WHERE tenant_id = ? AND id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(&details.email)
        .bind(&details.phone_number)
        .bind(tenant_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_active(&self, tenant_id: i64, id: i64, active: bool) -> Result<()> {
        sqlx::query(
            "UPDATE users SET active = ?, updated_at = NOW() \
             WHERE tenant_id = ? AND id = ? AND deleted_at IS NULL",
        )
        .bind(active)
        .bind(tenant_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn soft_delete(&self, tenant_id: i64, id: i64, deleted_at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "UPDATE users SET deleted_at = ? WHERE tenant_id = ? AND id = ? AND deleted_at IS NULL",
        )
        .bind(deleted_at)
        .bind(tenant_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
