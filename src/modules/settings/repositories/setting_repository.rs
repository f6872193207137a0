use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::settings::models::Setting;

#[async_trait]
pub trait SettingRepository: Send + Sync {
    async fn list(&self, tenant_id: i64) -> Result<Vec<Setting>>;

    async fn get(&self, tenant_id: i64, group: &str, key: &str) -> Result<Option<String>>;

    /// Insert or replace every option in one transaction
    async fn upsert(&self, tenant_id: i64, options: &[Setting]) -> Result<()>;
}

pub struct MySqlSettingRepository {
    pool: MySqlPool,
}

impl MySqlSettingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingRepository for MySqlSettingRepository {
    async fn list(&self, tenant_id: i64) -> Result<Vec<Setting>> {
        let settings = sqlx::query_as::<_, Setting>(
            "SELECT `group`, `key`, value FROM settings WHERE tenant_id = ? ORDER BY `group`, `key`",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn get(&self, tenant_id: i64, group: &str, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar(
            "SELECT value FROM settings WHERE tenant_id = ? AND `group` = ? AND `key` = ?",
        )
        .bind(tenant_id)
        .bind(group)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn upsert(&self, tenant_id: i64, options: &[Setting]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for option in options {
            sqlx::query(
                r#"
                INSERT INTO settings (tenant_id, `group`, `key`, value)
                VALUES (?, ?, ?, ?)
                ON DUPLICATE KEY UPDATE value = VALUES(value)
                "#,
            )
            .bind(tenant_id)
            .bind(&option.group)
            .bind(&option.key)
            .bind(&option.value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
