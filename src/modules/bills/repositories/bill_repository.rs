use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, ItemEntry, Result, ServiceError};
use crate::modules::bills::models::{Bill, BillDetails, BillListFilter};

/// Tenant-scoped storage of bills and their entries
#[async_trait]
pub trait BillRepository: Send + Sync {
    /// Insert a bill with its entries; `opened_at` is set for bills saved as open
    async fn create(
        &self,
        tenant_id: i64,
        details: &BillDetails,
        opened_at: Option<DateTime<Utc>>,
    ) -> Result<Bill>;

    /// Replace the bill fields and its entries
    async fn update(
        &self,
        tenant_id: i64,
        id: i64,
        details: &BillDetails,
        opened_at: Option<DateTime<Utc>>,
    ) -> Result<()>;

    async fn find_by_id(&self, tenant_id: i64, id: i64) -> Result<Option<Bill>>;

    /// Look a bill up by number, without loading its entries
    async fn find_by_number(&self, tenant_id: i64, bill_number: &str) -> Result<Option<Bill>>;

    /// Page of bills without entries, with the total count
    async fn list(&self, tenant_id: i64, filter: &BillListFilter) -> Result<(Vec<Bill>, i64)>;

    async fn mark_open(&self, tenant_id: i64, id: i64, opened_at: DateTime<Utc>) -> Result<()>;

    async fn delete(&self, tenant_id: i64, id: i64) -> Result<()>;

    async fn count_by_vendor(&self, tenant_id: i64, vendor_id: i64) -> Result<i64>;
}

pub struct MySqlBillRepository {
    pool: MySqlPool,
}

impl MySqlBillRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn insert_entries(
        tx: &mut Transaction<'_, MySql>,
        bill_id: i64,
        entries: &[ItemEntry],
    ) -> Result<()> {
        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO bill_entries (bill_id, `index`, description, quantity, rate, amount)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(bill_id)
            .bind(entry.index)
            .bind(&entry.description)
            .bind(entry.quantity)
            .bind(entry.rate)
            .bind(entry.amount)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn load_entries(&self, bill_id: i64) -> Result<Vec<ItemEntry>> {
        let entries = sqlx::query_as::<_, ItemEntry>(
            r#"
            SELECT `index`, description, quantity, rate, amount
            FROM bill_entries
            WHERE bill_id = ?
            ORDER BY `index`
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

const BILL_COLUMNS: &str = r#"
    id, tenant_id, vendor_id, bill_number, reference_no, bill_date, due_date, amount,
    note, opened_at, created_at, updated_at
"#;

#[async_trait]
impl BillRepository for MySqlBillRepository {
    async fn create(
        &self,
        tenant_id: i64,
        details: &BillDetails,
        opened_at: Option<DateTime<Utc>>,
    ) -> Result<Bill> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO bills (
                tenant_id, vendor_id, bill_number, reference_no, bill_date, due_date,
                amount, note, opened_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(tenant_id)
        .bind(details.vendor_id)
        .bind(&details.bill_number)
        .bind(&details.reference_no)
        .bind(details.bill_date)
        .bind(details.due_date)
        .bind(details.amount)
        .bind(&details.note)
        .bind(opened_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| AppError::from(err).on_duplicate(ServiceError::BillNumberExists))?;

        let id = result.last_insert_id() as i64;
        Self::insert_entries(&mut tx, id, &details.entries).await?;
        tx.commit().await?;

        self.find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Bill {} vanished after insert", id)))
    }

    async fn update(
        &self,
        tenant_id: i64,
        id: i64,
        details: &BillDetails,
        opened_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE bills
            SET vendor_id = ?, bill_number = ?, reference_no = ?, bill_date = ?, due_date = ?,
                amount = ?, note = ?, opened_at = ?, updated_at = NOW()
            WHERE tenant_id = ? AND id = ?
            "#,
        )
        .bind(details.vendor_id)
        .bind(&details.bill_number)
        .bind(&details.reference_no)
        .bind(details.bill_date)
        .bind(details.due_date)
        .bind(details.amount)
        .bind(&details.note)
        .bind(opened_at)
        .bind(tenant_id)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|err| AppError::from(err).on_duplicate(ServiceError::BillNumberExists))?;

        sqlx::query("DELETE FROM bill_entries WHERE bill_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_entries(&mut tx, id, &details.entries).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, tenant_id: i64, id: i64) -> Result<Option<Bill>> {
        let bill = sqlx::query_as::<_, Bill>(&format!(
            "SELECT {} FROM bills WHERE tenant_id = ? AND id = ?",
            BILL_COLUMNS
        ))
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match bill {
            Some(mut bill) => {
                bill.entries = self.load_entries(bill.id).await?;
                Ok(Some(bill))
            }
            None => Ok(None),
        }
    }

    async fn find_by_number(&self, tenant_id: i64, bill_number: &str) -> Result<Option<Bill>> {
        let bill = sqlx::query_as::<_, Bill>(&format!(
            "SELECT {} FROM bills WHERE tenant_id = ? AND bill_number = ?",
            BILL_COLUMNS
        ))
        .bind(tenant_id)
        .bind(bill_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bill)
    }

    async fn list(&self, tenant_id: i64, filter: &BillListFilter) -> Result<(Vec<Bill>, i64)> {
        // Column and direction come from closed enums, never from raw input
        let bills = sqlx::query_as::<_, Bill>(&format!(
            "SELECT {} FROM bills WHERE tenant_id = ? ORDER BY {} {}, id {} LIMIT ? OFFSET ?",
            BILL_COLUMNS,
            filter.sort_column.as_sql(),
            filter.sort_order.as_sql(),
            filter.sort_order.as_sql(),
        ))
        .bind(tenant_id)
        .bind(filter.page.limit())
        .bind(filter.page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills WHERE tenant_id = ?")
            .bind(tenant_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((bills, total))
    }

    async fn mark_open(&self, tenant_id: i64, id: i64, opened_at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "UPDATE bills SET opened_at = ?, updated_at = NOW() WHERE tenant_id = ? AND id = ?",
        )
        .bind(opened_at)
        .bind(tenant_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, tenant_id: i64, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM bills WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn count_by_vendor(&self, tenant_id: i64, vendor_id: i64) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM bills WHERE tenant_id = ? AND vendor_id = ?")
                .bind(tenant_id)
                .bind(vendor_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
