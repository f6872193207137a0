use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, PageRequest, Result, ServiceError};
use crate::modules::payment_receives::models::{
    PaymentReceive, PaymentReceiveDetails, PaymentReceiveEntry,
};

/// Tenant-scoped storage of received payments.
///
/// Creating and deleting a payment adjusts `payment_amount` of the invoices
/// it is applied to within the same transaction.
#[async_trait]
pub trait PaymentReceiveRepository: Send + Sync {
    async fn create(&self, tenant_id: i64, details: &PaymentReceiveDetails)
        -> Result<PaymentReceive>;

    async fn find_by_id(&self, tenant_id: i64, id: i64) -> Result<Option<PaymentReceive>>;

    async fn find_by_number(
        &self,
        tenant_id: i64,
        payment_receive_no: &str,
    ) -> Result<Option<PaymentReceive>>;

    async fn list(&self, tenant_id: i64, page: PageRequest)
        -> Result<(Vec<PaymentReceive>, i64)>;

    async fn delete(&self, tenant_id: i64, id: i64) -> Result<()>;
}

pub struct MySqlPaymentReceiveRepository {
    pool: MySqlPool,
}

impl MySqlPaymentReceiveRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const PAYMENT_COLUMNS: &str = r#"
    id, tenant_id, customer_id, payment_date, payment_receive_no, reference_no,
    description, amount, created_at
"#;

const ENTRIES_QUERY: &str = r#"
    SELECT invoice_id, payment_amount
    FROM payment_receive_entries
    WHERE payment_receive_id = ?
    ORDER BY invoice_id
"#;

#[async_trait]
impl PaymentReceiveRepository for MySqlPaymentReceiveRepository {
    async fn create(
        &self,
        tenant_id: i64,
        details: &PaymentReceiveDetails,
    ) -> Result<PaymentReceive> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO payment_receives (
                tenant_id, customer_id, payment_date, payment_receive_no, reference_no,
                description, amount, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, NOW())
            "#,
        )
        .bind(tenant_id)
        .bind(details.customer_id)
        .bind(details.payment_date)
        .bind(&details.payment_receive_no)
        .bind(&details.reference_no)
        .bind(&details.description)
        .bind(details.amount)
        .execute(&mut *tx)
        .await
        .map_err(|err| AppError::from(err).on_duplicate(ServiceError::PaymentReceiveNoExists))?;

        let id = result.last_insert_id() as i64;

        for entry in &details.entries {
            sqlx::query(
                r#"
                INSERT INTO payment_receive_entries (payment_receive_id, invoice_id, payment_amount)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(id)
            .bind(entry.invoice_id)
            .bind(entry.payment_amount)
            .execute(&mut *tx)
            .await?;

            // payment_amount never exceeds the invoice amount
            let updated = sqlx::query(
                r#"
                UPDATE sales_invoices
                SET payment_amount = payment_amount + ?, updated_at = NOW()
                WHERE tenant_id = ? AND id = ? AND payment_amount + ? <= amount
                "#,
            )
            .bind(entry.payment_amount)
            .bind(tenant_id)
            .bind(entry.invoice_id)
            .bind(entry.payment_amount)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                // Dropping the transaction rolls it back
                return Err(ServiceError::InvalidPaymentAmount.into());
            }
        }

        tx.commit().await?;

        self.find_by_id(tenant_id, id).await?.ok_or_else(|| {
            AppError::internal(format!("Payment receive {} vanished after insert", id))
        })
    }

    async fn find_by_id(&self, tenant_id: i64, id: i64) -> Result<Option<PaymentReceive>> {
        let payment = sqlx::query_as::<_, PaymentReceive>(&format!(
            "SELECT {} FROM payment_receives WHERE tenant_id = ? AND id = ?",
            PAYMENT_COLUMNS
        ))
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut payment) = payment else {
            return Ok(None);
        };

        payment.entries = sqlx::query_as::<_, PaymentReceiveEntry>(ENTRIES_QUERY)
            .bind(payment.id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(payment))
    }

    async fn find_by_number(
        &self,
        tenant_id: i64,
        payment_receive_no: &str,
    ) -> Result<Option<PaymentReceive>> {
        let payment = sqlx::query_as::<_, PaymentReceive>(&format!(
            "SELECT {} FROM payment_receives WHERE tenant_id = ? AND payment_receive_no = ?",
            PAYMENT_COLUMNS
        ))
        .bind(tenant_id)
        .bind(payment_receive_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn list(
        &self,
        tenant_id: i64,
        page: PageRequest,
    ) -> Result<(Vec<PaymentReceive>, i64)> {
        let payments = sqlx::query_as::<_, PaymentReceive>(&format!(
            "SELECT {} FROM payment_receives WHERE tenant_id = ? \
             ORDER BY payment_date DESC, id DESC LIMIT ? OFFSET ?",
            PAYMENT_COLUMNS
        ))
        .bind(tenant_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payment_receives WHERE tenant_id = ?")
                .bind(tenant_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((payments, total))
    }

    async fn delete(&self, tenant_id: i64, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let entries = sqlx::query_as::<_, PaymentReceiveEntry>(ENTRIES_QUERY)
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        for entry in &entries {
            sqlx::query(
                r#"
                UPDATE sales_invoices
                SET payment_amount = GREATEST(payment_amount - ?, 0), updated_at = NOW()
                WHERE tenant_id = ? AND id = ?
                "#,
            )
            .bind(entry.payment_amount)
            .bind(tenant_id)
            .bind(entry.invoice_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM payment_receives WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
