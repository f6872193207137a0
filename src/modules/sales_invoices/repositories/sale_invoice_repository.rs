use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::core::{AppError, ItemEntry, PageRequest, Result, ServiceError};
use crate::modules::sales_invoices::models::{Receivable, SaleInvoice, SaleInvoiceDetails};

/// Tenant-scoped storage of sale invoices
#[async_trait]
pub trait SaleInvoiceRepository: Send + Sync {
    async fn create(
        &self,
        tenant_id: i64,
        details: &SaleInvoiceDetails,
        delivered_at: Option<DateTime<Utc>>,
    ) -> Result<SaleInvoice>;

    async fn find_by_id(&self, tenant_id: i64, id: i64) -> Result<Option<SaleInvoice>>;

    /// Look an invoice up by number, without loading its entries
    async fn find_by_number(&self, tenant_id: i64, invoice_no: &str)
        -> Result<Option<SaleInvoice>>;

    /// Invoices among `ids` that exist for the tenant, without entries
    async fn find_by_ids(&self, tenant_id: i64, ids: &[i64]) -> Result<Vec<SaleInvoice>>;

    async fn list(&self, tenant_id: i64, page: PageRequest) -> Result<(Vec<SaleInvoice>, i64)>;

    async fn mark_delivered(
        &self,
        tenant_id: i64,
        id: i64,
        delivered_at: DateTime<Utc>,
    ) -> Result<()>;

    async fn delete(&self, tenant_id: i64, id: i64) -> Result<()>;

    async fn count_by_customer(&self, tenant_id: i64, customer_id: i64) -> Result<i64>;

    /// Delivered invoices dated on or before `as_date`, with the payments
    /// received up to that date. `customer_ids` restricts the customers.
    async fn list_receivables(
        &self,
        tenant_id: i64,
        as_date: NaiveDate,
        customer_ids: Option<&[i64]>,
    ) -> Result<Vec<Receivable>>;
}

pub struct MySqlSaleInvoiceRepository {
    pool: MySqlPool,
}

impl MySqlSaleInvoiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const INVOICE_COLUMNS: &str = r#"
    id, tenant_id, customer_id, invoice_no, reference_no, invoice_date, due_date, amount,
    payment_amount, invoice_message, delivered_at, created_at, updated_at
"#;

fn push_id_list(query: &mut QueryBuilder<'_, MySql>, ids: &[i64]) {
    query.push(" (");
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

#[async_trait]
impl SaleInvoiceRepository for MySqlSaleInvoiceRepository {
    async fn create(
        &self,
        tenant_id: i64,
        details: &SaleInvoiceDetails,
        delivered_at: Option<DateTime<Utc>>,
    ) -> Result<SaleInvoice> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO sales_invoices (
                tenant_id, customer_id, invoice_no, reference_no, invoice_date, due_date,
                amount, payment_amount, invoice_message, delivered_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(tenant_id)
        .bind(details.customer_id)
        .bind(&details.invoice_no)
        .bind(&details.reference_no)
        .bind(details.invoice_date)
        .bind(details.due_date)
        .bind(details.amount)
        .bind(&details.invoice_message)
        .bind(delivered_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            AppError::from(err).on_duplicate(ServiceError::SaleInvoiceNumberExists)
        })?;

        let id = result.last_insert_id() as i64;

        for entry in &details.entries {
            sqlx::query(
                r#"
                INSERT INTO sales_invoice_entries
                    (invoice_id, `index`, description, quantity, rate, amount)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(id)
            .bind(entry.index)
            .bind(&entry.description)
            .bind(entry.quantity)
            .bind(entry.rate)
            .bind(entry.amount)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Sale invoice {} vanished after insert", id)))
    }

    async fn find_by_id(&self, tenant_id: i64, id: i64) -> Result<Option<SaleInvoice>> {
        let invoice = sqlx::query_as::<_, SaleInvoice>(&format!(
            "SELECT {} FROM sales_invoices WHERE tenant_id = ? AND id = ?",
            INVOICE_COLUMNS
        ))
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut invoice) = invoice else {
            return Ok(None);
        };

        invoice.entries = sqlx::query_as::<_, ItemEntry>(
            r#"
            SELECT `index`, description, quantity, rate, amount
            FROM sales_invoice_entries
            WHERE invoice_id = ?
            ORDER BY `index`
            "#,
        )
        .bind(invoice.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(invoice))
    }

    async fn find_by_number(
        &self,
        tenant_id: i64,
        invoice_no: &str,
    ) -> Result<Option<SaleInvoice>> {
        let invoice = sqlx::query_as::<_, SaleInvoice>(&format!(
            "SELECT {} FROM sales_invoices WHERE tenant_id = ? AND invoice_no = ?",
            INVOICE_COLUMNS
        ))
        .bind(tenant_id)
        .bind(invoice_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    async fn find_by_ids(&self, tenant_id: i64, ids: &[i64]) -> Result<Vec<SaleInvoice>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<MySql> = QueryBuilder::new(format!(
            "SELECT {} FROM sales_invoices WHERE tenant_id = ",
            INVOICE_COLUMNS
        ));
        query.push_bind(tenant_id);
        query.push(" AND id IN");
        push_id_list(&mut query, ids);

        let invoices = query
            .build_query_as::<SaleInvoice>()
            .fetch_all(&self.pool)
            .await?;

        Ok(invoices)
    }

    async fn list(&self, tenant_id: i64, page: PageRequest) -> Result<(Vec<SaleInvoice>, i64)> {
        let invoices = sqlx::query_as::<_, SaleInvoice>(&format!(
            "SELECT {} FROM sales_invoices WHERE tenant_id = ? \
             ORDER BY invoice_date DESC, id DESC LIMIT ? OFFSET ?",
            INVOICE_COLUMNS
        ))
        .bind(tenant_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sales_invoices WHERE tenant_id = ?")
                .bind(tenant_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((invoices, total))
    }

    async fn mark_delivered(
        &self,
        tenant_id: i64,
        id: i64,
        delivered_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE sales_invoices SET delivered_at = ?, updated_at = NOW() \
             WHERE tenant_id = ? AND id = ?",
        )
        .bind(delivered_at)
        .bind(tenant_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, tenant_id: i64, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM sales_invoices WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn count_by_customer(&self, tenant_id: i64, customer_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sales_invoices WHERE tenant_id = ? AND customer_id = ?",
        )
        .bind(tenant_id)
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn list_receivables(
        &self,
        tenant_id: i64,
        as_date: NaiveDate,
        customer_ids: Option<&[i64]>,
    ) -> Result<Vec<Receivable>> {
        let mut query: QueryBuilder<MySql> = QueryBuilder::new(
            r#"
            SELECT i.id AS invoice_id, i.customer_id, i.invoice_date, i.due_date, i.amount,
                COALESCE((
                    SELECT SUM(e.payment_amount)
                    FROM payment_receive_entries e
                    JOIN payment_receives p ON p.id = e.payment_receive_id
                    WHERE e.invoice_id = i.id AND p.payment_date <= "#,
        );
        query.push_bind(as_date);
        query.push("), 0) AS paid_amount FROM sales_invoices i WHERE i.tenant_id = ");
        query.push_bind(tenant_id);
        query.push(" AND i.delivered_at IS NOT NULL AND i.invoice_date <= ");
        query.push_bind(as_date);

        if let Some(ids) = customer_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query.push(" AND i.customer_id IN");
            push_id_list(&mut query, ids);
        }
        query.push(" ORDER BY i.customer_id, i.due_date, i.id");

        let receivables = query
            .build_query_as::<Receivable>()
            .fetch_all(&self.pool)
            .await?;

        Ok(receivables)
    }
}
