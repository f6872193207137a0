use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::core::{AppError, PageRequest, Result};
use crate::modules::contacts::models::{Contact, ContactDetails, ContactService};

/// Tenant-scoped storage of customers and vendors
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(
        &self,
        tenant_id: i64,
        service: ContactService,
        details: &ContactDetails,
    ) -> Result<Contact>;

    async fn update(&self, tenant_id: i64, id: i64, details: &ContactDetails) -> Result<()>;

    async fn find_by_id(
        &self,
        tenant_id: i64,
        service: ContactService,
        id: i64,
    ) -> Result<Option<Contact>>;

    /// Page of contacts ordered by display name, with the total count
    async fn list(
        &self,
        tenant_id: i64,
        service: ContactService,
        page: PageRequest,
    ) -> Result<(Vec<Contact>, i64)>;

    /// All contacts of a service, optionally restricted to the given ids
    async fn list_all(
        &self,
        tenant_id: i64,
        service: ContactService,
        ids: Option<&[i64]>,
    ) -> Result<Vec<Contact>>;

    async fn delete(&self, tenant_id: i64, id: i64) -> Result<()>;
}

pub struct MySqlContactRepository {
    pool: MySqlPool,
}

impl MySqlContactRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const CONTACT_COLUMNS: &str = r#"
    id, tenant_id, contact_service, salutation, first_name, last_name, company_name,
    display_name, email, work_phone, currency_code, note, active, created_at, updated_at
"#;

#[async_trait]
impl ContactRepository for MySqlContactRepository {
    async fn create(
        &self,
        tenant_id: i64,
        service: ContactService,
        details: &ContactDetails,
    ) -> Result<Contact> {
        let result = sqlx::query(
            r#"
            INSERT INTO contacts (
                tenant_id, contact_service, salutation, first_name, last_name, company_name,
                display_name, email, work_phone, currency_code, note, active,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(tenant_id)
        .bind(service.to_string())
        .bind(&details.salutation)
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(&details.company_name)
        .bind(&details.display_name)
        .bind(&details.email)
        .bind(&details.work_phone)
        .bind(&details.currency_code)
        .bind(&details.note)
        .bind(details.active)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(tenant_id, service, id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Contact {} vanished after insert", id)))
    }

    async fn update(&self, tenant_id: i64, id: i64, details: &ContactDetails) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE contacts
            SET salutation = ?, first_name = ?, last_name = ?, company_name = ?,
                display_name = ?, email = ?, work_phone = ?, currency_code = ?, note = ?,
                active = ?, updated_at = NOW()
            WHERE tenant_id = ? AND id = ?
            "#,
        )
        .bind(&details.salutation)
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(&details.company_name)
        .bind(&details.display_name)
        .bind(&details.email)
        .bind(&details.work_phone)
        .bind(&details.currency_code)
        .bind(&details.note)
        .bind(details.active)
        .bind(tenant_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        tenant_id: i64,
        service: ContactService,
        id: i64,
    ) -> Result<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {} FROM contacts WHERE tenant_id = ? AND contact_service = ? AND id = ?",
            CONTACT_COLUMNS
        ))
        .bind(tenant_id)
        .bind(service.to_string())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn list(
        &self,
        tenant_id: i64,
        service: ContactService,
        page: PageRequest,
    ) -> Result<(Vec<Contact>, i64)> {
        let contacts = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {} FROM contacts WHERE tenant_id = ? AND contact_service = ? \
             ORDER BY display_name, id LIMIT ? OFFSET ?",
            CONTACT_COLUMNS
        ))
        .bind(tenant_id)
        .bind(service.to_string())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contacts WHERE tenant_id = ? AND contact_service = ?",
        )
        .bind(tenant_id)
        .bind(service.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok((contacts, total))
    }

    async fn list_all(
        &self,
        tenant_id: i64,
        service: ContactService,
        ids: Option<&[i64]>,
    ) -> Result<Vec<Contact>> {
        let mut query: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {} FROM contacts WHERE tenant_id = ", CONTACT_COLUMNS));
        query.push_bind(tenant_id);
        query.push(" AND contact_service = ");
        query.push_bind(service.to_string());

        if let Some(ids) = ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query.push(" AND id IN (");
            let mut separated = query.separated(", ");
            for id in ids {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");
        }
        query.push(" ORDER BY display_name, id");

        let contacts = query
            .build_query_as::<Contact>()
            .fetch_all(&self.pool)
            .await?;

        Ok(contacts)
    }

    async fn delete(&self, tenant_id: i64, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM contacts WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
