use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::core::{AppError, Pagination, Result, ServiceError};
use crate::modules::bills::models::{Bill, BillDetails, BillListFilter, BillRequest, BillView};
use crate::modules::bills::repositories::BillRepository;
use crate::modules::contacts::models::ContactService;
use crate::modules::contacts::repositories::ContactRepository;

/// Service for payable bills
pub struct BillService {
    bill_repo: Arc<dyn BillRepository>,
    contact_repo: Arc<dyn ContactRepository>,
}

impl BillService {
    pub fn new(
        bill_repo: Arc<dyn BillRepository>,
        contact_repo: Arc<dyn ContactRepository>,
    ) -> Self {
        Self {
            bill_repo,
            contact_repo,
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Vendor existence and bill number uniqueness are checked together so
    /// both failures reach the client in one response.
    async fn validate_details(
        &self,
        tenant_id: i64,
        details: &BillDetails,
        bill_id: Option<i64>,
    ) -> Result<()> {
        let mut errors = Vec::new();

        if self
            .contact_repo
            .find_by_id(tenant_id, ContactService::Vendor, details.vendor_id)
            .await?
            .is_none()
        {
            errors.push(ServiceError::VendorNotFound);
        }

        if let Some(other) = self
            .bill_repo
            .find_by_number(tenant_id, &details.bill_number)
            .await?
        {
            if Some(other.id) != bill_id {
                errors.push(ServiceError::BillNumberExists);
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(AppError::Service(errors[0])),
            _ => Err(AppError::Services(errors)),
        }
    }

    pub async fn create_bill(&self, tenant_id: i64, request: BillRequest) -> Result<BillView> {
        let details = request.validate()?;
        self.validate_details(tenant_id, &details, None).await?;

        let opened_at = details.open.then(Utc::now);
        let bill = self.bill_repo.create(tenant_id, &details, opened_at).await?;

        info!(
            tenant_id,
            bill_id = bill.id,
            bill_number = %bill.bill_number,
            amount = %bill.amount,
            "Bill created"
        );
        Ok(BillView::new(bill, Self::today()))
    }

    /// Edit a bill. An open bill stays open; a draft is opened when the
    /// request asks for it.
    pub async fn edit_bill(
        &self,
        tenant_id: i64,
        bill_id: i64,
        request: BillRequest,
    ) -> Result<BillView> {
        let existing = self.find_bill(tenant_id, bill_id).await?;
        let details = request.validate()?;
        self.validate_details(tenant_id, &details, Some(bill_id)).await?;

        let opened_at = existing
            .opened_at
            .or_else(|| details.open.then(Utc::now));
        self.bill_repo
            .update(tenant_id, bill_id, &details, opened_at)
            .await?;

        info!(tenant_id, bill_id, "Bill edited");
        self.get_bill(tenant_id, bill_id).await
    }

    pub async fn open_bill(&self, tenant_id: i64, bill_id: i64) -> Result<BillView> {
        let bill = self.find_bill(tenant_id, bill_id).await?;
        if bill.is_open() {
            return Err(ServiceError::BillAlreadyOpen.into());
        }

        self.bill_repo
            .mark_open(tenant_id, bill_id, Utc::now())
            .await?;

        info!(tenant_id, bill_id, "Bill opened");
        self.get_bill(tenant_id, bill_id).await
    }

    pub async fn get_bill(&self, tenant_id: i64, bill_id: i64) -> Result<BillView> {
        let bill = self.find_bill(tenant_id, bill_id).await?;
        Ok(BillView::new(bill, Self::today()))
    }

    pub async fn list_bills(
        &self,
        tenant_id: i64,
        filter: BillListFilter,
    ) -> Result<(Vec<BillView>, Pagination)> {
        debug!(
            tenant_id,
            sort_column = filter.sort_column.as_sql(),
            sort_order = filter.sort_order.as_sql(),
            "Listing bills"
        );

        let (bills, total) = self.bill_repo.list(tenant_id, &filter).await?;
        let today = Self::today();
        let views = bills
            .into_iter()
            .map(|bill| BillView::new(bill, today))
            .collect();

        Ok((views, filter.page.meta(total)))
    }

    pub async fn delete_bill(&self, tenant_id: i64, bill_id: i64) -> Result<()> {
        self.find_bill(tenant_id, bill_id).await?;
        self.bill_repo.delete(tenant_id, bill_id).await?;

        info!(tenant_id, bill_id, "Bill deleted");
        Ok(())
    }

    async fn find_bill(&self, tenant_id: i64, bill_id: i64) -> Result<Bill> {
        self.bill_repo
            .find_by_id(tenant_id, bill_id)
            .await?
            .ok_or(AppError::Service(ServiceError::BillNotFound))
    }
}
