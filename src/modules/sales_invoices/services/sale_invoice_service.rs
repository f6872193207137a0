use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::core::{AppError, PageRequest, Pagination, Result, ServiceError};
use crate::modules::contacts::models::ContactService;
use crate::modules::contacts::repositories::ContactRepository;
use crate::modules::sales_invoices::models::{SaleInvoice, SaleInvoiceRequest};
use crate::modules::sales_invoices::repositories::SaleInvoiceRepository;

/// Service for customer sale invoices
pub struct SaleInvoiceService {
    invoice_repo: Arc<dyn SaleInvoiceRepository>,
    contact_repo: Arc<dyn ContactRepository>,
}

impl SaleInvoiceService {
    pub fn new(
        invoice_repo: Arc<dyn SaleInvoiceRepository>,
        contact_repo: Arc<dyn ContactRepository>,
    ) -> Self {
        Self {
            invoice_repo,
            contact_repo,
        }
    }

    pub async fn create_invoice(
        &self,
        tenant_id: i64,
        request: SaleInvoiceRequest,
    ) -> Result<SaleInvoice> {
        let details = request.validate()?;
        let mut errors = Vec::new();

        if self
            .contact_repo
            .find_by_id(tenant_id, ContactService::Customer, details.customer_id)
            .await?
            .is_none()
        {
            errors.push(ServiceError::CustomerNotFound);
        }
        if self
            .invoice_repo
            .find_by_number(tenant_id, &details.invoice_no)
            .await?
            .is_some()
        {
            errors.push(ServiceError::SaleInvoiceNumberExists);
        }
        match errors.len() {
            0 => {}
            1 => return Err(AppError::Service(errors[0])),
            _ => return Err(AppError::Services(errors)),
        }

        let delivered_at = details.delivered.then(Utc::now);
        let invoice = self
            .invoice_repo
            .create(tenant_id, &details, delivered_at)
            .await?;

        info!(
            tenant_id,
            invoice_id = invoice.id,
            invoice_no = %invoice.invoice_no,
            amount = %invoice.amount,
            "Sale invoice created"
        );
        Ok(invoice)
    }

    pub async fn deliver_invoice(&self, tenant_id: i64, invoice_id: i64) -> Result<SaleInvoice> {
        let invoice = self.get_invoice(tenant_id, invoice_id).await?;
        if invoice.is_delivered() {
            return Err(ServiceError::SaleInvoiceAlreadyDelivered.into());
        }

        self.invoice_repo
            .mark_delivered(tenant_id, invoice_id, Utc::now())
            .await?;

        info!(tenant_id, invoice_id, "Sale invoice delivered");
        self.get_invoice(tenant_id, invoice_id).await
    }

    pub async fn get_invoice(&self, tenant_id: i64, invoice_id: i64) -> Result<SaleInvoice> {
        self.invoice_repo
            .find_by_id(tenant_id, invoice_id)
            .await?
            .ok_or(AppError::Service(ServiceError::SaleInvoiceNotFound))
    }

    pub async fn list_invoices(
        &self,
        tenant_id: i64,
        page: PageRequest,
    ) -> Result<(Vec<SaleInvoice>, Pagination)> {
        let (invoices, total) = self.invoice_repo.list(tenant_id, page).await?;
        Ok((invoices, page.meta(total)))
    }

    /// Delete an invoice no payment has been applied to
    pub async fn delete_invoice(&self, tenant_id: i64, invoice_id: i64) -> Result<()> {
        let invoice = self.get_invoice(tenant_id, invoice_id).await?;
        if invoice.payment_amount > Decimal::ZERO {
            return Err(ServiceError::InvoiceHasAssociatedPayments.into());
        }

        self.invoice_repo.delete(tenant_id, invoice_id).await?;

        info!(tenant_id, invoice_id, "Sale invoice deleted");
        Ok(())
    }
}
