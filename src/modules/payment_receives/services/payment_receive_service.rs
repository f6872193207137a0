use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::core::{AppError, PageRequest, Pagination, Result, ServiceError};
use crate::modules::contacts::models::ContactService;
use crate::modules::contacts::repositories::ContactRepository;
use crate::modules::payment_receives::models::{
    PaymentReceive, PaymentReceiveEntry, PaymentReceiveRequest,
};
use crate::modules::payment_receives::repositories::PaymentReceiveRepository;
use crate::modules::sales_invoices::models::SaleInvoice;
use crate::modules::sales_invoices::repositories::SaleInvoiceRepository;

/// Check payment entries against the invoices they are applied to.
///
/// Every invoice must exist, belong to `customer_id` and be delivered, and
/// no entry may pay more than the invoice still owes. Each kind of failure is
/// reported once.
pub fn check_invoice_payments(
    customer_id: i64,
    entries: &[PaymentReceiveEntry],
    invoices: &[SaleInvoice],
) -> Vec<ServiceError> {
    let by_id: HashMap<i64, &SaleInvoice> =
        invoices.iter().map(|invoice| (invoice.id, invoice)).collect();

    let mut missing = false;
    let mut not_delivered = false;
    let mut over_paid = false;

    for entry in entries {
        match by_id.get(&entry.invoice_id) {
            Some(invoice) if invoice.customer_id == customer_id => {
                if !invoice.is_delivered() {
                    not_delivered = true;
                }
                if entry.payment_amount > invoice.due_amount() {
                    over_paid = true;
                }
            }
            _ => missing = true,
        }
    }

    let mut errors = Vec::new();
    if missing {
        errors.push(ServiceError::InvoicesIdsNotFound);
    }
    if not_delivered {
        errors.push(ServiceError::InvoicesNotDelivered);
    }
    if over_paid {
        errors.push(ServiceError::InvalidPaymentAmount);
    }
    errors
}

/// Service for payments received from customers
pub struct PaymentReceiveService {
    payment_repo: Arc<dyn PaymentReceiveRepository>,
    invoice_repo: Arc<dyn SaleInvoiceRepository>,
    contact_repo: Arc<dyn ContactRepository>,
}

impl PaymentReceiveService {
    pub fn new(
        payment_repo: Arc<dyn PaymentReceiveRepository>,
        invoice_repo: Arc<dyn SaleInvoiceRepository>,
        contact_repo: Arc<dyn ContactRepository>,
    ) -> Self {
        Self {
            payment_repo,
            invoice_repo,
            contact_repo,
        }
    }

    pub async fn create_payment_receive(
        &self,
        tenant_id: i64,
        request: PaymentReceiveRequest,
    ) -> Result<PaymentReceive> {
        let details = request.validate()?;

        if self
            .contact_repo
            .find_by_id(tenant_id, ContactService::Customer, details.customer_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::CustomerNotFound.into());
        }

        let mut errors = Vec::new();
        if self
            .payment_repo
            .find_by_number(tenant_id, &details.payment_receive_no)
            .await?
            .is_some()
        {
            errors.push(ServiceError::PaymentReceiveNoExists);
        }

        let invoices = self
            .invoice_repo
            .find_by_ids(tenant_id, &details.invoice_ids())
            .await?;
        errors.extend(check_invoice_payments(
            details.customer_id,
            &details.entries,
            &invoices,
        ));

        if !errors.is_empty() {
            warn!(tenant_id, ?errors, "Payment receive rejected");
            return Err(match errors.len() {
                1 => AppError::Service(errors[0]),
                _ => AppError::Services(errors),
            });
        }

        let payment = self.payment_repo.create(tenant_id, &details).await?;

        info!(
            tenant_id,
            payment_receive_id = payment.id,
            customer_id = payment.customer_id,
            amount = %payment.amount,
            "Payment receive created"
        );
        Ok(payment)
    }

    pub async fn get_payment_receive(
        &self,
        tenant_id: i64,
        payment_receive_id: i64,
    ) -> Result<PaymentReceive> {
        self.payment_repo
            .find_by_id(tenant_id, payment_receive_id)
            .await?
            .ok_or(AppError::Service(ServiceError::PaymentReceiveNotFound))
    }

    pub async fn list_payment_receives(
        &self,
        tenant_id: i64,
        page: PageRequest,
    ) -> Result<(Vec<PaymentReceive>, Pagination)> {
        let (payments, total) = self.payment_repo.list(tenant_id, page).await?;
        Ok((payments, page.meta(total)))
    }

    /// Delete a payment, releasing the amounts it applied to invoices
    pub async fn delete_payment_receive(
        &self,
        tenant_id: i64,
        payment_receive_id: i64,
    ) -> Result<()> {
        self.get_payment_receive(tenant_id, payment_receive_id)
            .await?;
        self.payment_repo
            .delete(tenant_id, payment_receive_id)
            .await?;

        info!(tenant_id, payment_receive_id, "Payment receive deleted");
        Ok(())
    }
}
