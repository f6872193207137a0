use std::sync::Arc;

use tracing::info;

use crate::core::{PageRequest, Pagination, Result, ServiceError};
use crate::modules::bills::repositories::BillRepository;
use crate::modules::contacts::models::{Contact, ContactRequest, ContactService};
use crate::modules::contacts::repositories::ContactRepository;
use crate::modules::sales_invoices::repositories::SaleInvoiceRepository;

use super::display_name::{default_display_name, DisplayNameParts};

/// Service for customer and vendor management
pub struct ContactsService {
    contact_repo: Arc<dyn ContactRepository>,
    bill_repo: Arc<dyn BillRepository>,
    invoice_repo: Arc<dyn SaleInvoiceRepository>,
}

impl ContactsService {
    pub fn new(
        contact_repo: Arc<dyn ContactRepository>,
        bill_repo: Arc<dyn BillRepository>,
        invoice_repo: Arc<dyn SaleInvoiceRepository>,
    ) -> Self {
        Self {
            contact_repo,
            bill_repo,
            invoice_repo,
        }
    }

    pub async fn create_contact(
        &self,
        tenant_id: i64,
        service: ContactService,
        request: ContactRequest,
    ) -> Result<Contact> {
        let fallback = fallback_display_name(&request);
        let details = request.validate(fallback)?;

        let contact = self
            .contact_repo
            .create(tenant_id, service, &details)
            .await?;

        info!(tenant_id, contact_id = contact.id, %service, "Contact created");
        Ok(contact)
    }

    pub async fn edit_contact(
        &self,
        tenant_id: i64,
        service: ContactService,
        contact_id: i64,
        request: ContactRequest,
    ) -> Result<Contact> {
        let existing = self.get_contact(tenant_id, service, contact_id).await?;

        let fallback = fallback_display_name(&request).or(Some(existing.display_name));
        let details = request.validate(fallback)?;

        self.contact_repo
            .update(tenant_id, contact_id, &details)
            .await?;

        self.get_contact(tenant_id, service, contact_id).await
    }

    pub async fn get_contact(
        &self,
        tenant_id: i64,
        service: ContactService,
        contact_id: i64,
    ) -> Result<Contact> {
        self.contact_repo
            .find_by_id(tenant_id, service, contact_id)
            .await?
            .ok_or_else(|| not_found(service).into())
    }

    pub async fn list_contacts(
        &self,
        tenant_id: i64,
        service: ContactService,
        page: PageRequest,
    ) -> Result<(Vec<Contact>, Pagination)> {
        let (contacts, total) = self.contact_repo.list(tenant_id, service, page).await?;
        Ok((contacts, page.meta(total)))
    }

    /// Delete a contact that no document refers to
    pub async fn delete_contact(
        &self,
        tenant_id: i64,
        service: ContactService,
        contact_id: i64,
    ) -> Result<()> {
        self.get_contact(tenant_id, service, contact_id).await?;

        match service {
            ContactService::Customer => {
                let invoices = self
                    .invoice_repo
                    .count_by_customer(tenant_id, contact_id)
                    .await?;
                if invoices > 0 {
                    return Err(ServiceError::CustomerHasSalesInvoices.into());
                }
            }
            ContactService::Vendor => {
                let bills = self.bill_repo.count_by_vendor(tenant_id, contact_id).await?;
                if bills > 0 {
                    return Err(ServiceError::VendorHasBills.into());
                }
            }
        }

        self.contact_repo.delete(tenant_id, contact_id).await?;

        info!(tenant_id, contact_id, %service, "Contact deleted");
        Ok(())
    }
}

fn not_found(service: ContactService) -> ServiceError {
    match service {
        ContactService::Customer => ServiceError::CustomerNotFound,
        ContactService::Vendor => ServiceError::VendorNotFound,
    }
}

fn fallback_display_name(request: &ContactRequest) -> Option<String> {
    default_display_name(DisplayNameParts {
        salutation: request.salutation.as_deref(),
        first_name: request.first_name.as_deref(),
        last_name: request.last_name.as_deref(),
        company_name: request.company_name.as_deref(),
    })
}
