use std::sync::Arc;

use tracing::{debug, info};

use crate::core::Result;
use crate::modules::contacts::models::ContactService;
use crate::modules::contacts::repositories::ContactRepository;
use crate::modules::financial_statements::models::{AgingSummary, AgingSummaryFilter};
use crate::modules::sales_invoices::repositories::SaleInvoiceRepository;
use crate::modules::settings::services::SettingsService;

use super::aging::{aging_periods, build_aging_summary, AgingCustomer};

/// Service for the accounts receivable aging summary
pub struct ARAgingSummaryService {
    contact_repo: Arc<dyn ContactRepository>,
    invoice_repo: Arc<dyn SaleInvoiceRepository>,
    settings: Arc<SettingsService>,
}

impl ARAgingSummaryService {
    pub fn new(
        contact_repo: Arc<dyn ContactRepository>,
        invoice_repo: Arc<dyn SaleInvoiceRepository>,
        settings: Arc<SettingsService>,
    ) -> Self {
        Self {
            contact_repo,
            invoice_repo,
            settings,
        }
    }

    /// Generate the report as of `filter.as_date`
    pub async fn ar_aging_summary(
        &self,
        tenant_id: i64,
        filter: AgingSummaryFilter,
    ) -> Result<AgingSummary> {
        info!(
            tenant_id,
            as_date = %filter.as_date,
            aging_days_before = filter.aging_days_before,
            aging_periods = filter.aging_periods,
            "Generating A/R aging summary"
        );

        let organization = self.settings.organization(tenant_id).await?;
        let customer_ids = filter.customers_ids.as_deref();

        let customers: Vec<AgingCustomer> = self
            .contact_repo
            .list_all(tenant_id, ContactService::Customer, customer_ids)
            .await?
            .into_iter()
            .map(|contact| AgingCustomer {
                id: contact.id,
                name: contact.display_name,
            })
            .collect();

        let receivables = self
            .invoice_repo
            .list_receivables(tenant_id, filter.as_date, customer_ids)
            .await?;

        debug!(
            tenant_id,
            customers = customers.len(),
            receivables = receivables.len(),
            "Loaded A/R aging summary inputs"
        );

        let data = build_aging_summary(
            &filter,
            &customers,
            &receivables,
            organization.base_currency.symbol(),
        );
        let columns = aging_periods(
            filter.as_date,
            filter.aging_days_before,
            filter.aging_periods,
        );

        Ok(AgingSummary {
            organization_name: organization.name,
            base_currency: organization.base_currency,
            data,
            columns,
            query: filter,
        })
    }
}
