//! Shared services and route registration for the HTTP application.

use std::sync::Arc;

use actix_web::web;
use sqlx::MySqlPool;

use crate::middleware::configure_extractors;
use crate::modules::bills::{BillRepository, BillService, MySqlBillRepository};
use crate::modules::contacts::{ContactRepository, ContactsService, MySqlContactRepository};
use crate::modules::financial_statements::ARAgingSummaryService;
use crate::modules::payment_receives::{
    MySqlPaymentReceiveRepository, PaymentReceiveRepository, PaymentReceiveService,
};
use crate::modules::sales_invoices::{
    MySqlSaleInvoiceRepository, SaleInvoiceRepository, SaleInvoiceService,
};
use crate::modules::settings::{MySqlSettingRepository, SettingRepository, SettingsService};
use crate::modules::users::{MySqlUserRepository, UserRepository, UserService};
use crate::modules::{
    bills, contacts, financial_statements, health, payment_receives, sales_invoices, settings,
    users,
};

/// Storage backends the services are built on
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub bills: Arc<dyn BillRepository>,
    pub sale_invoices: Arc<dyn SaleInvoiceRepository>,
    pub payment_receives: Arc<dyn PaymentReceiveRepository>,
    pub settings: Arc<dyn SettingRepository>,
}

impl Repositories {
    pub fn mysql(pool: &MySqlPool) -> Self {
        Self {
            users: Arc::new(MySqlUserRepository::new(pool.clone())),
            contacts: Arc::new(MySqlContactRepository::new(pool.clone())),
            bills: Arc::new(MySqlBillRepository::new(pool.clone())),
            sale_invoices: Arc::new(MySqlSaleInvoiceRepository::new(pool.clone())),
            payment_receives: Arc::new(MySqlPaymentReceiveRepository::new(pool.clone())),
            settings: Arc::new(MySqlSettingRepository::new(pool.clone())),
        }
    }
}

/// Services shared by all workers
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<UserService>,
    pub contacts: Arc<ContactsService>,
    pub bills: Arc<BillService>,
    pub sale_invoices: Arc<SaleInvoiceService>,
    pub payment_receives: Arc<PaymentReceiveService>,
    pub settings: Arc<SettingsService>,
    pub ar_aging_summary: Arc<ARAgingSummaryService>,
}

impl AppServices {
    pub fn new(repos: Repositories) -> Self {
        let settings = Arc::new(SettingsService::new(repos.settings.clone()));

        Self {
            users: Arc::new(UserService::new(repos.users.clone())),
            contacts: Arc::new(ContactsService::new(
                repos.contacts.clone(),
                repos.bills.clone(),
                repos.sale_invoices.clone(),
            )),
            bills: Arc::new(BillService::new(repos.bills.clone(), repos.contacts.clone())),
            sale_invoices: Arc::new(SaleInvoiceService::new(
                repos.sale_invoices.clone(),
                repos.contacts.clone(),
            )),
            payment_receives: Arc::new(PaymentReceiveService::new(
                repos.payment_receives.clone(),
                repos.sale_invoices.clone(),
                repos.contacts.clone(),
            )),
            ar_aging_summary: Arc::new(ARAgingSummaryService::new(
                repos.contacts.clone(),
                repos.sale_invoices.clone(),
                settings.clone(),
            )),
            settings,
        }
    }

    pub fn mysql(pool: &MySqlPool) -> Self {
        Self::new(Repositories::mysql(pool))
    }

    /// Register the services as app data along with every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.users.clone()))
            .app_data(web::Data::new(self.contacts.clone()))
            .app_data(web::Data::new(self.bills.clone()))
            .app_data(web::Data::new(self.sale_invoices.clone()))
            .app_data(web::Data::new(self.payment_receives.clone()))
            .app_data(web::Data::new(self.settings.clone()))
            .app_data(web::Data::new(self.ar_aging_summary.clone()));

        configure_extractors(cfg);

        cfg.configure(health::controllers::configure)
            .configure(users::controllers::configure)
            .configure(contacts::controllers::configure)
            .configure(bills::controllers::configure)
            .configure(sales_invoices::controllers::configure)
            .configure(payment_receives::controllers::configure)
            .configure(settings::controllers::configure)
            .configure(financial_statements::controllers::configure);
    }
}
