// Sales invoices module: customer invoices, the receivables behind the aging report

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Receivable, SaleInvoice, SaleInvoiceRequest};
pub use repositories::{MySqlSaleInvoiceRepository, SaleInvoiceRepository};
pub use services::SaleInvoiceService;
