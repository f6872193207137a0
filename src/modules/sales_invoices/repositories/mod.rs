mod sale_invoice_repository;

pub use sale_invoice_repository::{MySqlSaleInvoiceRepository, SaleInvoiceRepository};
