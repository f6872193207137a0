mod sale_invoice_service;

pub use sale_invoice_service::SaleInvoiceService;
