mod receivable;
mod sale_invoice;

pub use receivable::Receivable;
pub use sale_invoice::{SaleInvoice, SaleInvoiceDetails, SaleInvoiceRequest};
