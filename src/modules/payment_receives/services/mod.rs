mod payment_receive_service;

pub use payment_receive_service::{check_invoice_payments, PaymentReceiveService};
