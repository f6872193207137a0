mod sale_invoice_controller;

pub use sale_invoice_controller::configure;
