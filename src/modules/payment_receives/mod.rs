// Payment receives module: customer payments applied against delivered invoices

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{PaymentReceive, PaymentReceiveEntry, PaymentReceiveRequest};
pub use repositories::{MySqlPaymentReceiveRepository, PaymentReceiveRepository};
pub use services::PaymentReceiveService;
