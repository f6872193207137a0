mod payment_receive_repository;

pub use payment_receive_repository::{MySqlPaymentReceiveRepository, PaymentReceiveRepository};
