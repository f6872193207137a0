pub mod bills;
pub mod contacts;
pub mod financial_statements;
pub mod health;
pub mod payment_receives;
pub mod sales_invoices;
pub mod settings;
pub mod users;
