//! Ledgerdesk accounting API
//!
//! Multi-tenant REST back end for users, customers and vendors, bills, sale
//! invoices, received payments and financial statements.

pub mod app_state;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

pub use app_state::{AppServices, Repositories};
