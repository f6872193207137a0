// Contacts module: customers and vendors share one table, split by service

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Contact, ContactRequest, ContactService};
pub use repositories::{ContactRepository, MySqlContactRepository};
pub use services::{display_name_options, ContactsService, DisplayNameOption, DisplayNameParts};
