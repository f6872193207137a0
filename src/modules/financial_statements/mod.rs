// Financial statements module

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{AgingSummary, AgingSummaryFilter, AgingSummaryQuery};
pub use services::ARAgingSummaryService;
