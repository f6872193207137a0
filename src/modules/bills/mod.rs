// Bills module: vendor bills with line entries, drafted then opened

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Bill, BillListQuery, BillRequest, BillStatus, BillView};
pub use repositories::{BillRepository, MySqlBillRepository};
pub use services::BillService;
