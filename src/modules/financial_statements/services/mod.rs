mod aging;
mod ar_aging_summary_service;

pub use aging::{aging_bucket, aging_periods, build_aging_summary, AgingBucket, AgingCustomer};
pub use ar_aging_summary_service::ARAgingSummaryService;
