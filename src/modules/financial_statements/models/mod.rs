mod aging_summary;

pub use aging_summary::{
    AgingAmount, AgingPeriod, AgingSummary, AgingSummaryData, AgingSummaryFilter,
    AgingSummaryQuery, AgingTotal, CustomerAging, DEFAULT_AGING_DAYS_BEFORE,
    DEFAULT_AGING_PERIODS, MAX_AGING_DAYS_BEFORE, MAX_AGING_PERIODS,
};
