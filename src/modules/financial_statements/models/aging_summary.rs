use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::number_format::{FormatMoney, NegativeFormat};
use crate::core::{AppError, Currency, NumberFormat, Result};

pub const DEFAULT_AGING_DAYS_BEFORE: u32 = 30;
pub const MAX_AGING_DAYS_BEFORE: u32 = 500;
pub const DEFAULT_AGING_PERIODS: u32 = 3;
pub const MAX_AGING_PERIODS: u32 = 12;

/// Query parameters of the A/R aging summary endpoint
///
/// Number format options use the bracketed keys sent by report clients,
/// e.g. `number_format[precision]=0`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgingSummaryQuery {
    /// Report date (format: YYYY-MM-DD), defaults to today
    pub as_date: Option<String>,
    pub aging_days_before: Option<u32>,
    pub aging_periods: Option<u32>,
    /// Comma separated customer ids
    pub customers_ids: Option<String>,
    pub none_zero: Option<bool>,
    #[serde(rename = "number_format[precision]")]
    pub precision: Option<u32>,
    #[serde(rename = "number_format[divide_on_1000]")]
    pub divide_on_1000: Option<bool>,
    #[serde(rename = "number_format[show_zero]")]
    pub show_zero: Option<bool>,
    #[serde(rename = "number_format[format_money]")]
    pub format_money: Option<FormatMoney>,
    #[serde(rename = "number_format[negative_format]")]
    pub negative_format: Option<NegativeFormat>,
}

/// Validated report options, echoed back as `query`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgingSummaryFilter {
    pub as_date: NaiveDate,
    pub aging_days_before: u32,
    pub aging_periods: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customers_ids: Option<Vec<i64>>,
    pub none_zero: bool,
    pub number_format: NumberFormat,
}

impl AgingSummaryQuery {
    pub fn resolve(&self, today: NaiveDate) -> Result<AgingSummaryFilter> {
        let as_date = match self.as_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_date(raw)?,
            _ => today,
        };

        let aging_days_before = self.aging_days_before.unwrap_or(DEFAULT_AGING_DAYS_BEFORE);
        if aging_days_before == 0 || aging_days_before > MAX_AGING_DAYS_BEFORE {
            return Err(AppError::validation(format!(
                "aging_days_before must be between 1 and {}",
                MAX_AGING_DAYS_BEFORE
            )));
        }

        let aging_periods = self.aging_periods.unwrap_or(DEFAULT_AGING_PERIODS);
        if aging_periods == 0 || aging_periods > MAX_AGING_PERIODS {
            return Err(AppError::validation(format!(
                "aging_periods must be between 1 and {}",
                MAX_AGING_PERIODS
            )));
        }

        let customers_ids = match self.customers_ids.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(parse_ids(raw)?),
            _ => None,
        };

        let defaults = NumberFormat::default();
        let number_format = NumberFormat {
            precision: self.precision.unwrap_or(defaults.precision),
            divide_on_1000: self.divide_on_1000.unwrap_or(defaults.divide_on_1000),
            show_zero: self.show_zero.unwrap_or(defaults.show_zero),
            format_money: self.format_money.unwrap_or(defaults.format_money),
            negative_format: self.negative_format.unwrap_or(defaults.negative_format),
        };
        number_format.validate()?;

        Ok(AgingSummaryFilter {
            as_date,
            aging_days_before,
            aging_periods,
            customers_ids,
            none_zero: self.none_zero.unwrap_or(true),
            number_format,
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!(
            "Invalid as_date format: '{}'. Expected YYYY-MM-DD",
            raw
        ))
    })
}

fn parse_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<i64>() {
            Ok(id) if id >= 1 => Ok(id),
            _ => Err(AppError::validation(format!(
                "customers_ids must be positive integers, got: '{}'",
                part
            ))),
        })
        .collect()
}

/// One aging column: invoices overdue by `before_days..=to_days` days, that
/// is due between `to_period` and `from_period`. The last column is
/// open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgingPeriod {
    pub from_period: NaiveDate,
    pub to_period: Option<NaiveDate>,
    pub before_days: u32,
    pub to_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgingAmount {
    pub amount: Decimal,
    pub formatted_amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerAging {
    pub customer_id: i64,
    pub customer_name: String,
    pub current: AgingAmount,
    pub aging: Vec<AgingAmount>,
    pub total: AgingAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgingTotal {
    pub current: AgingAmount,
    pub aging: Vec<AgingAmount>,
    pub total: AgingAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgingSummaryData {
    pub customers: Vec<CustomerAging>,
    pub total: AgingTotal,
}

/// Response body of the A/R aging summary endpoint
#[derive(Debug, Clone, Serialize)]
pub struct AgingSummary {
    pub organization_name: String,
    pub base_currency: Currency,
    pub data: AgingSummaryData,
    pub columns: Vec<AgingPeriod>,
    pub query: AgingSummaryFilter,
}
