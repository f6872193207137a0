//! Aging periods and receivable bucketing for the A/R aging summary.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::core::NumberFormat;
use crate::modules::financial_statements::models::{
    AgingAmount, AgingPeriod, AgingSummaryData, AgingSummaryFilter, AgingTotal, CustomerAging,
};
use crate::modules::sales_invoices::models::Receivable;

/// Where a receivable falls on the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgingBucket {
    /// Not yet past due
    Current,
    /// Index into the aging periods
    Period(usize),
}

/// A customer row of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgingCustomer {
    pub id: i64,
    pub name: String,
}

/// Build `periods` consecutive windows of `days_before` days counted back
/// from `as_date`; the last window has no lower bound.
pub fn aging_periods(as_date: NaiveDate, days_before: u32, periods: u32) -> Vec<AgingPeriod> {
    (0..periods)
        .map(|idx| {
            let is_last = idx + 1 == periods;
            let start_days = idx * days_before;
            let end_days = (idx + 1) * days_before;

            AgingPeriod {
                from_period: as_date - Duration::days(i64::from(start_days)),
                to_period: (!is_last).then(|| as_date - Duration::days(i64::from(end_days))),
                before_days: if idx == 0 { 0 } else { start_days + 1 },
                to_days: (!is_last).then_some(end_days),
            }
        })
        .collect()
}

/// Bucket a due date relative to `as_date`.
///
/// A receivable due on or after `as_date` is current. One overdue by `d`
/// days lands in period `(d - 1) / days_before`, capped at the last period.
pub fn aging_bucket(
    due_date: NaiveDate,
    as_date: NaiveDate,
    days_before: u32,
    periods: u32,
) -> AgingBucket {
    let overdue_days = (as_date - due_date).num_days();
    if overdue_days <= 0 {
        return AgingBucket::Current;
    }

    let idx = (overdue_days - 1) / i64::from(days_before.max(1));
    let last = i64::from(periods.max(1)) - 1;
    AgingBucket::Period(idx.min(last) as usize)
}

#[derive(Debug, Clone)]
struct Buckets {
    current: Decimal,
    aging: Vec<Decimal>,
}

impl Buckets {
    fn new(periods: usize) -> Self {
        Self {
            current: Decimal::ZERO,
            aging: vec![Decimal::ZERO; periods],
        }
    }

    fn add(&mut self, bucket: AgingBucket, amount: Decimal) {
        match bucket {
            AgingBucket::Current => self.current += amount,
            AgingBucket::Period(idx) => self.aging[idx] += amount,
        }
    }

    fn merge(&mut self, other: &Buckets) {
        self.current += other.current;
        for (total, amount) in self.aging.iter_mut().zip(&other.aging) {
            *total += amount;
        }
    }

    fn total(&self) -> Decimal {
        self.current + self.aging.iter().copied().sum::<Decimal>()
    }
}

fn amount(format: &NumberFormat, value: Decimal, symbol: &str) -> AgingAmount {
    AgingAmount {
        amount: value,
        formatted_amount: format.format(value, symbol),
    }
}

fn total_amount(format: &NumberFormat, value: Decimal, symbol: &str) -> AgingAmount {
    AgingAmount {
        amount: value,
        formatted_amount: format.format_total(value, symbol),
    }
}

/// Assemble the report rows.
///
/// Customers keep the given order. Receivables with nothing left to pay are
/// ignored, as are receivables of customers not listed. With
/// `filter.none_zero` customers whose total is zero are left out.
pub fn build_aging_summary(
    filter: &AgingSummaryFilter,
    customers: &[AgingCustomer],
    receivables: &[Receivable],
    symbol: &str,
) -> AgingSummaryData {
    let periods = filter.aging_periods as usize;
    let format = &filter.number_format;

    let mut by_customer: HashMap<i64, Buckets> = HashMap::new();
    for receivable in receivables {
        let due = receivable.due_amount();
        if due <= Decimal::ZERO {
            continue;
        }
        let bucket = aging_bucket(
            receivable.due_date,
            filter.as_date,
            filter.aging_days_before,
            filter.aging_periods,
        );
        by_customer
            .entry(receivable.customer_id)
            .or_insert_with(|| Buckets::new(periods))
            .add(bucket, due);
    }

    let empty = Buckets::new(periods);
    let mut totals = Buckets::new(periods);
    let mut rows = Vec::with_capacity(customers.len());

    for customer in customers {
        let buckets = by_customer.get(&customer.id).unwrap_or(&empty);
        let total = buckets.total();
        if filter.none_zero && total.is_zero() {
            continue;
        }
        totals.merge(buckets);

        rows.push(CustomerAging {
            customer_id: customer.id,
            customer_name: customer.name.clone(),
            current: amount(format, buckets.current, symbol),
            aging: buckets
                .aging
                .iter()
                .map(|value| amount(format, *value, symbol))
                .collect(),
            total: total_amount(format, total, symbol),
        });
    }

    AgingSummaryData {
        customers: rows,
        total: AgingTotal {
            current: total_amount(format, totals.current, symbol),
            aging: totals
                .aging
                .iter()
                .map(|value| total_amount(format, *value, symbol))
                .collect(),
            total: total_amount(format, totals.total(), symbol),
        },
    }
}
