use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// An invoice's open balance as of a report date.
///
/// `paid_amount` only counts payments received on or before that date.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Receivable {
    pub invoice_id: i64,
    pub customer_id: i64,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub paid_amount: Decimal,
}

impl Receivable {
    pub fn due_amount(&self) -> Decimal {
        self.amount - self.paid_amount
    }
}
