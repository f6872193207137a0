use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::entries::ensure_storable;
use crate::core::{AppError, Result};

/// Portion of a payment applied to one invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PaymentReceiveEntry {
    pub invoice_id: i64,
    pub payment_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PaymentReceive {
    pub id: i64,
    #[serde(skip_serializing)]
    pub tenant_id: i64,
    pub customer_id: i64,
    pub payment_date: NaiveDate,
    pub payment_receive_no: String,
    pub reference_no: Option<String>,
    pub description: Option<String>,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub entries: Vec<PaymentReceiveEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentReceiveEntryRequest {
    pub invoice_id: i64,
    pub payment_amount: Decimal,
}

/// Body of payment receive create requests
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentReceiveRequest {
    pub customer_id: i64,
    pub payment_date: NaiveDate,
    pub payment_receive_no: String,
    pub reference_no: Option<String>,
    pub description: Option<String>,
    pub entries: Vec<PaymentReceiveEntryRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceiveDetails {
    pub customer_id: i64,
    pub payment_date: NaiveDate,
    pub payment_receive_no: String,
    pub reference_no: Option<String>,
    pub description: Option<String>,
    pub amount: Decimal,
    pub entries: Vec<PaymentReceiveEntry>,
}

impl PaymentReceiveDetails {
    pub fn invoice_ids(&self) -> Vec<i64> {
        self.entries.iter().map(|entry| entry.invoice_id).collect()
    }
}

impl PaymentReceiveRequest {
    pub fn validate(self) -> Result<PaymentReceiveDetails> {
        let payment_receive_no = self.payment_receive_no.trim().to_string();
        if payment_receive_no.is_empty() {
            return Err(AppError::validation("payment_receive_no is required"));
        }
        if self.entries.is_empty() {
            return Err(AppError::validation("At least one entry is required"));
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            if !seen.insert(entry.invoice_id) {
                return Err(AppError::validation(format!(
                    "Invoice {} appears more than once",
                    entry.invoice_id
                )));
            }
            let payment_amount = entry.payment_amount.round_dp(2);
            if payment_amount <= Decimal::ZERO {
                return Err(AppError::validation(format!(
                    "Payment amount for invoice {} must be positive, got: {}",
                    entry.invoice_id, entry.payment_amount
                )));
            }
            ensure_storable(
                &format!("Payment amount for invoice {}", entry.invoice_id),
                payment_amount,
            )?;
            entries.push(PaymentReceiveEntry {
                invoice_id: entry.invoice_id,
                payment_amount,
            });
        }

        let amount = entries
            .iter()
            .try_fold(Decimal::ZERO, |total, entry| {
                total.checked_add(entry.payment_amount)
            })
            .ok_or_else(|| AppError::validation("Payment total is too large"))?;
        ensure_storable("Payment total", amount)?;

        Ok(PaymentReceiveDetails {
            customer_id: self.customer_id,
            payment_date: self.payment_date,
            payment_receive_no,
            reference_no: self
                .reference_no
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            description: self.description.filter(|d| !d.trim().is_empty()),
            amount,
            entries,
        })
    }
}
