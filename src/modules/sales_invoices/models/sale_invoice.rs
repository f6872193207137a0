use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::entries::{build_entries, entries_total};
use crate::core::{AppError, ItemEntry, ItemEntryRequest, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SaleInvoice {
    pub id: i64,
    #[serde(skip_serializing)]
    pub tenant_id: i64,
    pub customer_id: i64,
    pub invoice_no: String,
    pub reference_no: Option<String>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    /// Sum of the payment receive entries applied to this invoice
    pub payment_amount: Decimal,
    pub invoice_message: Option<String>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub entries: Vec<ItemEntry>,
}

impl SaleInvoice {
    pub fn is_delivered(&self) -> bool {
        self.delivered_at.is_some()
    }

    /// Amount still owed by the customer
    pub fn due_amount(&self) -> Decimal {
        self.amount - self.payment_amount
    }
}

/// Body of sale invoice create requests
#[derive(Debug, Clone, Deserialize)]
pub struct SaleInvoiceRequest {
    pub customer_id: i64,
    pub invoice_no: String,
    pub reference_no: Option<String>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub invoice_message: Option<String>,
    /// Deliver the invoice right away instead of saving it as a draft
    #[serde(default)]
    pub delivered: bool,
    pub entries: Vec<ItemEntryRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleInvoiceDetails {
    pub customer_id: i64,
    pub invoice_no: String,
    pub reference_no: Option<String>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub invoice_message: Option<String>,
    pub delivered: bool,
    pub amount: Decimal,
    pub entries: Vec<ItemEntry>,
}

impl SaleInvoiceRequest {
    pub fn validate(self) -> Result<SaleInvoiceDetails> {
        let invoice_no = self.invoice_no.trim().to_string();
        if invoice_no.is_empty() {
            return Err(AppError::validation("invoice_no is required"));
        }
        if invoice_no.len() > 64 {
            return Err(AppError::validation("invoice_no cannot exceed 64 characters"));
        }
        if self.due_date < self.invoice_date {
            return Err(AppError::validation(
                "due_date must be on or after invoice_date",
            ));
        }

        let entries = build_entries(&self.entries)?;
        let amount = entries_total(&entries)?;

        Ok(SaleInvoiceDetails {
            customer_id: self.customer_id,
            invoice_no,
            reference_no: self
                .reference_no
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            invoice_message: self.invoice_message.filter(|m| !m.trim().is_empty()),
            delivered: self.delivered,
            amount,
            entries,
        })
    }
}
