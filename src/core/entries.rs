// Item entries shared by bills and sale invoices.
//
// An entry is a single line of a document; its amount is quantity × rate
// rounded to two decimal places. Document totals are the sum of entry amounts.
// Every stored figure must fit a DECIMAL(19, 4) column.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// Largest value a DECIMAL(19, 4) column holds
pub fn max_amount() -> Decimal {
    Decimal::from_i128_with_scale(9_999_999_999_999_999_999, 4)
}

/// Reject figures outside the storable money range
pub fn ensure_storable(label: &str, value: Decimal) -> Result<()> {
    if value.abs() > max_amount() {
        return Err(AppError::validation(format!(
            "{} exceeds the maximum of {}",
            label,
            max_amount()
        )));
    }
    Ok(())
}

/// Entry line as submitted by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEntryRequest {
    pub description: String,
    pub quantity: Decimal,
    pub rate: Decimal,
}

/// Persisted entry line of a bill or sale invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ItemEntry {
    /// Position of the line within its document, starting at 1
    pub index: i32,
    pub description: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
}

impl ItemEntry {
    /// Create a validated entry at the given position
    pub fn new(index: i32, request: &ItemEntryRequest) -> Result<Self> {
        Self::validate_description(&request.description)?;

        if request.quantity <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Entry {} quantity must be positive, got: {}",
                index, request.quantity
            )));
        }
        if request.rate < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Entry {} rate must be non-negative, got: {}",
                index, request.rate
            )));
        }

        ensure_storable(&format!("Entry {} quantity", index), request.quantity)?;
        ensure_storable(&format!("Entry {} rate", index), request.rate)?;

        let amount = request
            .quantity
            .checked_mul(request.rate)
            .map(|amount| amount.round_dp(2))
            .ok_or_else(|| AppError::validation(format!("Entry {} amount is too large", index)))?;
        ensure_storable(&format!("Entry {} amount", index), amount)?;

        Ok(Self {
            index,
            description: request.description.trim().to_string(),
            quantity: request.quantity,
            rate: request.rate,
            amount,
        })
    }

    fn validate_description(description: &str) -> Result<()> {
        if description.trim().is_empty() {
            return Err(AppError::validation("Entry description cannot be empty"));
        }
        if description.len() > 255 {
            return Err(AppError::validation(
                "Entry description cannot exceed 255 characters",
            ));
        }
        Ok(())
    }
}

/// Validate a batch of entry requests and number them from 1
pub fn build_entries(requests: &[ItemEntryRequest]) -> Result<Vec<ItemEntry>> {
    if requests.is_empty() {
        return Err(AppError::validation("At least one entry is required"));
    }

    requests
        .iter()
        .enumerate()
        .map(|(idx, request)| ItemEntry::new(idx as i32 + 1, request))
        .collect()
}

/// Sum of entry amounts
pub fn entries_total(entries: &[ItemEntry]) -> Result<Decimal> {
    let total = entries
        .iter()
        .try_fold(Decimal::ZERO, |total, entry| total.checked_add(entry.amount))
        .ok_or_else(|| AppError::validation("Entries total is too large"))?;
    ensure_storable("Entries total", total)?;
    Ok(total)
}
