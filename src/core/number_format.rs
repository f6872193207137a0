//! Number formatting for financial sheets.
//!
//! Amounts are rendered with a `,` thousands separator and a `.` decimal
//! point. Whether the money symbol is shown depends on [`FormatMoney`] and on
//! whether the amount is a total row.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Largest precision accepted from report queries
pub const MAX_PRECISION: u32 = 6;

/// When the money symbol is attached to formatted amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatMoney {
    /// Only on total rows
    #[default]
    Total,
    /// On every amount
    Always,
    /// Never
    None,
}

/// How negative amounts are displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegativeFormat {
    /// `-$1,000.00`
    #[default]
    Mines,
    /// `($1,000.00)`
    Parentheses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub precision: u32,
    pub divide_on_1000: bool,
    pub show_zero: bool,
    pub format_money: FormatMoney,
    pub negative_format: NegativeFormat,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            precision: 2,
            divide_on_1000: false,
            show_zero: false,
            format_money: FormatMoney::Total,
            negative_format: NegativeFormat::Mines,
        }
    }
}

impl NumberFormat {
    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(AppError::validation(format!(
                "number_format precision must be between 0 and {}",
                MAX_PRECISION
            )));
        }
        Ok(())
    }

    /// Format an amount of a regular (non-total) row
    pub fn format(&self, amount: Decimal, symbol: &str) -> String {
        self.format_amount(amount, symbol, false)
    }

    /// Format an amount of a total row
    pub fn format_total(&self, amount: Decimal, symbol: &str) -> String {
        self.format_amount(amount, symbol, true)
    }

    fn format_amount(&self, amount: Decimal, symbol: &str, is_total: bool) -> String {
        if amount.is_zero() && !self.show_zero {
            return String::new();
        }

        let value = if self.divide_on_1000 {
            amount / Decimal::ONE_THOUSAND
        } else {
            amount
        };
        let rounded =
            value.round_dp_with_strategy(self.precision, RoundingStrategy::MidpointAwayFromZero);

        let symbol = match self.format_money {
            FormatMoney::Always => symbol,
            FormatMoney::Total if is_total => symbol,
            _ => "",
        };
        let digits = group_digits(rounded.abs(), self.precision);

        if rounded.is_sign_negative() && !rounded.is_zero() {
            match self.negative_format {
                NegativeFormat::Mines => format!("-{}{}", symbol, digits),
                NegativeFormat::Parentheses => format!("({}{})", symbol, digits),
            }
        } else {
            format!("{}{}", symbol, digits)
        }
    }
}

/// Render a non-negative decimal with exactly `precision` fraction digits and
/// `,` separating groups of thousands.
fn group_digits(value: Decimal, precision: u32) -> String {
    let fixed = format!("{:.*}", precision as usize, value);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}
