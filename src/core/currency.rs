use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies an organization can use as its base currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    USD,
    /// Euro
    EUR,
    /// Pound Sterling
    GBP,
    /// Saudi Riyal
    SAR,
    /// Libyan Dinar (3 decimal places)
    LYD,
    /// Indonesian Rupiah (no decimal places)
    IDR,
    /// Malaysian Ringgit
    MYR,
}

impl Currency {
    /// Returns the decimal scale for this currency
    pub fn scale(&self) -> u32 {
        match self {
            Currency::IDR => 0,
            Currency::LYD => 3,
            _ => 2,
        }
    }

    /// Money symbol prefixed to formatted amounts
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::SAR => "﷼",
            Currency::LYD => "LD",
            Currency::IDR => "Rp",
            Currency::MYR => "RM",
        }
    }

    /// Rounds a decimal value to the appropriate scale for this currency
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp(self.scale())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::SAR => "SAR",
            Currency::LYD => "LYD",
            Currency::IDR => "IDR",
            Currency::MYR => "MYR",
        };
        f.write_str(code)
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "SAR" => Ok(Currency::SAR),
            "LYD" => Ok(Currency::LYD),
            "IDR" => Ok(Currency::IDR),
            "MYR" => Ok(Currency::MYR),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}

impl TryFrom<&str> for Currency {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
