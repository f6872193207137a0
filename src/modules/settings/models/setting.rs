use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Currency, Result};

pub const ORGANIZATION_GROUP: &str = "organization";
pub const ORGANIZATION_NAME_KEY: &str = "name";
pub const BASE_CURRENCY_KEY: &str = "base_currency";

const MAX_NAME_LENGTH: usize = 64;

/// A tenant option stored under `group`/`key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub group: String,
    pub key: String,
    pub value: String,
}

impl Setting {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("group", &self.group), ("key", &self.key)] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("Setting {} is required", field)));
            }
            if value.len() > MAX_NAME_LENGTH {
                return Err(AppError::validation(format!(
                    "Setting {} cannot exceed {} characters",
                    field, MAX_NAME_LENGTH
                )));
            }
        }

        if self.group == ORGANIZATION_GROUP && self.key == BASE_CURRENCY_KEY {
            self.value
                .parse::<Currency>()
                .map_err(AppError::validation)?;
        }
        Ok(())
    }
}

/// Body of `POST /settings`
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsRequest {
    pub options: Vec<Setting>,
}

/// Organization details printed on financial statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationProfile {
    pub name: String,
    pub base_currency: Currency,
}

impl Default for OrganizationProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_currency: Currency::USD,
        }
    }
}
