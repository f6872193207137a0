use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{is_valid_email, AppError, Currency, Result};

/// Which side of the business a contact is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactService {
    Customer,
    Vendor,
}

impl fmt::Display for ContactService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactService::Customer => write!(f, "customer"),
            ContactService::Vendor => write!(f, "vendor"),
        }
    }
}

impl TryFrom<String> for ContactService {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        match s.as_str() {
            "customer" => Ok(ContactService::Customer),
            "vendor" => Ok(ContactService::Vendor),
            _ => Err(format!("Invalid contact service: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: i64,
    #[serde(skip_serializing)]
    pub tenant_id: i64,
    #[sqlx(try_from = "String")]
    pub contact_service: ContactService,
    pub salutation: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub display_name: String,
    pub email: Option<String>,
    pub work_phone: Option<String>,
    pub currency_code: Option<String>,
    pub note: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of customer and vendor create/edit requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    pub salutation: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    /// Derived from the name fields when omitted
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub work_phone: Option<String>,
    pub currency_code: Option<String>,
    pub note: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Validated contact fields ready for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub salutation: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub display_name: String,
    pub email: Option<String>,
    pub work_phone: Option<String>,
    pub currency_code: Option<String>,
    pub note: Option<String>,
    pub active: bool,
}

impl ContactRequest {
    /// Validate the request. `fallback_display_name` is used when the request
    /// carries no display name of its own.
    pub fn validate(self, fallback_display_name: Option<String>) -> Result<ContactDetails> {
        let email = non_empty(self.email).map(|e| e.to_lowercase());
        if let Some(email) = &email {
            if !is_valid_email(email) {
                return Err(AppError::validation(format!(
                    "email '{}' is not a valid email address",
                    email
                )));
            }
        }

        let currency_code = match non_empty(self.currency_code) {
            Some(code) => Some(
                code.parse::<Currency>()
                    .map_err(AppError::validation)?
                    .to_string(),
            ),
            None => None,
        };

        let display_name = non_empty(self.display_name)
            .or_else(|| non_empty(fallback_display_name))
            .ok_or_else(|| AppError::validation("display_name is required"))?;
        if display_name.len() > 255 {
            return Err(AppError::validation(
                "display_name cannot exceed 255 characters",
            ));
        }

        Ok(ContactDetails {
            salutation: non_empty(self.salutation),
            first_name: non_empty(self.first_name),
            last_name: non_empty(self.last_name),
            company_name: non_empty(self.company_name),
            display_name,
            email,
            work_phone: non_empty(self.work_phone),
            currency_code,
            note: non_empty(self.note),
            active: self.active,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
