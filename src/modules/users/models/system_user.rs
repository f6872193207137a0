// System users belong to exactly one tenant. Deleting a user only stamps
// `deleted_at`; deleted users are excluded from every lookup.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{is_valid_email, AppError, Result};

static MOBILE_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{6,14}$").expect("valid phone regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SystemUser {
    pub id: i64,
    #[serde(skip_serializing)]
    pub tenant_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub active: bool,
    pub invite_accepted_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SystemUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Body of `POST /users/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditUserRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Validated and normalized user details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

impl EditUserRequest {
    pub fn validate(self) -> Result<UserDetails> {
        let first_name = required(self.first_name, "first_name")?;
        let last_name = required(self.last_name, "last_name")?;
        let email = required(self.email, "email")?.to_lowercase();

        if !is_valid_email(&email) {
            return Err(AppError::validation(format!(
                "email '{}' is not a valid email address",
                email
            )));
        }

        let phone_number = match self.phone_number.map(|p| normalize_phone(&p)) {
            Some(phone) if phone.is_empty() => None,
            Some(phone) if !MOBILE_PHONE_RE.is_match(&phone) => {
                return Err(AppError::validation(format!(
                    "phone_number '{}' is not a valid mobile phone number",
                    phone
                )));
            }
            other => other,
        };

        Ok(UserDetails {
            first_name,
            last_name,
            email,
            phone_number,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(format!("{} is required", field)))
}

/// Strip the separators people commonly type into phone numbers
fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect()
}
