use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::entries::{build_entries, entries_total};
use crate::core::{AppError, ItemEntry, ItemEntryRequest, PageRequest, PaginationQuery, Result, SortOrder};

/// Longest note accepted on a bill
pub const MAX_NOTE_LENGTH: usize = 1000;

/// Bill status derived from `opened_at` and the due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Draft,
    Open,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Bill {
    pub id: i64,
    #[serde(skip_serializing)]
    pub tenant_id: i64,
    pub vendor_id: i64,
    pub bill_number: String,
    pub reference_no: Option<String>,
    pub bill_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub note: Option<String>,
    pub opened_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub entries: Vec<ItemEntry>,
}

impl Bill {
    pub fn is_open(&self) -> bool {
        self.opened_at.is_some()
    }

    pub fn status(&self, today: NaiveDate) -> BillStatus {
        match self.opened_at {
            None => BillStatus::Draft,
            Some(_) if self.due_date < today => BillStatus::Overdue,
            Some(_) => BillStatus::Open,
        }
    }
}

/// Bill as returned by the API, with its derived status
#[derive(Debug, Clone, Serialize)]
pub struct BillView {
    #[serde(flatten)]
    pub bill: Bill,
    pub status: BillStatus,
}

impl BillView {
    pub fn new(bill: Bill, today: NaiveDate) -> Self {
        let status = bill.status(today);
        Self { bill, status }
    }
}

/// Body of bill create and edit requests
#[derive(Debug, Clone, Deserialize)]
pub struct BillRequest {
    pub vendor_id: i64,
    pub bill_number: String,
    pub reference_no: Option<String>,
    pub bill_date: NaiveDate,
    pub due_date: NaiveDate,
    pub note: Option<String>,
    /// Open the bill right away instead of saving it as a draft
    #[serde(default)]
    pub open: bool,
    pub entries: Vec<ItemEntryRequest>,
}

/// Validated bill fields ready for storage
#[derive(Debug, Clone, PartialEq)]
pub struct BillDetails {
    pub vendor_id: i64,
    pub bill_number: String,
    pub reference_no: Option<String>,
    pub bill_date: NaiveDate,
    pub due_date: NaiveDate,
    pub note: Option<String>,
    pub open: bool,
    pub amount: Decimal,
    pub entries: Vec<ItemEntry>,
}

impl BillRequest {
    pub fn validate(self) -> Result<BillDetails> {
        let bill_number = self.bill_number.trim().to_string();
        if bill_number.is_empty() {
            return Err(AppError::validation("bill_number is required"));
        }
        if bill_number.len() > 64 {
            return Err(AppError::validation(
                "bill_number cannot exceed 64 characters",
            ));
        }
        if self.due_date < self.bill_date {
            return Err(AppError::validation(
                "due_date must be on or after bill_date",
            ));
        }

        let note = self
            .note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());
        if let Some(note) = &note {
            if note.chars().count() > MAX_NOTE_LENGTH {
                return Err(AppError::validation(format!(
                    "note cannot exceed {} characters",
                    MAX_NOTE_LENGTH
                )));
            }
        }

        let entries = build_entries(&self.entries)?;
        let amount = entries_total(&entries)?;

        Ok(BillDetails {
            vendor_id: self.vendor_id,
            bill_number,
            reference_no: self
                .reference_no
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            bill_date: self.bill_date,
            due_date: self.due_date,
            note,
            open: self.open,
            amount,
            entries,
        })
    }
}

/// Columns the bill list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillSortColumn {
    BillDate,
    DueDate,
    BillNumber,
    Amount,
    #[default]
    CreatedAt,
}

impl BillSortColumn {
    pub fn as_sql(&self) -> &'static str {
        match self {
            BillSortColumn::BillDate => "bill_date",
            BillSortColumn::DueDate => "due_date",
            BillSortColumn::BillNumber => "bill_number",
            BillSortColumn::Amount => "amount",
            BillSortColumn::CreatedAt => "created_at",
        }
    }
}

/// Query string of `GET /bills`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BillListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub column_sort_by: Option<BillSortColumn>,
    pub sort_order: Option<SortOrder>,
}

/// Resolved paging and ordering of a bill listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillListFilter {
    pub page: PageRequest,
    pub sort_column: BillSortColumn,
    pub sort_order: SortOrder,
}

impl BillListQuery {
    /// Without an explicit ordering the newest bills come first
    pub fn resolve(&self) -> Result<BillListFilter> {
        let page = PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
        .resolve()?;

        let sort_order = match (self.column_sort_by, self.sort_order) {
            (_, Some(order)) => order,
            (None, None) => SortOrder::Desc,
            (Some(_), None) => SortOrder::Asc,
        };

        Ok(BillListFilter {
            page,
            sort_column: self.column_sort_by.unwrap_or_default(),
            sort_order,
        })
    }
}
