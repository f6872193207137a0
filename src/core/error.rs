use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Business rule failures raised by services.
///
/// Controllers match on these to build the `{errors: [{type, code}]}` body
/// their endpoint documents. Anything a controller does not match falls back
/// to [`ServiceError::status`] and [`ServiceError::default_reason`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    #[error("user_not_found")]
    UserNotFound,
    #[error("user_already_active")]
    UserAlreadyActive,
    #[error("user_already_inactive")]
    UserAlreadyInactive,
    #[error("email_already_exists")]
    EmailAlreadyExists,
    #[error("phone_number_already_exist")]
    PhoneNumberAlreadyExist,

    #[error("customer_not_found")]
    CustomerNotFound,
    #[error("vendor_not_found")]
    VendorNotFound,
    #[error("customer_has_sales_invoices")]
    CustomerHasSalesInvoices,
    #[error("vendor_has_bills")]
    VendorHasBills,

    #[error("bill_not_found")]
    BillNotFound,
    #[error("bill_number_exists")]
    BillNumberExists,
    #[error("bill_already_open")]
    BillAlreadyOpen,

    #[error("sale_invoice_not_found")]
    SaleInvoiceNotFound,
    #[error("sale_invoice_number_exists")]
    SaleInvoiceNumberExists,
    #[error("sale_invoice_already_delivered")]
    SaleInvoiceAlreadyDelivered,
    #[error("invoice_has_associated_payments")]
    InvoiceHasAssociatedPayments,

    #[error("payment_receive_not_found")]
    PaymentReceiveNotFound,
    #[error("payment_receive_no_exists")]
    PaymentReceiveNoExists,
    #[error("invoices_ids_not_found")]
    InvoicesIdsNotFound,
    #[error("invoices_not_delivered")]
    InvoicesNotDelivered,
    #[error("invalid_payment_amount")]
    InvalidPaymentAmount,
}

impl ServiceError {
    /// Snake-case identifier of the failure (e.g. `user_not_found`)
    pub fn error_type(&self) -> String {
        self.to_string()
    }

    /// Status used when a controller does not map the error itself
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::UserNotFound
            | ServiceError::CustomerNotFound
            | ServiceError::VendorNotFound
            | ServiceError::BillNotFound
            | ServiceError::SaleInvoiceNotFound
            | ServiceError::PaymentReceiveNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Reason used when a controller does not map the error itself
    pub fn default_reason(&self) -> ErrorReason {
        ErrorReason::new(self.error_type().to_uppercase(), 100)
    }
}

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Validation errors for request input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Known business rule failure
    #[error("Service error: {0}")]
    Service(ServiceError),

    /// Several business rule failures detected at once
    #[error("Service errors: {0:?}")]
    Services(Vec<ServiceError>),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration errors at startup
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}

/// One entry of the `errors` array returned for rejected requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReason {
    #[serde(rename = "type")]
    pub kind: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorReason {
    pub fn new(kind: impl Into<String>, code: u16) -> Self {
        Self {
            kind: kind.into(),
            code,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Reason paired with 404, for use in service error translation
    pub fn not_found(kind: impl Into<String>, code: u16) -> (StatusCode, Self) {
        (StatusCode::NOT_FOUND, Self::new(kind, code))
    }

    /// Reason paired with 400, for use in service error translation
    pub fn bad_request(kind: impl Into<String>, code: u16) -> (StatusCode, Self) {
        (StatusCode::BAD_REQUEST, Self::new(kind, code))
    }
}

/// Build an `{errors: [...]}` response with the given status
pub fn reject(status: StatusCode, reasons: Vec<ErrorReason>) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({ "errors": reasons }))
}

/// Translate the known service errors carried by `err` into an `{errors}`
/// response.
///
/// `mapper` returns the status and reason for each service error the
/// endpoint knows about; the response takes the status of the first one.
/// When none are known the original error is handed back so it can propagate
/// to the generic error handling.
pub fn translate_service_error<F>(
    err: AppError,
    mapper: F,
) -> std::result::Result<HttpResponse, AppError>
where
    F: Fn(&ServiceError) -> Option<(StatusCode, ErrorReason)>,
{
    let mapped: Vec<(StatusCode, ErrorReason)> =
        err.service_errors().iter().filter_map(mapper).collect();

    match mapped.first() {
        Some((status, _)) => {
            let status = *status;
            Ok(reject(status, mapped.into_iter().map(|(_, reason)| reason).collect()))
        }
        None => Err(err),
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        let reasons = match self {
            AppError::Service(err) => vec![err.default_reason()],
            AppError::Services(errs) => errs.iter().map(ServiceError::default_reason).collect(),
            AppError::Validation(msg) => {
                vec![ErrorReason::new("VALIDATION_ERROR", 400).with_message(msg.clone())]
            }
            AppError::NotFound(msg) => {
                vec![ErrorReason::new("NOT_FOUND", 404).with_message(msg.clone())]
            }
            AppError::Unauthorized(msg) => {
                vec![ErrorReason::new("UNAUTHORIZED", 401).with_message(msg.clone())]
            }
            AppError::RateLimitExceeded(msg) => {
                vec![ErrorReason::new("RATE_LIMIT_EXCEEDED", 429).with_message(msg.clone())]
            }
            AppError::Json(err) => {
                vec![ErrorReason::new("VALIDATION_ERROR", 400).with_message(err.to_string())]
            }
            // Internal details stay in the logs
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => {
                tracing::error!(error = %self, "Unhandled application error");
                vec![ErrorReason::new("INTERNAL_ERROR", 500)]
            }
        };

        reject(status_code, reasons)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Service(err) => err.status(),
            AppError::Services(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Whether this is a unique-key violation (MySQL error 1062)
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            AppError::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation()
        )
    }

    /// Report a unique-key violation as the business error it stands for.
    ///
    /// Number checks run before inserting, so this only fires when a
    /// concurrent request took the number in between.
    pub fn on_duplicate(self, err: ServiceError) -> Self {
        if self.is_unique_violation() {
            AppError::Service(err)
        } else {
            self
        }
    }

    /// Returns the service errors carried by this error, if any
    pub fn service_errors(&self) -> &[ServiceError] {
        match self {
            AppError::Service(err) => std::slice::from_ref(err),
            AppError::Services(errs) => errs,
            _ => &[],
        }
    }
}
