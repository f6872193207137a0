pub mod currency;
pub mod entries;
pub mod error;
pub mod number_format;
pub mod pagination;
pub mod validation;

pub use currency::Currency;
pub use entries::{ItemEntry, ItemEntryRequest};
pub use error::{reject, translate_service_error, AppError, ErrorReason, Result, ServiceError};
pub use number_format::NumberFormat;
pub use pagination::{PageRequest, Pagination, PaginationQuery, SortOrder};
pub use validation::is_valid_email;
