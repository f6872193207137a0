pub mod auth;
pub mod error_handler;
pub mod rate_limit;
pub mod request_id;

pub use auth::{hash_api_key, ApiKeyAuth, ApiKeyRecord, ApiKeyStore, MySqlApiKeyStore, TenantId};
pub use error_handler::{configure_extractors, ErrorLogger};
pub use rate_limit::RateLimiter;
pub use request_id::RequestId;
