use crate::core::AppError;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use sha2::{Digest, Sha256};
use sqlx::MySqlPool;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

/// Paths served without an API key
const PUBLIC_PATHS: [&str; 3] = ["/", "/health", "/ready"];

/// Tenant owning the current request, resolved from its API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TenantId(pub i64);

impl FromRequest for TenantId {
    type Error = AppError;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<TenantId>()
                .copied()
                .ok_or_else(|| AppError::unauthorized("Request is not bound to a tenant")),
        )
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKeyRecord {
    pub id: i64,
    pub tenant_id: i64,
    pub is_active: bool,
}

/// Lookup of API keys by their SHA-256 hash
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    async fn find_by_hash(&self, key_hash: &str) -> crate::core::Result<Option<ApiKeyRecord>>;

    /// Record that the key was just used
    async fn touch(&self, id: i64) -> crate::core::Result<()>;
}

pub struct MySqlApiKeyStore {
    pool: MySqlPool,
}

impl MySqlApiKeyStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyStore for MySqlApiKeyStore {
    async fn find_by_hash(&self, key_hash: &str) -> crate::core::Result<Option<ApiKeyRecord>> {
        let record = sqlx::query_as::<_, ApiKeyRecord>(
            r#"
            SELECT id, tenant_id, is_active
            FROM api_keys
            WHERE key_hash = ?
            LIMIT 1
            "#,
        )
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn touch(&self, id: i64) -> crate::core::Result<()> {
        sqlx::query("UPDATE api_keys SET last_used_at = NOW() WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// API Key authentication middleware
pub struct ApiKeyAuth {
    store: Arc<dyn ApiKeyStore>,
}

impl ApiKeyAuth {
    pub fn new(store: Arc<dyn ApiKeyStore>) -> Self {
        Self { store }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthMiddleware {
            service: Rc::new(service),
            store: self.store.clone(),
        }))
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: Rc<S>,
    store: Arc<dyn ApiKeyStore>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let store = self.store.clone();

        Box::pin(async move {
            if PUBLIC_PATHS.contains(&req.path()) {
                return svc.call(req).await;
            }

            let api_key = req
                .headers()
                .get("X-API-Key")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| Error::from(AppError::unauthorized("Missing X-API-Key header")))?;

            let record = validate_api_key(store.as_ref(), api_key)
                .await
                .map_err(Error::from)?;

            if let Err(e) = store.touch(record.id).await {
                tracing::warn!(api_key_id = record.id, "Failed to record API key usage: {}", e);
            }

            req.extensions_mut().insert(TenantId(record.tenant_id));
            req.extensions_mut().insert(record);

            svc.call(req).await
        })
    }
}

async fn validate_api_key(
    store: &dyn ApiKeyStore,
    api_key: &str,
) -> crate::core::Result<ApiKeyRecord> {
    let record = store
        .find_by_hash(&hash_api_key(api_key))
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid API key"))?;

    if !record.is_active {
        return Err(AppError::unauthorized("API key is inactive"));
    }

    Ok(record)
}

/// Hex-encoded SHA-256 digest under which API keys are stored
pub fn hash_api_key(api_key: &str) -> String {
    hex::encode(Sha256::digest(api_key.as_bytes()))
}
