use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use governor::{DefaultKeyedRateLimiter, Quota};
use std::future::{ready, Ready};
use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::Arc;

use crate::core::AppError;
use crate::middleware::auth::ApiKeyRecord;

/// Per-client rate limiting middleware using governor.
///
/// Must be registered inside `ApiKeyAuth` so it only sees authenticated
/// requests. Clients are keyed by the id of their API key, falling back to
/// the peer address for public paths. Build it once and clone it into each
/// worker's `App` so all workers share one quota.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<String>>,
    requests_per_minute: u32,
}

impl RateLimiter {
    /// Create a new rate limiter with specified requests per minute
    pub fn new(requests_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(DefaultKeyedRateLimiter::keyed(Quota::per_minute(per_minute)));

        Self {
            limiter,
            requests_per_minute: per_minute.get(),
        }
    }

    /// Drop state of clients whose quota has fully replenished
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<actix_web::body::EitherBody<actix_web::body::BoxBody, B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimiterMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            requests_per_minute: self.requests_per_minute,
        }))
    }
}

pub struct RateLimiterMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<DefaultKeyedRateLimiter<String>>,
    requests_per_minute: u32,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<actix_web::body::EitherBody<actix_web::body::BoxBody, B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let limiter = self.limiter.clone();
        let requests_per_minute = self.requests_per_minute;

        Box::pin(async move {
            if req.path() == "/health" || req.path() == "/ready" {
                return svc.call(req).await.map(|res| res.map_into_right_body());
            }

            let client_key = client_key(&req);

            match limiter.check_key(&client_key) {
                Ok(_) => svc.call(req).await.map(|res| res.map_into_right_body()),
                Err(_) => {
                    tracing::warn!(client = %client_key, "Rate limit exceeded");
                    let error_response = AppError::RateLimitExceeded(format!(
                        "Maximum {} requests per minute",
                        requests_per_minute
                    ));
                    let http_response = error_response.error_response();
                    Ok(req.into_response(http_response).map_into_left_body())
                }
            }
        })
    }
}

fn client_key(req: &ServiceRequest) -> String {
    req.extensions()
        .get::<ApiKeyRecord>()
        .map(|record| format!("key:{}", record.id))
        .or_else(|| req.peer_addr().map(|addr| format!("ip:{}", addr.ip())))
        .unwrap_or_else(|| "anonymous".to_string())
}
