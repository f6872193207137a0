use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, Error, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::core::AppError;

/// Middleware logging failed requests once, where they leave the app
pub struct ErrorLogger;

impl<S, B> Transform<S, ServiceRequest> for ErrorLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorLoggerMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct ErrorLoggerMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ErrorLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();

        Box::pin(async move {
            let result = service.call(req).await;

            match &result {
                Err(err) => tracing::error!(path = %path, "Request error: {:?}", err),
                Ok(res) if res.status().is_server_error() => {
                    tracing::error!(path = %path, status = %res.status(), "Request failed")
                }
                _ => {}
            }

            result
        })
    }
}

/// Turn malformed JSON bodies into 400 validation errors
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    AppError::validation(format!("Invalid request body: {}", err)).into()
}

/// Turn malformed query strings into 400 validation errors
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    AppError::validation(format!("Invalid query parameters: {}", err)).into()
}

/// Turn malformed path segments (e.g. non-numeric ids) into 400 validation errors
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    AppError::validation(format!("Invalid path parameter: {}", err)).into()
}

/// Register the extractor error handlers on an app or scope
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
