use std::sync::Arc;

use actix_web::{http::StatusCode, web, HttpResponse};
use serde_json::json;

use crate::core::{translate_service_error, AppError, ErrorReason, PaginationQuery, ServiceError};
use crate::middleware::TenantId;
use crate::modules::payment_receives::models::PaymentReceiveRequest;
use crate::modules::payment_receives::services::PaymentReceiveService;

type PaymentReceiveServiceData = web::Data<Arc<PaymentReceiveService>>;

fn payment_receive_error_reason(err: &ServiceError) -> Option<(StatusCode, ErrorReason)> {
    match err {
        ServiceError::PaymentReceiveNotFound => {
            Some(ErrorReason::not_found("PAYMENT_RECEIVE_NOT_FOUND", 100))
        }
        ServiceError::CustomerNotFound => Some(ErrorReason::bad_request("CUSTOMER_NOT_FOUND", 200)),
        ServiceError::PaymentReceiveNoExists => {
            Some(ErrorReason::bad_request("PAYMENT_RECEIVE_NO_EXISTS", 300))
        }
        ServiceError::InvoicesIdsNotFound => {
            Some(ErrorReason::bad_request("INVOICES_IDS_NOT_FOUND", 400))
        }
        ServiceError::InvoicesNotDelivered => {
            Some(ErrorReason::bad_request("INVOICES_NOT_DELIVERED_YET", 500))
        }
        ServiceError::InvalidPaymentAmount => {
            Some(ErrorReason::bad_request("INVALID_PAYMENT_AMOUNT", 600))
        }
        _ => None,
    }
}

/// Record a payment received from a customer
/// POST /sales/payment_receives
pub async fn create_payment_receive(
    service: PaymentReceiveServiceData,
    tenant_id: TenantId,
    request: web::Json<PaymentReceiveRequest>,
) -> Result<HttpResponse, AppError> {
    match service
        .create_payment_receive(tenant_id.0, request.into_inner())
        .await
    {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({
            "id": payment.id,
            "payment_receive": payment,
        }))),
        Err(err) => translate_service_error(err, payment_receive_error_reason),
    }
}

/// GET /sales/payment_receives/{id}
pub async fn get_payment_receive(
    service: PaymentReceiveServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    match service
        .get_payment_receive(tenant_id.0, path.into_inner())
        .await
    {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({ "payment_receive": payment }))),
        Err(err) => translate_service_error(err, payment_receive_error_reason),
    }
}

/// GET /sales/payment_receives
pub async fn list_payment_receives(
    service: PaymentReceiveServiceData,
    tenant_id: TenantId,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let page = query.resolve()?;
    let (payments, pagination) = service.list_payment_receives(tenant_id.0, page).await?;

    Ok(HttpResponse::Ok().json(json!({
        "payment_receives": payments,
        "pagination": pagination,
    })))
}

/// DELETE /sales/payment_receives/{id}
pub async fn delete_payment_receive(
    service: PaymentReceiveServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let payment_receive_id = path.into_inner();

    match service
        .delete_payment_receive(tenant_id.0, payment_receive_id)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "id": payment_receive_id }))),
        Err(err) => translate_service_error(err, payment_receive_error_reason),
    }
}

/// Configure payment receive routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sales/payment_receives")
            .route("", web::post().to(create_payment_receive))
            .route("", web::get().to(list_payment_receives))
            .route("/{id}", web::get().to(get_payment_receive))
            .route("/{id}", web::delete().to(delete_payment_receive)),
    );
}
