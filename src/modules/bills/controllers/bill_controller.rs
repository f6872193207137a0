use std::sync::Arc;

use actix_web::{http::StatusCode, web, HttpResponse};
use serde_json::json;

use crate::core::{translate_service_error, AppError, ErrorReason, ServiceError};
use crate::middleware::TenantId;
use crate::modules::bills::models::{BillListQuery, BillRequest};
use crate::modules::bills::services::BillService;

type BillServiceData = web::Data<Arc<BillService>>;

fn bill_error_reason(err: &ServiceError) -> Option<(StatusCode, ErrorReason)> {
    match err {
        ServiceError::BillNotFound => Some(ErrorReason::not_found("BILL_NOT_FOUND", 200)),
        ServiceError::BillNumberExists => Some(ErrorReason::bad_request("BILL_NUMBER_EXISTS", 500)),
        ServiceError::VendorNotFound => {
            Some(ErrorReason::bad_request("BILL_VENDOR_NOT_FOUND", 300))
        }
        ServiceError::BillAlreadyOpen => Some(ErrorReason::bad_request("BILL_ALREADY_OPEN", 100)),
        _ => None,
    }
}

/// Create a bill, as draft or open
/// POST /bills
pub async fn create_bill(
    service: BillServiceData,
    tenant_id: TenantId,
    request: web::Json<BillRequest>,
) -> Result<HttpResponse, AppError> {
    match service.create_bill(tenant_id.0, request.into_inner()).await {
        Ok(bill) => Ok(HttpResponse::Ok().json(json!({ "id": bill.bill.id, "bill": bill }))),
        Err(err) => translate_service_error(err, bill_error_reason),
    }
}

/// POST /bills/{id}
pub async fn edit_bill(
    service: BillServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
    request: web::Json<BillRequest>,
) -> Result<HttpResponse, AppError> {
    let bill_id = path.into_inner();

    match service
        .edit_bill(tenant_id.0, bill_id, request.into_inner())
        .await
    {
        Ok(bill) => Ok(HttpResponse::Ok().json(json!({ "id": bill_id, "bill": bill }))),
        Err(err) => translate_service_error(err, bill_error_reason),
    }
}

/// POST /bills/{id}/open
pub async fn open_bill(
    service: BillServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let bill_id = path.into_inner();

    match service.open_bill(tenant_id.0, bill_id).await {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "id": bill_id }))),
        Err(err) => translate_service_error(err, bill_error_reason),
    }
}

/// GET /bills/{id}
pub async fn get_bill(
    service: BillServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    match service.get_bill(tenant_id.0, path.into_inner()).await {
        Ok(bill) => Ok(HttpResponse::Ok().json(json!({ "bill": bill }))),
        Err(err) => translate_service_error(err, bill_error_reason),
    }
}

/// List bills with paging and sorting
/// GET /bills?page=&page_size=&column_sort_by=&sort_order=
pub async fn list_bills(
    service: BillServiceData,
    tenant_id: TenantId,
    query: web::Query<BillListQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query.resolve()?;
    let (bills, pagination) = service.list_bills(tenant_id.0, filter).await?;

    Ok(HttpResponse::Ok().json(json!({
        "bills": bills,
        "pagination": pagination,
    })))
}

/// DELETE /bills/{id}
pub async fn delete_bill(
    service: BillServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let bill_id = path.into_inner();

    match service.delete_bill(tenant_id.0, bill_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "id": bill_id }))),
        Err(err) => translate_service_error(err, bill_error_reason),
    }
}

/// Configure bill routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bills")
            .route("", web::post().to(create_bill))
            .route("", web::get().to(list_bills))
            .route("/{id}/open", web::post().to(open_bill))
            .route("/{id}", web::post().to(edit_bill))
            .route("/{id}", web::get().to(get_bill))
            .route("/{id}", web::delete().to(delete_bill)),
    );
}
