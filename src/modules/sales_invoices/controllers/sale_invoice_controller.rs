use std::sync::Arc;

use actix_web::{http::StatusCode, web, HttpResponse};
use serde_json::json;

use crate::core::{translate_service_error, AppError, ErrorReason, PaginationQuery, ServiceError};
use crate::middleware::TenantId;
use crate::modules::sales_invoices::models::SaleInvoiceRequest;
use crate::modules::sales_invoices::services::SaleInvoiceService;

type SaleInvoiceServiceData = web::Data<Arc<SaleInvoiceService>>;

fn invoice_error_reason(err: &ServiceError) -> Option<(StatusCode, ErrorReason)> {
    match err {
        ServiceError::SaleInvoiceNotFound => {
            Some(ErrorReason::not_found("SALE_INVOICE_NOT_FOUND", 100))
        }
        ServiceError::CustomerNotFound => Some(ErrorReason::bad_request("CUSTOMER_NOT_FOUND", 200)),
        ServiceError::SaleInvoiceNumberExists => {
            Some(ErrorReason::bad_request("SALE_INVOICE_NUMBER_EXISTS", 300))
        }
        ServiceError::SaleInvoiceAlreadyDelivered => {
            Some(ErrorReason::bad_request("SALE_INVOICE_ALREADY_DELIVERED", 400))
        }
        ServiceError::InvoiceHasAssociatedPayments => {
            Some(ErrorReason::bad_request("INVOICE_HAS_ASSOCIATED_PAYMENTS", 500))
        }
        _ => None,
    }
}

/// POST /sales/invoices
pub async fn create_invoice(
    service: SaleInvoiceServiceData,
    tenant_id: TenantId,
    request: web::Json<SaleInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    match service
        .create_invoice(tenant_id.0, request.into_inner())
        .await
    {
        Ok(invoice) => Ok(HttpResponse::Ok().json(json!({
            "id": invoice.id,
            "sale_invoice": invoice,
        }))),
        Err(err) => translate_service_error(err, invoice_error_reason),
    }
}

/// POST /sales/invoices/{id}/deliver
pub async fn deliver_invoice(
    service: SaleInvoiceServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let invoice_id = path.into_inner();

    match service.deliver_invoice(tenant_id.0, invoice_id).await {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "id": invoice_id }))),
        Err(err) => translate_service_error(err, invoice_error_reason),
    }
}

/// GET /sales/invoices/{id}
pub async fn get_invoice(
    service: SaleInvoiceServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    match service.get_invoice(tenant_id.0, path.into_inner()).await {
        Ok(invoice) => Ok(HttpResponse::Ok().json(json!({ "sale_invoice": invoice }))),
        Err(err) => translate_service_error(err, invoice_error_reason),
    }
}

/// GET /sales/invoices
pub async fn list_invoices(
    service: SaleInvoiceServiceData,
    tenant_id: TenantId,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let page = query.resolve()?;
    let (invoices, pagination) = service.list_invoices(tenant_id.0, page).await?;

    Ok(HttpResponse::Ok().json(json!({
        "sales_invoices": invoices,
        "pagination": pagination,
    })))
}

/// DELETE /sales/invoices/{id}
pub async fn delete_invoice(
    service: SaleInvoiceServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let invoice_id = path.into_inner();

    match service.delete_invoice(tenant_id.0, invoice_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "id": invoice_id }))),
        Err(err) => translate_service_error(err, invoice_error_reason),
    }
}

/// Configure sale invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sales/invoices")
            .route("", web::post().to(create_invoice))
            .route("", web::get().to(list_invoices))
            .route("/{id}/deliver", web::post().to(deliver_invoice))
            .route("/{id}", web::get().to(get_invoice))
            .route("/{id}", web::delete().to(delete_invoice)),
    );
}
