use std::sync::Arc;

use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::core::{translate_service_error, AppError, ErrorReason, PaginationQuery, ServiceError};
use crate::middleware::TenantId;
use crate::modules::contacts::models::{ContactRequest, ContactService};
use crate::modules::contacts::services::{display_name_options, ContactsService, DisplayNameParts};

type ContactsServiceData = web::Data<Arc<ContactsService>>;

/// Query parameters of the display-name options endpoint
#[derive(Debug, Default, Deserialize)]
pub struct DisplayNameQuery {
    pub salutation: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
}

fn contact_error_reason(err: &ServiceError) -> Option<(StatusCode, ErrorReason)> {
    match err {
        ServiceError::CustomerNotFound => Some(ErrorReason::not_found("CUSTOMER_NOT_FOUND", 100)),
        ServiceError::VendorNotFound => Some(ErrorReason::not_found("VENDOR_NOT_FOUND", 100)),
        ServiceError::CustomerHasSalesInvoices => {
            Some(ErrorReason::bad_request("CUSTOMER_HAS_SALES_INVOICES", 200))
        }
        ServiceError::VendorHasBills => Some(ErrorReason::bad_request("VENDOR_HAS_BILLS", 200)),
        _ => None,
    }
}

async fn create_contact(
    service: &ContactsService,
    tenant_id: TenantId,
    contact_service: ContactService,
    request: ContactRequest,
) -> Result<HttpResponse, AppError> {
    let contact = service
        .create_contact(tenant_id.0, contact_service, request)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "id": contact.id, contact_service.to_string(): contact })))
}

async fn get_contact(
    service: &ContactsService,
    tenant_id: TenantId,
    contact_service: ContactService,
    contact_id: i64,
) -> Result<HttpResponse, AppError> {
    match service
        .get_contact(tenant_id.0, contact_service, contact_id)
        .await
    {
        Ok(contact) => Ok(HttpResponse::Ok().json(json!({ contact_service.to_string(): contact }))),
        Err(err) => translate_service_error(err, contact_error_reason),
    }
}

async fn list_contacts(
    service: &ContactsService,
    tenant_id: TenantId,
    contact_service: ContactService,
    query: PaginationQuery,
    key: &str,
) -> Result<HttpResponse, AppError> {
    let page = query.resolve()?;
    let (contacts, pagination) = service
        .list_contacts(tenant_id.0, contact_service, page)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        key: contacts,
        "pagination": pagination,
    })))
}

async fn delete_contact(
    service: &ContactsService,
    tenant_id: TenantId,
    contact_service: ContactService,
    contact_id: i64,
) -> Result<HttpResponse, AppError> {
    match service
        .delete_contact(tenant_id.0, contact_service, contact_id)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "id": contact_id }))),
        Err(err) => translate_service_error(err, contact_error_reason),
    }
}

/// POST /customers
pub async fn create_customer(
    service: ContactsServiceData,
    tenant_id: TenantId,
    request: web::Json<ContactRequest>,
) -> Result<HttpResponse, AppError> {
    create_contact(&service, tenant_id, ContactService::Customer, request.into_inner()).await
}

/// POST /customers/{id}
pub async fn edit_customer(
    service: ContactsServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
    request: web::Json<ContactRequest>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();

    match service
        .edit_contact(tenant_id.0, ContactService::Customer, customer_id, request.into_inner())
        .await
    {
        Ok(customer) => Ok(HttpResponse::Ok().json(json!({ "id": customer.id }))),
        Err(err) => translate_service_error(err, contact_error_reason),
    }
}

/// GET /customers/{id}
pub async fn get_customer(
    service: ContactsServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    get_contact(&service, tenant_id, ContactService::Customer, path.into_inner()).await
}

/// GET /customers
pub async fn list_customers(
    service: ContactsServiceData,
    tenant_id: TenantId,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    list_contacts(&service, tenant_id, ContactService::Customer, query.into_inner(), "customers")
        .await
}

/// DELETE /customers/{id}
pub async fn delete_customer(
    service: ContactsServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    delete_contact(&service, tenant_id, ContactService::Customer, path.into_inner()).await
}

/// POST /vendors
pub async fn create_vendor(
    service: ContactsServiceData,
    tenant_id: TenantId,
    request: web::Json<ContactRequest>,
) -> Result<HttpResponse, AppError> {
    create_contact(&service, tenant_id, ContactService::Vendor, request.into_inner()).await
}

/// GET /vendors/{id}
pub async fn get_vendor(
    service: ContactsServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    get_contact(&service, tenant_id, ContactService::Vendor, path.into_inner()).await
}

/// GET /vendors
pub async fn list_vendors(
    service: ContactsServiceData,
    tenant_id: TenantId,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    list_contacts(&service, tenant_id, ContactService::Vendor, query.into_inner(), "vendors").await
}

/// DELETE /vendors/{id}
pub async fn delete_vendor(
    service: ContactsServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    delete_contact(&service, tenant_id, ContactService::Vendor, path.into_inner()).await
}

/// GET /contacts/display-name-options
pub async fn get_display_name_options(query: web::Query<DisplayNameQuery>) -> HttpResponse {
    let options = display_name_options(DisplayNameParts {
        salutation: query.salutation.as_deref(),
        first_name: query.first_name.as_deref(),
        last_name: query.last_name.as_deref(),
        company_name: query.company_name.as_deref(),
    });

    HttpResponse::Ok().json(json!({ "options": options }))
}

/// Configure customer, vendor and contact routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::post().to(create_customer))
            .route("", web::get().to(list_customers))
            .route("/{id}", web::post().to(edit_customer))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::delete().to(delete_customer)),
    )
    .service(
        web::scope("/vendors")
            .route("", web::post().to(create_vendor))
            .route("", web::get().to(list_vendors))
            .route("/{id}", web::get().to(get_vendor))
            .route("/{id}", web::delete().to(delete_vendor)),
    )
    .service(
        web::scope("/contacts")
            .route("/display-name-options", web::get().to(get_display_name_options)),
    );
}
