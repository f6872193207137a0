use std::sync::Arc;

use actix_web::{http::StatusCode, web, HttpResponse};
use serde_json::json;

use crate::core::{
    translate_service_error, AppError, ErrorReason, PaginationQuery, ServiceError,
};
use crate::middleware::TenantId;
use crate::modules::users::models::EditUserRequest;
use crate::modules::users::services::UserService;

type UserServiceData = web::Data<Arc<UserService>>;

/// Edit details of the given user
/// POST /users/{id}
pub async fn edit_user(
    service: UserServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
    request: web::Json<EditUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    match service
        .edit_user(tenant_id.0, user_id, request.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "id": user_id }))),
        Err(err) => translate_service_error(err, |e| match e {
            ServiceError::EmailAlreadyExists => {
                Some(ErrorReason::bad_request("EMAIL_ALREADY_EXIST", 100))
            }
            ServiceError::PhoneNumberAlreadyExist => {
                Some(ErrorReason::bad_request("PHONE_NUMBER_ALREADY_EXIST", 200))
            }
            _ => None,
        }),
    }
}

/// Soft delete the given user
/// DELETE /users/{id}
pub async fn delete_user(
    service: UserServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    match service.delete_user(tenant_id.0, user_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "id": user_id }))),
        Err(err) => translate_service_error(err, user_not_found_reason),
    }
}

/// Retrieve user details
/// GET /users/{id}
pub async fn get_user(
    service: UserServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    match service.get_user(tenant_id.0, path.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({ "user": user }))),
        Err(err) => translate_service_error(err, user_not_found_reason),
    }
}

/// Retrieve the list of users
/// GET /users
pub async fn list_users(
    service: UserServiceData,
    tenant_id: TenantId,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let page = query.resolve()?;
    let (users, pagination) = service.list_users(tenant_id.0, page).await?;

    Ok(HttpResponse::Ok().json(json!({
        "users": users,
        "pagination": pagination,
    })))
}

/// Activate the given user
/// PUT /users/{id}/activate
pub async fn activate_user(
    service: UserServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    match service.activate_user(tenant_id.0, user_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "id": user_id }))),
        Err(err) => translate_service_error(err, |e| match e {
            ServiceError::UserNotFound => Some(ErrorReason::not_found("USER.NOT.FOUND", 100)),
            ServiceError::UserAlreadyActive => {
                Some(ErrorReason::not_found("USER.ALREADY.ACTIVE", 200))
            }
            _ => None,
        }),
    }
}

/// Inactivate the given user
/// PUT /users/{id}/inactivate
pub async fn inactivate_user(
    service: UserServiceData,
    tenant_id: TenantId,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    match service.inactivate_user(tenant_id.0, user_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "id": user_id }))),
        Err(err) => translate_service_error(err, |e| match e {
            ServiceError::UserNotFound => Some(ErrorReason::not_found("USER.NOT.FOUND", 100)),
            ServiceError::UserAlreadyInactive => {
                Some(ErrorReason::not_found("USER.ALREADY.INACTIVE", 200))
            }
            _ => None,
        }),
    }
}

fn user_not_found_reason(err: &ServiceError) -> Option<(StatusCode, ErrorReason)> {
    match err {
        ServiceError::UserNotFound => Some(ErrorReason::not_found("USER_NOT_FOUND", 100)),
        _ => None,
    }
}

/// Configure user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("/{id}/inactivate", web::put().to(inactivate_user))
            .route("/{id}/activate", web::put().to(activate_user))
            .route("/{id}", web::post().to(edit_user))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::delete().to(delete_user)),
    );
}
