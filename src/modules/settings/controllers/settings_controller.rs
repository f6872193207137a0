use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::core::AppError;
use crate::middleware::TenantId;
use crate::modules::settings::models::SettingsRequest;
use crate::modules::settings::services::SettingsService;

/// GET /settings
pub async fn get_settings(
    service: web::Data<Arc<SettingsService>>,
    tenant_id: TenantId,
) -> Result<HttpResponse, AppError> {
    let settings = service.get_settings(tenant_id.0).await?;
    Ok(HttpResponse::Ok().json(json!({ "settings": settings })))
}

/// POST /settings
pub async fn save_settings(
    service: web::Data<Arc<SettingsService>>,
    tenant_id: TenantId,
    request: web::Json<SettingsRequest>,
) -> Result<HttpResponse, AppError> {
    service
        .save_settings(tenant_id.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/settings")
            .route("", web::get().to(get_settings))
            .route("", web::post().to(save_settings)),
    );
}
