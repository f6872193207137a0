use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use tracing::error;

use crate::core::AppError;
use crate::middleware::TenantId;
use crate::modules::financial_statements::models::AgingSummaryQuery;
use crate::modules::financial_statements::services::ARAgingSummaryService;

/// GET /financial-statements/ar-aging-summary
///
/// Outstanding receivables of each customer split into the current bucket
/// and `aging_periods` windows of `aging_days_before` days.
pub async fn ar_aging_summary(
    service: web::Data<Arc<ARAgingSummaryService>>,
    tenant_id: TenantId,
    query: web::Query<AgingSummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query.resolve(Utc::now().date_naive())?;

    match service.ar_aging_summary(tenant_id.0, filter).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(summary)),
        Err(e) => {
            error!(tenant_id = tenant_id.0, error = %e, "Failed to generate A/R aging summary");
            Err(e)
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/financial-statements")
            .route("/ar-aging-summary", web::get().to(ar_aging_summary)),
    );
}
