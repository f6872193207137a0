use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: bool,
}

/// GET /health - Liveness probe, never touches the database
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /ready - Readiness probe
/// Returns 503 until the database answers
pub async fn readiness_check(pool: Option<web::Data<MySqlPool>>) -> impl Responder {
    let database = match pool {
        Some(pool) => match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "Database readiness check failed");
                false
            }
        },
        None => false,
    };

    let response = ReadinessResponse {
        ready: database,
        database,
    };

    if database {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// GET / - Service banner
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
