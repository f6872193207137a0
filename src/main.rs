use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ledgerdesk::config::{AppConfig, Config};
use ledgerdesk::middleware::{ApiKeyAuth, ErrorLogger, MySqlApiKeyStore, RateLimiter, RequestId};
use ledgerdesk::AppServices;

/// RUST_LOG takes precedence over LOG_LEVEL
fn init_tracing(app: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("ledgerdesk={},actix_web=info", app.log_level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if app.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Forget idle rate limit clients once a minute
fn spawn_rate_limit_cleanup(rate_limiter: RateLimiter) {
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        loop {
            ticker.tick().await;
            rate_limiter.retain_recent();
            tracing::debug!(
                clients = rate_limiter.tracked_clients(),
                "Pruned rate limiter state"
            );
        }
    });
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    init_tracing(&config.app);

    tracing::info!("Starting Ledgerdesk accounting API");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    if config.database.run_migrations {
        config
            .database
            .migrate(&db_pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
    }

    let services = AppServices::mysql(&db_pool);
    let api_keys = Arc::new(MySqlApiKeyStore::new(db_pool.clone()));
    let rate_limiter = RateLimiter::new(config.security.rate_limit_per_minute);
    spawn_rate_limit_cleanup(rate_limiter.clone());
    let cors_origin = config.security.cors_allowed_origin.clone();
    let bind_address = config.server.bind_address();

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .allowed_header("X-API-Key")
            .max_age(3600);
        let cors = if cors_origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(&cors_origin)
        };

        let services = services.clone();

        // The last registered middleware runs first
        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .wrap(rate_limiter.clone())
            .wrap(ApiKeyAuth::new(api_keys.clone()))
            .wrap(ErrorLogger)
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .wrap(cors)
            .configure(move |cfg| services.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
