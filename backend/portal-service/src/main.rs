use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portal_service::middleware::rate_limit::{RateLimitConfig, RateLimiter};
use portal_service::middleware::RateLimitMiddleware;
use portal_service::services::email::EmailService;
use portal_service::services::seed;
use portal_service::services::uploads::Cloudinary;
use portal_service::{config::Config, db, handlers, routes, security};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::error!("Invalid environment: {}", e);
        std::process::exit(1);
    });

    tracing::info!("Starting portal-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    handlers::health::mark_started();

    // Initialize JWT secrets before any token operation
    security::jwt::initialize_secrets(
        &config.jwt.secret,
        &config.jwt.refresh_secret,
        config.jwt.access_token_ttl,
        config.jwt.refresh_token_ttl,
    )
    .expect("Failed to initialize JWT secrets");
    tracing::info!("JWT secrets initialized");

    // Connect to MongoDB; fail fast when the deployment is unreachable.
    let database = db::connect(&config.database.uri, &config.database.name)
        .await
        .expect("Failed to connect to MongoDB");
    tracing::info!(database = %config.database.name, "MongoDB connection established");

    db::ensure_indexes(&database)
        .await
        .expect("Failed to create indexes");
    tracing::info!("Database indexes ensured");

    // Seed the initial admin account
    if let Err(e) = seed::seed_admin(&database, &config.admin_seed).await {
        tracing::warn!("Admin seeding failed: {}", e);
    }

    // Shared services
    let email_service = web::Data::new(EmailService::new(config.email.clone()));
    if !email_service.is_configured() {
        tracing::warn!("SMTP credentials missing; outgoing email will fail");
    }

    let uploader = web::Data::new(Cloudinary::new(config.cloudinary.clone()));

    // Rate limiter over /api (fixed window per client IP)
    let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        max_requests: config.rate_limit.max_requests,
        window: std::time::Duration::from_secs(config.rate_limit.window_secs),
    }));
    let rate_limit = RateLimitMiddleware::new(rate_limiter);
    tracing::info!(
        "Rate limiter initialized: {} requests per {}s",
        config.rate_limit.max_requests,
        config.rate_limit.window_secs
    );

    let server_config = config.clone();
    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    HttpServer::new(move || {
        // Build CORS from the configured origins; trailing slashes are
        // normalized away. Credentials are only allowed with explicit
        // origins.
        let mut cors = Cors::default();
        let mut any_origin = false;
        for origin in server_config.cors.allowed_origins.split(',') {
            let origin = origin.trim().trim_end_matches('/');
            if origin == "*" {
                cors = cors.allow_any_origin();
                any_origin = true;
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);
        if !any_origin {
            cors = cors.supports_credentials();
        }

        let rate_limit = rate_limit.clone();
        App::new()
            .app_data(web::Data::new(database.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(email_service.clone())
            .app_data(uploader.clone())
            .app_data(web::JsonConfig::default().limit(10 * 1024)) // 10kb bodies
            .wrap(cors)
            .wrap(Logger::default())
            .configure(move |cfg| routes::configure_routes(cfg, rate_limit.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
