use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use std::time::Instant;

static STARTED_AT: Lazy<Instant> = Lazy::new(Instant::now);

/// Record the startup instant; called once from main.
pub fn mark_started() {
    Lazy::force(&STARTED_AT);
}

/// GET /
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Welcome to the CSE Department API",
    }))
}

/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Backend is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_secs": STARTED_AT.elapsed().as_secs(),
    }))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "NOT_FOUND",
        "message": "Can't find the requested resource on this server!",
    }))
}
