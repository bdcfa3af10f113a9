/// Fixed-window rate limiting keyed by client IP.
/// Applied app-wide over /api; the window and budget come from config.
use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpResponse,
};
use dashmap::DashMap;
use futures::future::LocalBoxFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct RateLimitConfig {
    /// Maximum number of requests per window
    pub max_requests: u32,
    /// Time window
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(900), // 15 minutes
        }
    }
}

/// In-process fixed-window counter store.
pub struct RateLimiter {
    windows: DashMap<String, (u32, Instant)>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            config,
        }
    }

    /// Record one request for the client and report whether it pushed the
    /// client over the budget for the current window.
    pub fn is_rate_limited(&self, client_id: &str) -> bool {
        let now = Instant::now();
        let mut entry = self
            .windows
            .entry(client_id.to_string())
            .or_insert((0, now));

        let (count, window_start) = *entry;
        if now.duration_since(window_start) >= self.config.window {
            *entry = (1, now);
            return false;
        }

        if count >= self.config.max_requests {
            return true;
        }

        *entry = (count + 1, window_start);
        false
    }

    pub fn request_count(&self, client_id: &str) -> u32 {
        self.windows.get(client_id).map(|e| e.0).unwrap_or(0)
    }

    pub fn reset(&self, client_id: &str) {
        self.windows.remove(client_id);
    }
}

/// App-level middleware wrapping the limiter.
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<RateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(RateLimitMiddlewareService {
            service: Arc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Arc<S>,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let limiter = self.limiter.clone();

        // Resolve the client IP once, before the request is moved.
        let client_ip = {
            let conn_info = req.connection_info();
            let forwarded = req
                .headers()
                .get("X-Forwarded-For")
                .and_then(|h| h.to_str().ok())
                .and_then(|header| {
                    header
                        .split(',')
                        .map(|part| part.trim())
                        .find(|part| !part.is_empty())
                        .map(|part| part.to_string())
                });
            forwarded
                .or_else(|| {
                    conn_info
                        .peer_addr()
                        .and_then(|addr| addr.split(':').next().map(|s| s.to_string()))
                })
                .unwrap_or_else(|| "unknown".to_string())
        };

        Box::pin(async move {
            if limiter.is_rate_limited(&client_ip) {
                let response = HttpResponse::TooManyRequests()
                    .insert_header(("Retry-After", "60"))
                    .json(serde_json::json!({
                        "error": "RATE_LIMIT_EXCEEDED",
                        "message": "Too many requests from this IP, please try again later",
                    }));
                return Ok(req.into_response(response.map_into_boxed_body()));
            }

            let res = service.call(req).await?;
            Ok(res.map_into_boxed_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_enforced_within_window() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 3,
            window: Duration::from_secs(60),
        });

        assert!(!limiter.is_rate_limited("1.2.3.4"));
        assert!(!limiter.is_rate_limited("1.2.3.4"));
        assert!(!limiter.is_rate_limited("1.2.3.4"));
        assert!(limiter.is_rate_limited("1.2.3.4"));
        assert_eq!(limiter.request_count("1.2.3.4"), 3);
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
        });

        assert!(!limiter.is_rate_limited("a"));
        assert!(limiter.is_rate_limited("a"));
        assert!(!limiter.is_rate_limited("b"));
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_millis(10),
        });

        assert!(!limiter.is_rate_limited("a"));
        assert!(limiter.is_rate_limited("a"));
        std::thread::sleep(Duration::from_millis(20));
        assert!(!limiter.is_rate_limited("a"));
    }

    #[test]
    fn test_reset_clears_counter() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
        });
        assert!(!limiter.is_rate_limited("a"));
        limiter.reset("a");
        assert!(!limiter.is_rate_limited("a"));
    }
}
