/*!
 * 速率限制中间件（按客户端 IP 的令牌桶）
 *
 * 限流器是显式创建并注入的实例，由 `main` 持有并启动清理任务：
 *
 * ```rust,ignore
 * let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
 * limiter.spawn_cleanup(Duration::from_secs(config.rate_limit.cleanup_interval_secs));
 *
 * App::new().wrap(RateLimit::new(limiter.clone()))
 * ```
 *
 * - 持续速率为 `requests_per_min / 60` 个令牌每秒，桶容量为 `burst`
 * - 令牌不足时立即返回 429，不排队
 * - 每个清理周期丢弃全部桶
 * - 默认按 TCP 对端地址计数；`trust_proxy_headers` 开启时才读取转发头
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use dashmap::DashMap;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::RateLimitConfig;
use crate::models::{ApiResponse, ErrorCode};

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please slow down.";

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

/// 按键（客户端 IP）维护令牌桶
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    rate_per_sec: f64,
    capacity: f64,
    trust_proxy_headers: bool,
}

impl RateLimiter {
    pub fn new(requests_per_min: u32, burst: u32) -> Self {
        Self {
            buckets: DashMap::new(),
            rate_per_sec: f64::from(requests_per_min) / 60.0,
            capacity: f64::from(burst),
            trust_proxy_headers: false,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.requests_per_min, config.burst)
            .with_proxy_headers(config.trust_proxy_headers)
    }

    pub fn with_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    /// 尝试消耗一个令牌
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket {
                tokens: self.capacity,
                last_refill: now,
            });

        let elapsed = now.saturating_duration_since(bucket.last_refill);
        bucket.tokens =
            (bucket.tokens + elapsed.as_secs_f64() * self.rate_per_sec).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// 丢弃全部桶
    pub fn cleanup(&self) {
        let dropped = self.buckets.len();
        self.buckets.clear();
        debug!("Rate limiter cleanup dropped {} buckets", dropped);
    }

    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }

    /// 启动周期清理任务，限流器被释放后任务自动退出
    pub fn spawn_cleanup(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            loop {
                ticker.tick().await;
                match weak.upgrade() {
                    Some(limiter) => limiter.cleanup(),
                    None => break,
                }
            }
        })
    }
}

/// 从请求中提取客户端 IP
///
/// 未信任代理时只看 TCP 对端地址，转发头由客户端控制，不能作为限流键。
fn extract_client_ip(req: &ServiceRequest, trust_proxy_headers: bool) -> String {
    let peer_ip = req.peer_addr().map(|addr| addr.ip().to_string());
    if !trust_proxy_headers {
        return peer_ip.unwrap_or_else(|| "unknown".to_string());
    }

    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    // 只取第一个 IP（最接近客户端的）
    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    connection_ip
        .or(peer_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    use std::net::IpAddr;
    ip.parse::<IpAddr>().is_ok()
}

fn create_rate_limit_response() -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            RATE_LIMIT_MESSAGE,
        ))
}

/// 限流中间件，持有注入的 [`RateLimiter`]
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<RateLimiter>,
}

impl RateLimit {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limiter = self.limiter.clone();

        Box::pin(async move {
            let client_ip = extract_client_ip(&req, limiter.trust_proxy_headers);
            if !limiter.allow(&client_ip) {
                warn!("Rate limit exceeded for {} on {}", client_ip, req.path());
                return Ok(
                    req.into_response(create_rate_limit_response().map_into_right_body())
                );
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    #[actix_web::test]
    async fn test_burst_then_reject() {
        let limiter = RateLimiter::new(60, 3);
        let now = Instant::now();
        assert!(limiter.allow_at("10.0.0.1", now));
        assert!(limiter.allow_at("10.0.0.1", now));
        assert!(limiter.allow_at("10.0.0.1", now));
        assert!(!limiter.allow_at("10.0.0.1", now));
        // 其它客户端不受影响
        assert!(limiter.allow_at("10.0.0.2", now));
    }

    #[actix_web::test]
    async fn test_refill_rate() {
        // 60 次/分钟 = 每秒 1 个令牌
        let limiter = RateLimiter::new(60, 1);
        let now = Instant::now();
        assert!(limiter.allow_at("ip", now));
        assert!(!limiter.allow_at("ip", now + Duration::from_millis(500)));
        assert!(limiter.allow_at("ip", now + Duration::from_millis(1600)));
    }

    #[actix_web::test]
    async fn test_cleanup_resets_buckets() {
        let limiter = RateLimiter::new(1, 2);
        let now = Instant::now();
        assert!(limiter.allow_at("ip", now));
        assert!(limiter.allow_at("ip", now));
        assert!(!limiter.allow_at("ip", now));
        assert_eq!(limiter.tracked_clients(), 1);

        limiter.cleanup();
        assert_eq!(limiter.tracked_clients(), 0);
        assert!(limiter.allow_at("ip", now));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_ticks() {
        let limiter = Arc::new(RateLimiter::new(1, 1));
        assert!(limiter.allow("ip"));
        assert!(!limiter.allow("ip"));

        let handle = limiter.spawn_cleanup(Duration::from_secs(600));
        tokio::time::sleep(Duration::from_secs(601)).await;
        assert_eq!(limiter.tracked_clients(), 0);
        assert!(limiter.allow("ip"));
        handle.abort();
    }

    #[actix_web::test]
    async fn test_middleware_returns_429() {
        let limiter = Arc::new(RateLimiter::new(60, 2));
        let app = test::init_service(
            App::new()
                .wrap(RateLimit::new(limiter.clone()))
                .route("/health", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        for _ in 0..2 {
            let req = test::TestRequest::get()
                .uri("/health")
                .peer_addr("127.0.0.1:40000".parse().unwrap())
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/health")
            .peer_addr("127.0.0.1:40000".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::RateLimitExceeded as i32);
        assert_eq!(body["message"], RATE_LIMIT_MESSAGE);

        limiter.cleanup();
        let req = test::TestRequest::get()
            .uri("/health")
            .peer_addr("127.0.0.1:40000".parse().unwrap())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_forwarded_header_ignored_by_default() {
        let limiter = Arc::new(RateLimiter::new(60, 1));
        let app = test::init_service(
            App::new()
                .wrap(RateLimit::new(limiter.clone()))
                .route("/health", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/health")
            .peer_addr("198.51.100.7:5000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "203.0.113.1"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        // 换一个转发地址仍落在同一个桶
        let req = test::TestRequest::get()
            .uri("/health")
            .peer_addr("198.51.100.7:5000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "203.0.113.2"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[actix_web::test]
    async fn test_forwarded_header_used_behind_trusted_proxy() {
        let limiter = Arc::new(RateLimiter::new(60, 1).with_proxy_headers(true));
        let app = test::init_service(
            App::new()
                .wrap(RateLimit::new(limiter.clone()))
                .route("/health", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        for client in ["203.0.113.1", "203.0.113.2"] {
            let req = test::TestRequest::get()
                .uri("/health")
                .peer_addr("10.0.0.1:5000".parse().unwrap())
                .insert_header(("X-Forwarded-For", client))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }
        assert_eq!(limiter.tracked_clients(), 2);
    }
}
