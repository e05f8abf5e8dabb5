/*!
 * JWT 认证中间件
 *
 * 挂在应用最外层，公开路径按前缀放行，其余请求必须携带
 * `Authorization: Bearer <token>`。校验通过后把 [`Claims`] 写入请求扩展，
 * 处理函数通过 `RequireJWT::extract_user_claims` 等辅助函数读取。
 *
 * ```rust,ignore
 * App::new()
 *     .wrap(RequireJWT)
 *     .configure(routes::configure_student_routes)
 * ```
 *
 * 令牌无效的原因（过期、签名错误、算法不符）不会透露给客户端，统一返回 401。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, StatusCode},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use super::create_error_response;
use crate::models::ErrorCode;
use crate::models::users::entities::UserRole;
use crate::utils::jwt::{Claims, INVALID_TOKEN, JwtUtils};

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

/// 无需认证的路径前缀
pub const PUBLIC_PATH_PREFIXES: &[&str] = &[
    "/health",
    "/ready",
    "/uploads",
    "/api/v1/auth/login",
    "/api/v1/auth/register",
];

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

#[derive(Clone)]
pub struct RequireJWT;

// 提取并验证 bearer token
fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<Claims, &'static str> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or("Missing or invalid Authorization header")?;

    JwtUtils::verify_token(token).map_err(|_| INVALID_TOKEN)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // CORS 预检
            if req.method() == Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            if is_public_path(req.path()) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            match extract_and_validate_jwt(&req) {
                Ok(claims) => {
                    debug!("JWT authentication successful for ID: {}", claims.user_id);
                    req.extensions_mut().insert(claims);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, err)
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取 Claims
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<Claims> {
        req.extensions().get::<Claims>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<Claims>().map(|claims| claims.user_id)
    }

    /// 角色字符串无法识别时视为无角色
    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions()
            .get::<Claims>()
            .and_then(|claims| claims.role.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpRequest, HttpResponse, test, web};

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match RequireJWT::extract_user_claims(&req) {
            Some(claims) => HttpResponse::Ok().body(claims.role),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    #[actix_web::test]
    async fn test_public_paths() {
        assert!(is_public_path("/health"));
        assert!(is_public_path("/api/v1/auth/login"));
        assert!(is_public_path("/uploads/2025-01/a.png"));
        assert!(!is_public_path("/api/v1/auth/me"));
        assert!(!is_public_path("/api/v1/admin/users"));
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .wrap(RequireJWT)
                .route("/api/v1/auth/me", web::get().to(whoami))
                .route("/health", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_valid_token_attaches_claims() {
        let token = JwtUtils::generate_token(
            5,
            "teacher@school.test",
            "teacher",
            chrono::Duration::hours(1),
        )
        .unwrap();
        let app = test::init_service(
            App::new()
                .wrap(RequireJWT)
                .route("/api/v1/auth/me", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "teacher");

        let req = test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(("Authorization", "Bearer forged.token.value"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
