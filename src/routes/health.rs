use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::HealthService;

// 懒加载的全局 HealthService 实例
static HEALTH_SERVICE: Lazy<HealthService> = Lazy::new(HealthService::new_lazy);

pub async fn health(request: HttpRequest) -> ActixResult<HttpResponse> {
    HEALTH_SERVICE.health(&request).await
}

pub async fn ready(request: HttpRequest) -> ActixResult<HttpResponse> {
    HEALTH_SERVICE.ready(&request).await
}

pub async fn serve_upload(path: web::Path<String>) -> ActixResult<HttpResponse> {
    HEALTH_SERVICE.serve_upload(&path.into_inner()).await
}

// 配置路由，均为公开路径
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/ready", web::get().to(ready))
        .route("/uploads/{path:.*}", web::get().to(serve_upload));
}
