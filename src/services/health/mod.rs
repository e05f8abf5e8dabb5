use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::warn;

use crate::cache::CompressedCache;
use crate::models::AppStartTime;
use crate::models::health::responses::{HealthResponse, ReadyResponse};
use crate::services::FileService;
use crate::storage::Storage;

pub const SERVICE_NAME: &str = "schools24-backend";

pub struct HealthService {
    files: FileService,
}

impl HealthService {
    pub fn new_lazy() -> Self {
        Self {
            files: FileService::new_lazy(),
        }
    }

    // GET /health，进程存活即返回 200
    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let uptime_seconds = request
            .app_data::<web::Data<AppStartTime>>()
            .map(|start| {
                chrono::Utc::now()
                    .signed_duration_since(start.start_datetime)
                    .num_seconds()
            })
            .unwrap_or_default();
        let cache = request
            .app_data::<web::Data<CompressedCache>>()
            .map(|cache| cache.stats());

        Ok(HttpResponse::Ok().json(HealthResponse {
            status: "healthy",
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds,
            cache,
        }))
    }

    // GET /ready，存储可用才算就绪
    pub async fn ready(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let Some(storage) = request.app_data::<web::Data<Arc<dyn Storage>>>() else {
            return Ok(HttpResponse::Ok().json(ReadyResponse {
                ready: true,
                reason: None,
            }));
        };

        match storage.ping().await {
            Ok(()) => Ok(HttpResponse::Ok().json(ReadyResponse {
                ready: true,
                reason: None,
            })),
            Err(e) => {
                warn!("Readiness check failed: {}", e);
                Ok(HttpResponse::ServiceUnavailable().json(ReadyResponse {
                    ready: false,
                    reason: Some(e.message().to_string()),
                }))
            }
        }
    }

    // GET /uploads/{path}
    pub async fn serve_upload(&self, path: &str) -> ActixResult<HttpResponse> {
        self.files.serve_upload(path).await
    }
}
