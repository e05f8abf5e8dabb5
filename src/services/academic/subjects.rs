use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::AcademicService;
use crate::models::academic::{entities::Subject, requests::CreateSubjectRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::admin::audit::record_audit;
use crate::services::error_response;

pub(crate) const SUBJECTS_CACHE_KEY: &str = "academic:subjects";
const SUBJECTS_CACHE_TTL: Duration = Duration::from_secs(600);

// 科目列表变化很少，先读压缩缓存
pub async fn list_subjects(
    service: &AcademicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let cache = service.get_cache(request);

    if let Some(cache) = &cache {
        match cache.fetch::<Vec<Subject>>(SUBJECTS_CACHE_KEY).await {
            Ok(Some(subjects)) => {
                debug!("Subjects served from cache");
                return Ok(HttpResponse::Ok().json(ApiResponse::success(subjects, "ok")));
            }
            Ok(None) => {}
            Err(e) => warn!("Subjects cache read failed: {}", e),
        }
    }

    let subjects = match service.get_storage(request).list_subjects().await {
        Ok(subjects) => subjects,
        Err(e) => return Ok(error_response(&e, "获取科目列表失败")),
    };

    if let Some(cache) = &cache
        && let Err(e) = cache
            .store(SUBJECTS_CACHE_KEY, &subjects, SUBJECTS_CACHE_TTL)
            .await
    {
        warn!("Subjects cache write failed: {}", e);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(subjects, "ok")))
}

pub async fn create_subject(
    service: &AcademicService,
    request: &HttpRequest,
    subject: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    if subject.name.trim().is_empty() || subject.code.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Subject name and code are required",
        )));
    }

    let storage = service.get_storage(request);

    match storage.get_subject_by_code(&subject.code).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::SubjectAlreadyExists,
                "Subject code already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response(&e, "创建科目失败")),
    }

    match storage.create_subject(subject).await {
        Ok(created) => {
            if let Some(cache) = service.get_cache(request) {
                cache.remove(SUBJECTS_CACHE_KEY).await;
            }
            info!("Subject {} ({}) created", created.name, created.code);
            record_audit(
                &storage,
                request,
                "create",
                "subject",
                Some(created.id),
                serde_json::to_value(&created).ok(),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(created, "Subject created")))
        }
        Err(e) => Ok(error_response(&e, "创建科目失败")),
    }
}
