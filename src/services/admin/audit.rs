use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::sync::Arc;
use tracing::warn;

use super::AdminService;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::admin::entities::NewAuditLog;
use crate::models::fees::requests::LimitParams;
use crate::services::error_response;
use crate::storage::Storage;

const DEFAULT_AUDIT_LIMIT: u64 = 100;
const MAX_AUDIT_LIMIT: u64 = 500;

/// 记录一条审计日志，写入失败只记警告，不影响业务响应
pub async fn record_audit(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    action: &str,
    entity_type: &str,
    entity_id: Option<i64>,
    new_values: Option<serde_json::Value>,
) {
    let log = NewAuditLog {
        user_id: RequireJWT::extract_user_id(request),
        action: action.to_string(),
        entity_type: entity_type.to_string(),
        entity_id,
        old_values: None,
        new_values,
        ip_address: request
            .connection_info()
            .realip_remote_addr()
            .map(|addr| addr.to_string()),
        user_agent: request
            .headers()
            .get(header::USER_AGENT)
            .and_then(|ua| ua.to_str().ok())
            .map(|ua| ua.to_string()),
    };

    if let Err(e) = storage.create_audit_log(log).await {
        warn!(
            "Failed to write audit log ({} {} {:?}): {}",
            action, entity_type, entity_id, e
        );
    }
}

pub async fn list_audit_logs(
    service: &AdminService,
    request: &HttpRequest,
    query: LimitParams,
) -> ActixResult<HttpResponse> {
    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_AUDIT_LIMIT)
        .min(MAX_AUDIT_LIMIT);

    match service.get_storage(request).list_audit_logs(limit).await {
        Ok(logs) => Ok(HttpResponse::Ok().json(ApiResponse::success(logs, "ok"))),
        Err(e) => Ok(error_response(&e, "获取审计日志失败")),
    }
}
