use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ClassService;
use crate::models::classes::requests::CreateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::admin::audit::record_audit;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    if class_data.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Class name is required",
        )));
    }
    if !(1..=12).contains(&class_data.grade) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Grade must be between 1 and 12",
        )));
    }

    let storage = service.get_storage(request);
    match storage.create_class(class_data).await {
        Ok(class) => {
            info!("Class {} created for {}", class.name, class.academic_year);
            record_audit(
                &storage,
                request,
                "create",
                "class",
                Some(class.id),
                serde_json::to_value(&class).ok(),
            )
            .await;
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(class, "Class created successfully")))
        }
        Err(e) => {
            error!("Class creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ClassCreationFailed,
                    format!("Class creation failed: {e}"),
                )),
            )
        }
    }
}
