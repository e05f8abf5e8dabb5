use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AcademicService;
use crate::models::academic::requests::{HomeworkListParams, SubmitHomeworkRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::services::students::load_current_student;

const DEFAULT_HOMEWORK_STATUS: &str = "active";

pub async fn list_homework(
    service: &AcademicService,
    request: &HttpRequest,
    query: HomeworkListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let student = match load_current_student(&storage, request).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    let Some(class_id) = student.class_id else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Student is not assigned to a class",
        )));
    };

    let status = query
        .status
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_HOMEWORK_STATUS.to_string());

    match storage.list_class_homework(class_id, &status).await {
        Ok(homework) => Ok(HttpResponse::Ok().json(ApiResponse::success(homework, "ok"))),
        Err(e) => Ok(error_response(&e, "获取作业列表失败")),
    }
}

pub async fn get_homework(
    service: &AcademicService,
    request: &HttpRequest,
    homework_id: i64,
) -> ActixResult<HttpResponse> {
    match service
        .get_storage(request)
        .get_homework_by_id(homework_id)
        .await
    {
        Ok(Some(homework)) => Ok(HttpResponse::Ok().json(ApiResponse::success(homework, "ok"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::HomeworkNotFound,
            "homework not found",
        ))),
        Err(e) => Ok(error_response(&e, "获取作业详情失败")),
    }
}

pub async fn submit_homework(
    service: &AcademicService,
    request: &HttpRequest,
    homework_id: i64,
    submission: SubmitHomeworkRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let student = match load_current_student(&storage, request).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    match storage.get_homework_by_id(homework_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::HomeworkNotFound,
                "homework not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, "获取作业详情失败")),
    }

    match storage
        .upsert_homework_submission(homework_id, student.id, submission)
        .await
    {
        Ok(saved) => {
            info!("Student {} submitted homework {}", student.id, homework_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                saved,
                "Homework submitted successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::HomeworkSubmitFailed,
                format!("提交作业失败: {e}"),
            )),
        ),
    }
}
