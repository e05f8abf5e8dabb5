use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::academic::requests::{CreateHomeworkRequest, NewHomework};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::utils::academic_year::parse_rfc3339_timestamp;

const DEFAULT_MAX_MARKS: i32 = 100;

pub async fn create_homework(
    service: &TeacherService,
    request: &HttpRequest,
    homework: CreateHomeworkRequest,
) -> ActixResult<HttpResponse> {
    let teacher = match service.current_teacher(request).await {
        Ok(teacher) => teacher,
        Err(response) => return Ok(response),
    };

    if homework.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Homework title is required",
        )));
    }
    let Some(due_date) = parse_rfc3339_timestamp(&homework.due_date) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Invalid due_date, expected RFC3339",
        )));
    };

    let storage = service.get_storage(request);
    match storage.get_class_by_id(homework.class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, "获取班级失败")),
    }

    let new_homework = NewHomework {
        title: homework.title.trim().to_string(),
        description: homework.description,
        class_id: homework.class_id,
        subject_id: homework.subject_id,
        teacher_id: teacher.id,
        due_date,
        max_marks: homework
            .max_marks
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_MAX_MARKS),
        attachments: homework.attachments,
    };

    match storage.create_homework(new_homework).await {
        Ok(created) => {
            info!(
                "Teacher {} created homework {} for class {}",
                teacher.id, created.id, created.class_id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(created, "Homework created successfully")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::HomeworkCreationFailed,
                format!("Homework creation failed: {e}"),
            )),
        ),
    }
}
