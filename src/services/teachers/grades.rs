use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::academic::requests::{CreateGradeRequest, NewGrade};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user_id, error_response};
use crate::utils::academic_year::parse_date;
use crate::utils::current_academic_year;

fn validate_grade(grade: &CreateGradeRequest) -> Result<(), &'static str> {
    if grade.exam_type.trim().is_empty() {
        return Err("exam_type is required");
    }
    if grade.max_marks.is_nan() || grade.max_marks <= 0.0 {
        return Err("max_marks must be greater than 0");
    }
    if !(0.0..=grade.max_marks).contains(&grade.marks_obtained) {
        return Err("marks_obtained must be between 0 and max_marks");
    }
    if let Some(date) = &grade.exam_date
        && parse_date(date).is_none()
    {
        return Err("Invalid exam_date format, use YYYY-MM-DD");
    }
    Ok(())
}

pub async fn create_grade(
    service: &TeacherService,
    request: &HttpRequest,
    grade: CreateGradeRequest,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user_id(request) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };
    if let Err(response) = service.current_teacher(request).await {
        return Ok(response);
    }

    if let Err(msg) = validate_grade(&grade) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let storage = service.get_storage(request);
    match storage.get_student_by_id(grade.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, "获取学生失败")),
    }

    let new_grade = NewGrade {
        student_id: grade.student_id,
        subject_id: grade.subject_id,
        exam_type: grade.exam_type.trim().to_string(),
        exam_name: grade.exam_name,
        max_marks: grade.max_marks,
        marks_obtained: grade.marks_obtained,
        grade: grade.grade,
        remarks: grade.remarks,
        graded_by: user_id,
        exam_date: grade.exam_date.map(|d| d.trim().to_string()),
        academic_year: current_academic_year(),
    };

    match storage.create_grade(new_grade).await {
        Ok(created) => {
            info!(
                "User {} entered grade {} for student {}",
                user_id, created.id, created.student_id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(created, "Grade entered successfully")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::GradeCreationFailed,
                format!("Grade creation failed: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(max: f64, obtained: f64) -> CreateGradeRequest {
        CreateGradeRequest {
            student_id: 1,
            subject_id: 1,
            exam_type: "unit_test".into(),
            exam_name: None,
            max_marks: max,
            marks_obtained: obtained,
            grade: None,
            remarks: None,
            exam_date: Some("2025-07-14".into()),
        }
    }

    #[test]
    fn test_validate_grade() {
        assert!(validate_grade(&request(50.0, 42.5)).is_ok());
        assert!(validate_grade(&request(50.0, 50.0)).is_ok());
        assert!(validate_grade(&request(50.0, 51.0)).is_err());
        assert!(validate_grade(&request(0.0, 0.0)).is_err());
        assert!(validate_grade(&request(f64::NAN, 1.0)).is_err());

        let mut bad_date = request(50.0, 10.0);
        bad_date.exam_date = Some("14/07/2025".into());
        assert!(validate_grade(&bad_date).is_err());
    }
}
