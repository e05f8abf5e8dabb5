use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AdminService;
use super::audit::record_audit;
use crate::errors::SchoolSystemError;
use crate::models::students::requests::{CreateStudentRequest, NewStudentProfile};
use crate::models::teachers::requests::{CreateTeacherRequest, NewTeacherProfile};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::models::users::responses::CreatedUserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::auth::register::check_email_exists;
use crate::services::error_response;
use crate::utils::academic_year::parse_date;
use crate::utils::current_academic_year;
use crate::utils::password::hash_password;
use crate::utils::validate::validate_new_user;

fn bad_request(msg: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))
}

fn creation_failed(err: &SchoolSystemError, what: &str) -> HttpResponse {
    let status = err.status_code();
    if status.is_server_error() {
        error!("{} creation failed: {}", what, err);
    }
    let code = if err.is_not_found() {
        ErrorCode::ClassNotFound
    } else {
        ErrorCode::ProfileCreationFailed
    };
    HttpResponse::build(status).json(ApiResponse::error_empty(
        code,
        format!("{what} creation failed: {}", err.message()),
    ))
}

/// 校验账号字段并生成存储层的用户请求
async fn prepare_user(
    service: &AdminService,
    request: &HttpRequest,
    email: &str,
    password: &str,
    full_name: &str,
    role: UserRole,
    phone: Option<String>,
) -> Result<CreateUserRequest, HttpResponse> {
    let email = email.trim().to_lowercase();
    validate_new_user(&email, password, full_name, &role.to_string()).map_err(bad_request)?;
    check_email_exists(&service.get_storage(request), &email).await?;
    let password_hash = hash_password(password).map_err(|e| error_response(&e, "密码哈希失败"))?;

    Ok(CreateUserRequest {
        email,
        password_hash,
        role,
        full_name: full_name.trim().to_string(),
        phone,
    })
}

pub async fn create_student(
    service: &AdminService,
    request: &HttpRequest,
    student: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    if student.admission_number.trim().is_empty() {
        return Ok(bad_request("admission_number is required"));
    }
    if parse_date(&student.date_of_birth).is_none() {
        return Ok(bad_request("Invalid date_of_birth format, use YYYY-MM-DD"));
    }
    if student.gender.trim().is_empty() {
        return Ok(bad_request("gender is required"));
    }
    let admission_date = match student.admission_date.as_deref().map(str::trim) {
        Some(date) if parse_date(date).is_some() => date.to_string(),
        Some(_) => return Ok(bad_request("Invalid admission_date format, use YYYY-MM-DD")),
        None => chrono::Local::now().format("%Y-%m-%d").to_string(),
    };

    let user = match prepare_user(
        service,
        request,
        &student.email,
        &student.password,
        &student.full_name,
        UserRole::Student,
        student.phone.clone(),
    )
    .await
    {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let profile = NewStudentProfile {
        admission_number: student.admission_number.trim().to_string(),
        roll_number: student.roll_number,
        class_id: student.class_id,
        section: student.section,
        date_of_birth: student.date_of_birth.trim().to_string(),
        gender: student.gender.trim().to_string(),
        blood_group: student.blood_group,
        address: student.address,
        parent_name: student.parent_name,
        parent_email: student.parent_email,
        parent_phone: student.parent_phone,
        emergency_contact: student.emergency_contact,
        admission_date,
        academic_year: student
            .academic_year
            .filter(|y| !y.trim().is_empty())
            .unwrap_or_else(current_academic_year),
    };

    let storage = service.get_storage(request);
    match storage.create_student_with_user(user, profile).await {
        Ok((user, student)) => {
            info!(
                "Admin created student {} ({}) with user {}",
                student.admission_number, student.id, user.id
            );
            record_audit(
                &storage,
                request,
                "create",
                "student",
                Some(student.id),
                serde_json::to_value(&student).ok(),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CreatedUserResponse {
                    message: "Student created successfully".to_string(),
                    user_id: user.id,
                },
                "Student created successfully",
            )))
        }
        Err(e) => Ok(creation_failed(&e, "Student")),
    }
}

pub async fn create_teacher(
    service: &AdminService,
    request: &HttpRequest,
    teacher: CreateTeacherRequest,
) -> ActixResult<HttpResponse> {
    if teacher.employee_id.trim().is_empty() {
        return Ok(bad_request("employee_id is required"));
    }
    if teacher.experience_years < 0 {
        return Ok(bad_request("experience_years must not be negative"));
    }
    if let Some(date) = teacher.joining_date.as_deref()
        && parse_date(date).is_none()
    {
        return Ok(bad_request("Invalid joining_date format, use YYYY-MM-DD"));
    }

    let user = match prepare_user(
        service,
        request,
        &teacher.email,
        &teacher.password,
        &teacher.full_name,
        UserRole::Teacher,
        teacher.phone.clone(),
    )
    .await
    {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let profile = NewTeacherProfile {
        employee_id: teacher.employee_id.trim().to_string(),
        department: teacher.department,
        designation: teacher.designation,
        qualifications: teacher.qualifications,
        subjects_taught: teacher.subjects_taught,
        experience_years: teacher.experience_years,
        joining_date: teacher.joining_date.map(|d| d.trim().to_string()),
    };

    let storage = service.get_storage(request);
    match storage.create_teacher_with_user(user, profile).await {
        Ok((user, teacher)) => {
            info!(
                "Admin created teacher {} ({}) with user {}",
                teacher.employee_id, teacher.id, user.id
            );
            record_audit(
                &storage,
                request,
                "create",
                "teacher",
                Some(teacher.id),
                serde_json::to_value(&teacher).ok(),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CreatedUserResponse {
                    message: "Teacher created successfully".to_string(),
                    user_id: user.id,
                },
                "Teacher created successfully",
            )))
        }
        Err(e) => Ok(creation_failed(&e, "Teacher")),
    }
}
