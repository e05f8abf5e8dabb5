use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AdminService;
use super::audit::record_audit;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{
    AdminCreateUserRequest, CreateUserRequest, UpdateUserRequest, UserListParams, UserListQuery,
};
use crate::models::users::responses::CreatedUserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::auth::register::check_email_exists;
use crate::services::error_response;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_full_name, validate_new_user, validate_role};

pub async fn list_users(
    service: &AdminService,
    request: &HttpRequest,
    query: UserListParams,
) -> ActixResult<HttpResponse> {
    let role = match query.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => match raw.parse::<UserRole>() {
            Ok(role) => Some(role),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::UserRoleInvalid, msg)));
            }
        },
        None => None,
    };

    let (page, page_size) = query.pagination.normalized();
    let list_query = UserListQuery {
        page,
        page_size,
        role,
    };

    match service
        .get_storage(request)
        .list_users_with_pagination(list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "User list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "获取用户列表失败")),
    }
}

pub async fn get_user(
    service: &AdminService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).get_user_by_id(user_id).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(user, "ok"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(error_response(&e, "获取用户失败")),
    }
}

pub async fn create_user(
    service: &AdminService,
    request: &HttpRequest,
    user_data: AdminCreateUserRequest,
) -> ActixResult<HttpResponse> {
    let email = user_data.email.trim().to_lowercase();
    let role = match validate_new_user(
        &email,
        &user_data.password,
        &user_data.full_name,
        &user_data.role,
    ) {
        Ok(role) => role,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };

    let storage = service.get_storage(request);
    if let Err(response) = check_email_exists(&storage, &email).await {
        return Ok(response);
    }

    let password_hash = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(error_response(&e, "密码哈希失败")),
    };

    match storage
        .create_user(CreateUserRequest {
            email,
            password_hash,
            role,
            full_name: user_data.full_name.trim().to_string(),
            phone: user_data.phone,
        })
        .await
    {
        Ok(user) => {
            info!("Admin created user {} ({})", user.email, user.role);
            record_audit(
                &storage,
                request,
                "create",
                "user",
                Some(user.id),
                serde_json::to_value(&user).ok(),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CreatedUserResponse {
                    message: "User created successfully".to_string(),
                    user_id: user.id,
                },
                "User created successfully",
            )))
        }
        Err(e) => Ok(error_response(&e, "创建用户失败")),
    }
}

pub async fn update_user(
    service: &AdminService,
    request: &HttpRequest,
    user_id: i64,
    mut update_data: UpdateUserRequest,
) -> ActixResult<HttpResponse> {
    if let Some(role) = update_data.role.as_deref() {
        match validate_role(role.trim()) {
            Ok(role) => update_data.role = Some(role.to_string()),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::UserRoleInvalid, msg)));
            }
        }
    }
    if let Some(full_name) = update_data.full_name.as_deref()
        && let Err(msg) = validate_full_name(full_name)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }

    let storage = service.get_storage(request);
    let audit_values = serde_json::json!({
        "full_name": update_data.full_name,
        "phone": update_data.phone,
        "profile_picture_url": update_data.profile_picture_url,
        "role": update_data.role,
        "is_active": update_data.is_active,
    });

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            record_audit(
                &storage,
                request,
                "update",
                "user",
                Some(user.id),
                Some(audit_values),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                user,
                "User information updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(HttpResponse::build(e.status_code()).json(ApiResponse::error_empty(
            ErrorCode::UserUpdateFailed,
            format!("Failed to update user information: {}", e.message()),
        ))),
    }
}

/// 软删除：只停用账号
pub async fn delete_user(
    service: &AdminService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    if RequireJWT::extract_user_id(request) == Some(user_id) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        )));
    }

    let storage = service.get_storage(request);
    match storage.deactivate_user(user_id).await {
        Ok(true) => {
            record_audit(&storage, request, "delete", "user", Some(user_id), None).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(HttpResponse::build(e.status_code()).json(ApiResponse::error_empty(
            ErrorCode::UserDeleteFailed,
            format!("User deletion failed: {}", e.message()),
        ))),
    }
}
