use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::RegisterRequest, responses::AuthResponse},
    users::{entities::UserRole, requests::CreateUserRequest},
};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_full_name, validate_password, validate_role,
};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let email = register_request.email.trim().to_lowercase();

    // 1. 字段校验
    let role = match validate_register_request(&email, &register_request) {
        Ok(role) => role,
        Err(response) => return Ok(response),
    };

    // 2. 检查邮箱是否已存在
    if let Err(response) = check_email_exists(&storage, &email).await {
        return Ok(response);
    }

    // 3. 哈希密码
    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("密码哈希失败: {e}"),
                )),
            );
        }
    };

    // 4. 创建用户
    let user = match storage
        .create_user(CreateUserRequest {
            email,
            password_hash,
            role,
            full_name: register_request.full_name.trim().to_string(),
            phone: register_request.phone,
        })
        .await
    {
        Ok(user) => user,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("注册失败: {e}"),
                )),
            );
        }
    };

    // 5. 签发令牌
    match JwtUtils::generate_token_pair(user.id, &user.email, &user.role.to_string()) {
        Ok(tokens) => {
            tracing::info!("User {} registered as {}", user.email, user.role);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                AuthResponse {
                    user,
                    access_token: tokens.access_token,
                    refresh_token: tokens.refresh_token,
                    expires_in: tokens.expires_in,
                },
                "注册成功",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("注册失败，无法生成令牌: {e}"),
            )),
        ),
    }
}

fn validate_register_request(
    email: &str,
    req: &RegisterRequest,
) -> Result<UserRole, HttpResponse> {
    let bad_request = |code: ErrorCode, msg: &str| {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg))
    };

    validate_email(email).map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;
    validate_password(&req.password)
        .map_err(|msg| bad_request(ErrorCode::UserPasswordInvalid, msg))?;
    validate_full_name(&req.full_name)
        .map_err(|msg| bad_request(ErrorCode::UserNameInvalid, msg))?;
    validate_role(&req.role).map_err(|msg| bad_request(ErrorCode::UserRoleInvalid, msg))
}

pub(crate) async fn check_email_exists(
    storage: &Arc<dyn Storage>,
    email: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}
