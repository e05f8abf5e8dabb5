use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::fees::requests::{
    CreateFeeStructureRequest, FeeStructureListParams, LimitParams, RecordPaymentRequest,
};
use crate::models::students::requests::CreateStudentRequest;
use crate::models::teachers::requests::CreateTeacherRequest;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{AdminCreateUserRequest, UpdateUserRequest, UserListParams};
use crate::services::AdminService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AdminService 实例
static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);

pub async fn get_dashboard(request: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.get_dashboard(&request).await
}

pub async fn list_users(
    request: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_users(&request, query.into_inner()).await
}

pub async fn create_user(
    request: HttpRequest,
    user_data: web::Json<AdminCreateUserRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .create_user(&request, user_data.into_inner())
        .await
}

pub async fn get_user(request: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.get_user(&request, id.0).await
}

pub async fn update_user(
    request: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .update_user(&request, id.0, update_data.into_inner())
        .await
}

pub async fn delete_user(request: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.delete_user(&request, id.0).await
}

pub async fn create_student(
    request: HttpRequest,
    student: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .create_student(&request, student.into_inner())
        .await
}

pub async fn create_teacher(
    request: HttpRequest,
    teacher: web::Json<CreateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .create_teacher(&request, teacher.into_inner())
        .await
}

pub async fn list_fee_structures(
    request: HttpRequest,
    query: web::Query<FeeStructureListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .list_fee_structures(&request, query.into_inner())
        .await
}

pub async fn create_fee_structure(
    request: HttpRequest,
    structure: web::Json<CreateFeeStructureRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .create_fee_structure(&request, structure.into_inner())
        .await
}

pub async fn record_payment(
    request: HttpRequest,
    payment: web::Json<RecordPaymentRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .record_payment(&request, payment.into_inner())
        .await
}

pub async fn list_payments(
    request: HttpRequest,
    query: web::Query<LimitParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .list_payments(&request, query.into_inner())
        .await
}

pub async fn list_audit_logs(
    request: HttpRequest,
    query: web::Query<LimitParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .list_audit_logs(&request, query.into_inner())
        .await
}

// 配置路由，整个作用域仅管理员可用
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .route("/dashboard", web::get().to(get_dashboard))
            .service(
                web::resource("/users")
                    .route(web::get().to(list_users))
                    .route(web::post().to(create_user)),
            )
            .service(
                web::resource("/users/{id}")
                    .route(web::get().to(get_user))
                    .route(web::put().to(update_user))
                    .route(web::delete().to(delete_user)),
            )
            .route("/students", web::post().to(create_student))
            .route("/teachers", web::post().to(create_teacher))
            .service(
                web::resource("/fees/structures")
                    .route(web::get().to(list_fee_structures))
                    .route(web::post().to(create_fee_structure)),
            )
            .service(
                web::resource("/payments")
                    .route(web::get().to(list_payments))
                    .route(web::post().to(record_payment)),
            )
            .route("/audit-logs", web::get().to(list_audit_logs)),
    );
}
