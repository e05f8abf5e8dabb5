use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::StudentService;

// 懒加载的全局 StudentService 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn get_dashboard(request: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_dashboard(&request).await
}

pub async fn get_profile(request: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_profile(&request).await
}

pub async fn get_attendance(request: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_attendance(&request).await
}

// 配置路由，没有学生档案的账号由服务层返回 404
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/student")
            .route("/dashboard", web::get().to(get_dashboard))
            .route("/profile", web::get().to(get_profile))
            .route("/attendance", web::get().to(get_attendance)),
    );
}
