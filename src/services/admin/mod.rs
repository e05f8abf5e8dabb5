pub mod audit;
pub mod dashboard;
pub mod fees;
pub mod profiles;
pub mod users;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::fees::requests::{
    CreateFeeStructureRequest, FeeStructureListParams, LimitParams, RecordPaymentRequest,
};
use crate::models::students::requests::CreateStudentRequest;
use crate::models::teachers::requests::CreateTeacherRequest;
use crate::models::users::requests::{AdminCreateUserRequest, UpdateUserRequest, UserListParams};
use crate::storage::Storage;

pub struct AdminService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 管理员首页
    pub async fn get_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::get_dashboard(self, request).await
    }

    // 用户管理
    pub async fn list_users(
        &self,
        request: &HttpRequest,
        query: UserListParams,
    ) -> ActixResult<HttpResponse> {
        users::list_users(self, request, query).await
    }

    pub async fn get_user(&self, request: &HttpRequest, user_id: i64) -> ActixResult<HttpResponse> {
        users::get_user(self, request, user_id).await
    }

    pub async fn create_user(
        &self,
        request: &HttpRequest,
        user_data: AdminCreateUserRequest,
    ) -> ActixResult<HttpResponse> {
        users::create_user(self, request, user_data).await
    }

    pub async fn update_user(
        &self,
        request: &HttpRequest,
        user_id: i64,
        update_data: UpdateUserRequest,
    ) -> ActixResult<HttpResponse> {
        users::update_user(self, request, user_id, update_data).await
    }

    pub async fn delete_user(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        users::delete_user(self, request, user_id).await
    }

    // 建档：用户 + 学生/教师档案
    pub async fn create_student(
        &self,
        request: &HttpRequest,
        student: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        profiles::create_student(self, request, student).await
    }

    pub async fn create_teacher(
        &self,
        request: &HttpRequest,
        teacher: CreateTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        profiles::create_teacher(self, request, teacher).await
    }

    // 收费
    pub async fn list_fee_structures(
        &self,
        request: &HttpRequest,
        query: FeeStructureListParams,
    ) -> ActixResult<HttpResponse> {
        fees::list_fee_structures(self, request, query).await
    }

    pub async fn create_fee_structure(
        &self,
        request: &HttpRequest,
        structure: CreateFeeStructureRequest,
    ) -> ActixResult<HttpResponse> {
        fees::create_fee_structure(self, request, structure).await
    }

    pub async fn record_payment(
        &self,
        request: &HttpRequest,
        payment: RecordPaymentRequest,
    ) -> ActixResult<HttpResponse> {
        fees::record_payment(self, request, payment).await
    }

    pub async fn list_payments(
        &self,
        request: &HttpRequest,
        query: LimitParams,
    ) -> ActixResult<HttpResponse> {
        fees::list_payments(self, request, query).await
    }

    // 审计日志
    pub async fn list_audit_logs(
        &self,
        request: &HttpRequest,
        query: LimitParams,
    ) -> ActixResult<HttpResponse> {
        audit::list_audit_logs(self, request, query).await
    }
}
