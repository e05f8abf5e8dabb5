pub mod grades;
pub mod homework;
pub mod subjects;
pub mod timetable;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::CompressedCache;
use crate::models::academic::requests::{
    CreateSubjectRequest, GradeListParams, HomeworkListParams, SubmitHomeworkRequest,
};
use crate::storage::Storage;

pub struct AcademicService {
    storage: Option<Arc<dyn Storage>>,
}

impl AcademicService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 未注册压缩缓存时不走缓存
    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<CompressedCache> {
        request
            .app_data::<web::Data<CompressedCache>>()
            .map(|cache| cache.get_ref().clone())
    }

    // 学生所在班级的周课表
    pub async fn get_timetable(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        timetable::get_timetable(self, request).await
    }

    // 班级作业列表
    pub async fn list_homework(
        &self,
        request: &HttpRequest,
        query: HomeworkListParams,
    ) -> ActixResult<HttpResponse> {
        homework::list_homework(self, request, query).await
    }

    // 作业详情
    pub async fn get_homework(
        &self,
        request: &HttpRequest,
        homework_id: i64,
    ) -> ActixResult<HttpResponse> {
        homework::get_homework(self, request, homework_id).await
    }

    // 提交作业
    pub async fn submit_homework(
        &self,
        request: &HttpRequest,
        homework_id: i64,
        submission: SubmitHomeworkRequest,
    ) -> ActixResult<HttpResponse> {
        homework::submit_homework(self, request, homework_id, submission).await
    }

    // 学生成绩
    pub async fn list_grades(
        &self,
        request: &HttpRequest,
        query: GradeListParams,
    ) -> ActixResult<HttpResponse> {
        grades::list_grades(self, request, query).await
    }

    // 科目列表
    pub async fn list_subjects(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        subjects::list_subjects(self, request).await
    }

    // 创建科目（管理员）
    pub async fn create_subject(
        &self,
        request: &HttpRequest,
        subject: CreateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::create_subject(self, request, subject).await
    }
}
