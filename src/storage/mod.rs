use std::sync::Arc;

use crate::models::{
    academic::{
        entities::{Grade, Homework, HomeworkSubmission, Subject, TimetableEntry},
        requests::{CreateSubjectRequest, NewGrade, NewHomework, SubmitHomeworkRequest},
    },
    admin::entities::{AuditLog, NewAuditLog},
    announcements::{entities::Announcement, requests::NewAnnouncement},
    attendance::{entities::Attendance, requests::AttendanceBatch},
    classes::{entities::Class, requests::CreateClassRequest},
    fees::{
        entities::{FeeStructure, Payment, StudentFee},
        requests::{CreateFeeStructureRequest, NewPayment},
    },
    students::{entities::Student, requests::NewStudentProfile},
    teachers::{
        entities::{Teacher, TeacherAssignment},
        requests::NewTeacherProfile,
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 连通性检查
    async fn ping(&self) -> Result<()>;

    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 停用用户（软删除）
    async fn deactivate_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量，可按角色过滤
    async fn count_users(&self, role: Option<UserRole>) -> Result<u64>;

    /// 学生档案
    // 同一事务中创建用户和学生档案
    async fn create_student_with_user(
        &self,
        user: CreateUserRequest,
        profile: NewStudentProfile,
    ) -> Result<(User, Student)>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    // 班级学生，按学号排序
    async fn list_class_students(&self, class_id: i64) -> Result<Vec<Student>>;
    async fn count_students(&self) -> Result<u64>;

    /// 教师档案
    async fn create_teacher_with_user(
        &self,
        user: CreateUserRequest,
        profile: NewTeacherProfile,
    ) -> Result<(User, Teacher)>;
    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>>;
    // 教师在某学年的任课，按年级、班别排序
    async fn list_teacher_assignments(
        &self,
        teacher_id: i64,
        academic_year: &str,
    ) -> Result<Vec<TeacherAssignment>>;
    // 教师某一天的课表，按节次排序
    async fn list_teacher_schedule(
        &self,
        teacher_id: i64,
        day_of_week: i32,
        academic_year: &str,
    ) -> Result<Vec<TimetableEntry>>;
    async fn count_students_in_classes(&self, class_ids: &[i64]) -> Result<u64>;
    // 教师布置的作业中待批改的提交数
    async fn count_pending_submissions(&self, teacher_id: i64) -> Result<u64>;
    async fn count_teachers(&self) -> Result<u64>;

    /// 班级管理方法
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn list_classes(&self, academic_year: &str) -> Result<Vec<Class>>;
    async fn count_classes(&self) -> Result<u64>;

    /// 教学管理方法
    async fn list_class_timetable(
        &self,
        class_id: i64,
        academic_year: &str,
    ) -> Result<Vec<TimetableEntry>>;
    async fn list_class_homework(&self, class_id: i64, status: &str) -> Result<Vec<Homework>>;
    async fn get_homework_by_id(&self, id: i64) -> Result<Option<Homework>>;
    async fn create_homework(&self, homework: NewHomework) -> Result<Homework>;
    // 同一学生重复提交时覆盖上一次
    async fn upsert_homework_submission(
        &self,
        homework_id: i64,
        student_id: i64,
        submission: SubmitHomeworkRequest,
    ) -> Result<HomeworkSubmission>;
    async fn list_student_grades(
        &self,
        student_id: i64,
        academic_year: &str,
    ) -> Result<Vec<Grade>>;
    async fn create_grade(&self, grade: NewGrade) -> Result<Grade>;
    async fn list_subjects(&self) -> Result<Vec<Subject>>;
    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>>;
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;

    /// 考勤
    // 点名：会话 + 每个学生的记录在一个事务中写入，返回写入条数
    async fn mark_attendance(&self, batch: AttendanceBatch) -> Result<usize>;
    async fn list_student_attendance(&self, student_id: i64, limit: u64)
    -> Result<Vec<Attendance>>;
    // 日期区间 [from, to]，YYYY-MM-DD
    async fn list_student_attendance_between(
        &self,
        student_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<Attendance>>;

    /// 公告
    async fn list_announcements(&self, limit: u64) -> Result<Vec<Announcement>>;
    async fn create_announcement(&self, announcement: NewAnnouncement) -> Result<Announcement>;

    /// 收费
    async fn list_fee_structures(&self, academic_year: &str) -> Result<Vec<FeeStructure>>;
    async fn create_fee_structure(
        &self,
        structure: CreateFeeStructureRequest,
        academic_year: &str,
    ) -> Result<FeeStructure>;
    // 写入缴费并更新对应应缴费用，同一事务
    async fn record_payment(&self, payment: NewPayment) -> Result<Payment>;
    async fn list_payments(&self, limit: u64) -> Result<Vec<Payment>>;
    async fn list_student_fees(&self) -> Result<Vec<StudentFee>>;

    /// 审计日志
    async fn create_audit_log(&self, log: NewAuditLog) -> Result<()>;
    async fn list_audit_logs(&self, limit: u64) -> Result<Vec<AuditLog>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
