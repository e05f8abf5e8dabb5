//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod academic;
mod announcements;
mod attendance;
mod audit_logs;
mod classes;
mod fees;
mod students;
mod teachers;
mod users;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolSystemError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用配置中的数据库创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::with_url(&config.database.url).await
    }

    /// 使用指定 URL 创建存储实例并执行迁移
    pub async fn with_url(url: &str) -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory")
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        // 内存库只在单个连接内存在，连接不能被回收
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.database.pool_size)
                .min_connections(1)
                .test_before_acquire(true)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| {
                SchoolSystemError::database_connection(format!("SQLite 连接失败: {e}"))
            })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// JSON 数组列的编码/解码
pub(crate) fn encode_json_list<T: serde::Serialize>(values: &[T]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        serde_json::to_string(values).ok()
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| SchoolSystemError::database_connection(format!("数据库不可用: {e}")))
    }

    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn deactivate_user(&self, id: i64) -> Result<bool> {
        self.deactivate_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self, role: Option<UserRole>) -> Result<u64> {
        self.count_users_impl(role).await
    }

    // 学生模块
    async fn create_student_with_user(
        &self,
        user: CreateUserRequest,
        profile: NewStudentProfile,
    ) -> Result<(User, Student)> {
        self.create_student_with_user_impl(user, profile).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn list_class_students(&self, class_id: i64) -> Result<Vec<Student>> {
        self.list_class_students_impl(class_id).await
    }

    async fn count_students(&self) -> Result<u64> {
        self.count_students_impl().await
    }

    // 教师模块
    async fn create_teacher_with_user(
        &self,
        user: CreateUserRequest,
        profile: NewTeacherProfile,
    ) -> Result<(User, Teacher)> {
        self.create_teacher_with_user_impl(user, profile).await
    }

    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_user_id_impl(user_id).await
    }

    async fn list_teacher_assignments(
        &self,
        teacher_id: i64,
        academic_year: &str,
    ) -> Result<Vec<TeacherAssignment>> {
        self.list_teacher_assignments_impl(teacher_id, academic_year)
            .await
    }

    async fn list_teacher_schedule(
        &self,
        teacher_id: i64,
        day_of_week: i32,
        academic_year: &str,
    ) -> Result<Vec<TimetableEntry>> {
        self.list_teacher_schedule_impl(teacher_id, day_of_week, academic_year)
            .await
    }

    async fn count_students_in_classes(&self, class_ids: &[i64]) -> Result<u64> {
        self.count_students_in_classes_impl(class_ids).await
    }

    async fn count_pending_submissions(&self, teacher_id: i64) -> Result<u64> {
        self.count_pending_submissions_impl(teacher_id).await
    }

    async fn count_teachers(&self) -> Result<u64> {
        self.count_teachers_impl().await
    }

    // 班级模块
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_classes(&self, academic_year: &str) -> Result<Vec<Class>> {
        self.list_classes_impl(academic_year).await
    }

    async fn count_classes(&self) -> Result<u64> {
        self.count_classes_impl().await
    }

    // 教学模块
    async fn list_class_timetable(
        &self,
        class_id: i64,
        academic_year: &str,
    ) -> Result<Vec<TimetableEntry>> {
        self.list_class_timetable_impl(class_id, academic_year)
            .await
    }

    async fn list_class_homework(&self, class_id: i64, status: &str) -> Result<Vec<Homework>> {
        self.list_class_homework_impl(class_id, status).await
    }

    async fn get_homework_by_id(&self, id: i64) -> Result<Option<Homework>> {
        self.get_homework_by_id_impl(id).await
    }

    async fn create_homework(&self, homework: NewHomework) -> Result<Homework> {
        self.create_homework_impl(homework).await
    }

    async fn upsert_homework_submission(
        &self,
        homework_id: i64,
        student_id: i64,
        submission: SubmitHomeworkRequest,
    ) -> Result<HomeworkSubmission> {
        self.upsert_homework_submission_impl(homework_id, student_id, submission)
            .await
    }

    async fn list_student_grades(
        &self,
        student_id: i64,
        academic_year: &str,
    ) -> Result<Vec<Grade>> {
        self.list_student_grades_impl(student_id, academic_year)
            .await
    }

    async fn create_grade(&self, grade: NewGrade) -> Result<Grade> {
        self.create_grade_impl(grade).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.list_subjects_impl().await
    }

    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>> {
        self.get_subject_by_code_impl(code).await
    }

    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    // 考勤模块
    async fn mark_attendance(&self, batch: AttendanceBatch) -> Result<usize> {
        self.mark_attendance_impl(batch).await
    }

    async fn list_student_attendance(
        &self,
        student_id: i64,
        limit: u64,
    ) -> Result<Vec<Attendance>> {
        self.list_student_attendance_impl(student_id, limit).await
    }

    async fn list_student_attendance_between(
        &self,
        student_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<Attendance>> {
        self.list_student_attendance_between_impl(student_id, from, to)
            .await
    }

    // 公告模块
    async fn list_announcements(&self, limit: u64) -> Result<Vec<Announcement>> {
        self.list_announcements_impl(limit).await
    }

    async fn create_announcement(&self, announcement: NewAnnouncement) -> Result<Announcement> {
        self.create_announcement_impl(announcement).await
    }

    // 收费模块
    async fn list_fee_structures(&self, academic_year: &str) -> Result<Vec<FeeStructure>> {
        self.list_fee_structures_impl(academic_year).await
    }

    async fn create_fee_structure(
        &self,
        structure: CreateFeeStructureRequest,
        academic_year: &str,
    ) -> Result<FeeStructure> {
        self.create_fee_structure_impl(structure, academic_year)
            .await
    }

    async fn record_payment(&self, payment: NewPayment) -> Result<Payment> {
        self.record_payment_impl(payment).await
    }

    async fn list_payments(&self, limit: u64) -> Result<Vec<Payment>> {
        self.list_payments_impl(limit).await
    }

    async fn list_student_fees(&self) -> Result<Vec<StudentFee>> {
        self.list_student_fees_impl().await
    }

    // 审计日志
    async fn create_audit_log(&self, log: NewAuditLog) -> Result<()> {
        self.create_audit_log_impl(log).await
    }

    async fn list_audit_logs(&self, limit: u64) -> Result<Vec<AuditLog>> {
        self.list_audit_logs_impl(limit).await
    }
}
