use super::SeaOrmStorage;
use super::users::insert_user;
use crate::entity::classes::{self, Entity as Classes};
use crate::entity::students::{ActiveModel, Column, Entity as Students, Model};
use crate::entity::users::{self, Entity as Users};
use crate::errors::{Result, SchoolSystemError};
use crate::models::{
    students::{entities::Student, requests::NewStudentProfile},
    users::{entities::User, requests::CreateUserRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建学生账号与档案；任一步失败整体回滚
    pub async fn create_student_with_user_impl(
        &self,
        user: CreateUserRequest,
        profile: NewStudentProfile,
    ) -> Result<(User, Student)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let user_model = insert_user(&txn, user).await?;
        let now = chrono::Utc::now().timestamp();

        let student = ActiveModel {
            user_id: Set(user_model.id),
            admission_number: Set(profile.admission_number),
            roll_number: Set(profile.roll_number),
            class_id: Set(profile.class_id),
            section: Set(profile.section),
            date_of_birth: Set(profile.date_of_birth),
            gender: Set(profile.gender),
            blood_group: Set(profile.blood_group),
            address: Set(profile.address),
            parent_name: Set(profile.parent_name),
            parent_email: Set(profile.parent_email),
            parent_phone: Set(profile.parent_phone),
            emergency_contact: Set(profile.emergency_contact),
            admission_date: Set(profile.admission_date),
            academic_year: Set(profile.academic_year),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("创建学生档案失败: {e}")))?;

        // 班级人数 +1
        let mut class_name = None;
        if let Some(class_id) = student.class_id {
            let class = Classes::find_by_id(class_id)
                .one(&txn)
                .await
                .map_err(|e| SchoolSystemError::database_operation(format!("查询班级失败: {e}")))?
                .ok_or_else(|| SchoolSystemError::not_found(format!("班级不存在: {class_id}")))?;
            class_name = Some(class.name.clone());
            let total = class.total_students;
            let mut active: classes::ActiveModel = class.into();
            active.total_students = Set(total + 1);
            active.updated_at = Set(now);
            active.update(&txn).await.map_err(|e| {
                SchoolSystemError::database_operation(format!("更新班级人数失败: {e}"))
            })?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        let mut created = student.into_student(Some(user_model.clone()));
        created.class_name = class_name;
        Ok((user_model.into_user(), created))
    }

    /// 通过学生 ID 获取档案
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;

        match result {
            Some((student, user)) => Ok(Some(with_class_name(&self.db, student, user).await?)),
            None => Ok(None),
        }
    }

    /// 通过用户 ID 获取学生档案（附带姓名、邮箱和班级名）
    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;

        match result {
            Some((student, user)) => Ok(Some(with_class_name(&self.db, student, user).await?)),
            None => Ok(None),
        }
    }

    /// 班级中的在读学生，按学号排序
    pub async fn list_class_students_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let rows = Students::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::RollNumber)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| {
                SchoolSystemError::database_operation(format!("查询班级学生失败: {e}"))
            })?;

        Ok(rows
            .into_iter()
            .map(|(student, user)| student.into_student(user))
            .collect())
    }

    pub async fn count_students_impl(&self) -> Result<u64> {
        Students::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计学生数量失败: {e}")))
    }
}

async fn with_class_name<C: ConnectionTrait>(
    conn: &C,
    student: Model,
    user: Option<users::Model>,
) -> Result<Student> {
    let class_name = match student.class_id {
        Some(class_id) => Classes::find_by_id(class_id)
            .one(conn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询班级失败: {e}")))?
            .map(|c| c.name),
        None => None,
    };
    let mut student = student.into_student(user);
    student.class_name = class_name;
    Ok(student)
}
