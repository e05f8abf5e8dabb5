use std::collections::HashMap;

use super::users::insert_user;
use super::{SeaOrmStorage, encode_json_list};
use crate::entity::classes::Entity as Classes;
use crate::entity::homework::{self, Entity as Homework};
use crate::entity::homework_submissions::{self, Entity as HomeworkSubmissions};
use crate::entity::students::{self, Entity as Students};
use crate::entity::subjects::{self, Entity as Subjects};
use crate::entity::teacher_assignments::{self, Entity as TeacherAssignments};
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers};
use crate::entity::timetables::{self, Entity as Timetables};
use crate::entity::users::Entity as Users;
use crate::errors::{Result, SchoolSystemError};
use crate::models::{
    academic::entities::TimetableEntry,
    teachers::{
        entities::{Teacher, TeacherAssignment},
        requests::NewTeacherProfile,
    },
    users::{entities::User, requests::CreateUserRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建教师账号与档案，同一事务
    pub async fn create_teacher_with_user_impl(
        &self,
        user: CreateUserRequest,
        profile: NewTeacherProfile,
    ) -> Result<(User, Teacher)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let user_model = insert_user(&txn, user).await?;
        let now = chrono::Utc::now().timestamp();

        let teacher = ActiveModel {
            user_id: Set(user_model.id),
            employee_id: Set(profile.employee_id),
            department: Set(profile.department),
            designation: Set(profile.designation),
            qualifications: Set(profile.qualifications),
            subjects_taught: Set(encode_json_list(&profile.subjects_taught)),
            experience_years: Set(profile.experience_years),
            joining_date: Set(profile.joining_date),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("创建教师档案失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        let created = teacher.into_teacher(Some(user_model.clone()));
        Ok((user_model.into_user(), created))
    }

    /// 通过用户 ID 获取在职教师档案
    pub async fn get_teacher_by_user_id_impl(&self, user_id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsActive.eq(true))
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|(teacher, user)| teacher.into_teacher(user)))
    }

    pub async fn list_teacher_assignments_impl(
        &self,
        teacher_id: i64,
        academic_year: &str,
    ) -> Result<Vec<TeacherAssignment>> {
        let rows = TeacherAssignments::find()
            .filter(teacher_assignments::Column::TeacherId.eq(teacher_id))
            .filter(teacher_assignments::Column::AcademicYear.eq(academic_year))
            .find_also_related(Classes)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询任课信息失败: {e}")))?;

        let subject_ids: Vec<i64> = rows.iter().filter_map(|(a, _)| a.subject_id).collect();
        let subject_names = self.subject_names(&subject_ids).await?;

        let mut rows = rows;
        rows.sort_by(|(_, a), (_, b)| {
            let key = |c: &Option<crate::entity::classes::Model>| {
                c.as_ref().map(|c| (c.grade, c.section.clone()))
            };
            key(a).cmp(&key(b))
        });

        Ok(rows
            .into_iter()
            .map(|(assignment, class)| {
                let subject_name = assignment
                    .subject_id
                    .and_then(|id| subject_names.get(&id).cloned());
                assignment.into_assignment(class.map(|c| c.name), subject_name)
            })
            .collect())
    }

    /// 教师某天的课表
    pub async fn list_teacher_schedule_impl(
        &self,
        teacher_id: i64,
        day_of_week: i32,
        academic_year: &str,
    ) -> Result<Vec<TimetableEntry>> {
        let rows = Timetables::find()
            .filter(timetables::Column::TeacherId.eq(teacher_id))
            .filter(timetables::Column::DayOfWeek.eq(day_of_week))
            .filter(timetables::Column::AcademicYear.eq(academic_year))
            .order_by_asc(timetables::Column::PeriodNumber)
            .find_also_related(Subjects)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(entry, subject)| entry.into_entry(subject))
            .collect())
    }

    /// 给定班级中的在读学生数
    pub async fn count_students_in_classes_impl(&self, class_ids: &[i64]) -> Result<u64> {
        if class_ids.is_empty() {
            return Ok(0);
        }

        Students::find()
            .filter(students::Column::ClassId.is_in(class_ids.to_vec()))
            .filter(students::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计学生数量失败: {e}")))
    }

    pub async fn count_pending_submissions_impl(&self, teacher_id: i64) -> Result<u64> {
        HomeworkSubmissions::find()
            .inner_join(Homework)
            .filter(homework::Column::TeacherId.eq(teacher_id))
            .filter(homework_submissions::Column::Status.eq("submitted"))
            .count(&self.db)
            .await
            .map_err(|e| {
                SchoolSystemError::database_operation(format!("统计待批改作业失败: {e}"))
            })
    }

    pub async fn count_teachers_impl(&self) -> Result<u64> {
        Teachers::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计教师数量失败: {e}")))
    }

    /// 批量查询科目名称
    pub(super) async fn subject_names(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, String)> = Subjects::find()
            .select_only()
            .column(subjects::Column::Id)
            .column(subjects::Column::Name)
            .filter(subjects::Column::Id.is_in(ids.to_vec()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(rows.into_iter().collect())
    }
}
