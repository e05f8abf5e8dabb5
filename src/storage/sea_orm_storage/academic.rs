use super::{SeaOrmStorage, encode_json_list};
use crate::entity::grades::{self, Entity as Grades};
use crate::entity::homework::{self, Entity as Homework};
use crate::entity::homework_submissions::{self, Entity as HomeworkSubmissions};
use crate::entity::subjects::{self, Entity as Subjects};
use crate::entity::timetables::{self, Entity as Timetables};
use crate::errors::{Result, SchoolSystemError};
use crate::models::academic::{
    entities::{
        Grade, Homework as HomeworkView, HomeworkSubmission, Subject, TimetableEntry,
    },
    requests::{CreateSubjectRequest, NewGrade, NewHomework, SubmitHomeworkRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};

impl SeaOrmStorage {
    /// 班级课表，按星期、节次排序
    pub async fn list_class_timetable_impl(
        &self,
        class_id: i64,
        academic_year: &str,
    ) -> Result<Vec<TimetableEntry>> {
        let rows = Timetables::find()
            .filter(timetables::Column::ClassId.eq(class_id))
            .filter(timetables::Column::AcademicYear.eq(academic_year))
            .order_by_asc(timetables::Column::DayOfWeek)
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

    /// 班级作业，按截止时间倒序
    pub async fn list_class_homework_impl(
        &self,
        class_id: i64,
        status: &str,
    ) -> Result<Vec<HomeworkView>> {
        let rows = Homework::find()
            .filter(homework::Column::ClassId.eq(class_id))
            .filter(homework::Column::Status.eq(status))
            .order_by_desc(homework::Column::DueDate)
            .find_also_related(Subjects)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(hw, subject)| hw.into_homework(subject))
            .collect())
    }

    pub async fn get_homework_by_id_impl(&self, id: i64) -> Result<Option<HomeworkView>> {
        let result = Homework::find_by_id(id)
            .find_also_related(Subjects)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|(hw, subject)| hw.into_homework(subject)))
    }

    /// 布置作业，状态为 active
    pub async fn create_homework_impl(&self, req: NewHomework) -> Result<HomeworkView> {
        let now = chrono::Utc::now().timestamp();

        let model = homework::ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            teacher_id: Set(req.teacher_id),
            due_date: Set(req.due_date),
            max_marks: Set(req.max_marks),
            attachments: Set(encode_json_list(&req.attachments)),
            status: Set("active".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_homework(None))
    }

    /// 提交作业；同一学生再次提交时覆盖内容和时间
    pub async fn upsert_homework_submission_impl(
        &self,
        homework_id: i64,
        student_id: i64,
        req: SubmitHomeworkRequest,
    ) -> Result<HomeworkSubmission> {
        let now = chrono::Utc::now().timestamp();

        let model = homework_submissions::ActiveModel {
            homework_id: Set(homework_id),
            student_id: Set(student_id),
            submission_text: Set(req.submission_text),
            attachments: Set(encode_json_list(&req.attachments)),
            submitted_at: Set(now),
            marks_obtained: Set(None),
            feedback: Set(None),
            graded_by: Set(None),
            graded_at: Set(None),
            status: Set("submitted".to_string()),
            ..Default::default()
        };

        HomeworkSubmissions::insert(model)
            .on_conflict(
                OnConflict::columns([
                    homework_submissions::Column::HomeworkId,
                    homework_submissions::Column::StudentId,
                ])
                .update_columns([
                    homework_submissions::Column::SubmissionText,
                    homework_submissions::Column::Attachments,
                    homework_submissions::Column::SubmittedAt,
                    homework_submissions::Column::Status,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交作业失败: {e}")))?;

        let saved = HomeworkSubmissions::find()
            .filter(homework_submissions::Column::HomeworkId.eq(homework_id))
            .filter(homework_submissions::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询作业提交失败: {e}")))?
            .ok_or_else(|| SchoolSystemError::database_operation("作业提交未写入"))?;

        Ok(saved.into_submission())
    }

    /// 学生某学年的成绩，按考试日期倒序
    pub async fn list_student_grades_impl(
        &self,
        student_id: i64,
        academic_year: &str,
    ) -> Result<Vec<Grade>> {
        let rows = Grades::find()
            .filter(grades::Column::StudentId.eq(student_id))
            .filter(grades::Column::AcademicYear.eq(academic_year))
            .order_by_desc(grades::Column::ExamDate)
            .order_by_desc(grades::Column::CreatedAt)
            .find_also_related(Subjects)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(grade, subject)| grade.into_grade(subject))
            .collect())
    }

    pub async fn create_grade_impl(&self, req: NewGrade) -> Result<Grade> {
        let model = grades::ActiveModel {
            student_id: Set(req.student_id),
            subject_id: Set(req.subject_id),
            exam_type: Set(req.exam_type),
            exam_name: Set(req.exam_name),
            max_marks: Set(req.max_marks),
            marks_obtained: Set(req.marks_obtained),
            grade: Set(req.grade),
            remarks: Set(req.remarks),
            graded_by: Set(Some(req.graded_by)),
            exam_date: Set(req.exam_date),
            academic_year: Set(req.academic_year),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("录入成绩失败: {e}")))?;

        Ok(result.into_grade(None))
    }

    /// 全部科目，按名称排序
    pub async fn list_subjects_impl(&self) -> Result<Vec<Subject>> {
        let rows = Subjects::find()
            .order_by_asc(subjects::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn get_subject_by_code_impl(&self, code: &str) -> Result<Option<Subject>> {
        let result = Subjects::find()
            .filter(subjects::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let model = subjects::ActiveModel {
            name: Set(req.name),
            code: Set(req.code),
            description: Set(req.description),
            grade_levels: Set(encode_json_list(&req.grade_levels)),
            credits: Set(req.credits),
            is_optional: Set(req.is_optional),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("创建科目失败: {e}")))?;

        Ok(result.into_subject())
    }
}
