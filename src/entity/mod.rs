//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod announcements;
pub mod attendance;
pub mod attendance_sessions;
pub mod audit_logs;
pub mod classes;
pub mod fee_items;
pub mod fee_structures;
pub mod grades;
pub mod homework;
pub mod homework_submissions;
pub mod payments;
pub mod student_fees;
pub mod students;
pub mod subjects;
pub mod teacher_assignments;
pub mod teachers;
pub mod timetables;
pub mod users;
