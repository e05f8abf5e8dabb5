//! 预导入模块，方便使用

pub use super::announcements::Entity as Announcements;
pub use super::attendance::Entity as Attendance;
pub use super::attendance_sessions::Entity as AttendanceSessions;
pub use super::audit_logs::Entity as AuditLogs;
pub use super::classes::Entity as Classes;
pub use super::fee_items::Entity as FeeItems;
pub use super::fee_structures::Entity as FeeStructures;
pub use super::grades::Entity as Grades;
pub use super::homework::Entity as Homework;
pub use super::homework_submissions::Entity as HomeworkSubmissions;
pub use super::payments::Entity as Payments;
pub use super::student_fees::Entity as StudentFees;
pub use super::students::Entity as Students;
pub use super::subjects::Entity as Subjects;
pub use super::teacher_assignments::Entity as TeacherAssignments;
pub use super::teachers::Entity as Teachers;
pub use super::timetables::Entity as Timetables;
pub use super::users::Entity as Users;
