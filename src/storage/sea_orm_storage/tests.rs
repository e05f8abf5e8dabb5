use super::SeaOrmStorage;
use crate::entity::{attendance, attendance_sessions, student_fees, teacher_assignments, timetables};
use crate::models::{
    academic::requests::{CreateSubjectRequest, NewHomework, SubmitHomeworkRequest},
    admin::entities::NewAuditLog,
    announcements::requests::NewAnnouncement,
    attendance::{
        entities::AttendanceStatus,
        requests::{AttendanceBatch, AttendanceRecord},
    },
    classes::requests::CreateClassRequest,
    fees::{
        entities::PaymentMethod,
        requests::{CreateFeeItemRequest, CreateFeeStructureRequest, NewPayment},
    },
    students::{entities::Student, requests::NewStudentProfile},
    teachers::{entities::Teacher, requests::NewTeacherProfile},
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UserListQuery},
    },
};
use crate::utils::current_academic_year;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::with_url("sqlite::memory:")
        .await
        .expect("in-memory storage")
}

fn user_req(email: &str, role: UserRole) -> CreateUserRequest {
    CreateUserRequest {
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role,
        full_name: format!("User {email}"),
        phone: None,
    }
}

async fn class(storage: &SeaOrmStorage, grade: i32, section: &str) -> i64 {
    storage
        .create_class_impl(CreateClassRequest {
            name: format!("Grade {grade}{section}"),
            grade,
            section: Some(section.to_string()),
            academic_year: None,
            room_number: None,
            class_teacher_id: None,
        })
        .await
        .unwrap()
        .id
}

async fn student(storage: &SeaOrmStorage, email: &str, class_id: i64, roll: &str) -> Student {
    let (_, student) = storage
        .create_student_with_user_impl(
            user_req(email, UserRole::Student),
            NewStudentProfile {
                admission_number: format!("ADM-{email}"),
                roll_number: Some(roll.to_string()),
                class_id: Some(class_id),
                section: None,
                date_of_birth: "2012-05-01".to_string(),
                gender: "female".to_string(),
                blood_group: None,
                address: None,
                parent_name: None,
                parent_email: None,
                parent_phone: None,
                emergency_contact: None,
                admission_date: "2024-04-01".to_string(),
                academic_year: current_academic_year(),
            },
        )
        .await
        .unwrap();
    student
}

async fn teacher(storage: &SeaOrmStorage, email: &str) -> (User, Teacher) {
    storage
        .create_teacher_with_user_impl(
            user_req(email, UserRole::Teacher),
            NewTeacherProfile {
                employee_id: format!("EMP-{email}"),
                department: Some("Science".to_string()),
                designation: None,
                qualifications: None,
                subjects_taught: vec!["Physics".to_string()],
                experience_years: 3,
                joining_date: None,
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_student_creation_updates_class_size() {
    let storage = storage().await;
    let class_id = class(&storage, 5, "A").await;

    let s = student(&storage, "amy@school.test", class_id, "2").await;
    student(&storage, "bob@school.test", class_id, "1").await;

    assert_eq!(s.class_name.as_deref(), Some("Grade 5A"));
    let class = storage.get_class_by_id_impl(class_id).await.unwrap().unwrap();
    assert_eq!(class.total_students, 2);

    let roster = storage.list_class_students_impl(class_id).await.unwrap();
    let rolls: Vec<_> = roster.iter().map(|s| s.roll_number.clone().unwrap()).collect();
    assert_eq!(rolls, vec!["1", "2"]);
    assert_eq!(roster[0].full_name.as_deref(), Some("User bob@school.test"));
}

#[tokio::test]
async fn test_student_with_missing_class_rolls_back_user() {
    let storage = storage().await;
    let result = storage
        .create_student_with_user_impl(
            user_req("ghost@school.test", UserRole::Student),
            NewStudentProfile {
                admission_number: "ADM-1".to_string(),
                roll_number: None,
                class_id: Some(999),
                section: None,
                date_of_birth: "2012-01-01".to_string(),
                gender: "male".to_string(),
                blood_group: None,
                address: None,
                parent_name: None,
                parent_email: None,
                parent_phone: None,
                emergency_contact: None,
                admission_date: "2024-04-01".to_string(),
                academic_year: current_academic_year(),
            },
        )
        .await;

    assert!(result.is_err());
    assert!(
        storage
            .get_user_by_email_impl("ghost@school.test")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_user_soft_delete_and_role_count() {
    let storage = storage().await;
    let admin = storage
        .create_user_impl(user_req("admin@school.test", UserRole::Admin))
        .await
        .unwrap();
    storage
        .create_user_impl(user_req("t@school.test", UserRole::Teacher))
        .await
        .unwrap();

    assert!(storage.deactivate_user_impl(admin.id).await.unwrap());
    let reloaded = storage.get_user_by_id_impl(admin.id).await.unwrap().unwrap();
    assert!(!reloaded.is_active);

    assert_eq!(storage.count_users_impl(None).await.unwrap(), 2);
    assert_eq!(
        storage.count_users_impl(Some(UserRole::Teacher)).await.unwrap(),
        1
    );

    let page = storage
        .list_users_with_pagination_impl(UserListQuery {
            page: 1,
            page_size: 1,
            role: None,
        })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.pagination.total, 2);
    assert_eq!(page.pagination.total_pages, 2);

    assert!(storage.update_last_login_impl(admin.id).await.unwrap());
    let reloaded = storage.get_user_by_id_impl(admin.id).await.unwrap().unwrap();
    assert!(reloaded.last_login_at.is_some());
}

#[tokio::test]
async fn test_mark_attendance_upserts_records_and_session() {
    let storage = storage().await;
    let class_id = class(&storage, 6, "B").await;
    let s1 = student(&storage, "s1@school.test", class_id, "1").await;
    let s2 = student(&storage, "s2@school.test", class_id, "2").await;
    let (teacher_user, _) = teacher(&storage, "teach@school.test").await;

    let batch = |status: AttendanceStatus, photo: &str| AttendanceBatch {
        class_id,
        date: "2025-06-02".to_string(),
        marked_by: teacher_user.id,
        photo_url: Some(photo.to_string()),
        records: vec![
            AttendanceRecord {
                student_id: s1.id,
                status,
                remarks: None,
            },
            AttendanceRecord {
                student_id: s2.id,
                status: AttendanceStatus::Present,
                remarks: Some("on time".to_string()),
            },
        ],
    };

    let written = storage
        .mark_attendance_impl(batch(AttendanceStatus::Absent, "/uploads/a.jpg"))
        .await
        .unwrap();
    assert_eq!(written, 2);

    // 同一天再次点名覆盖状态与照片
    storage
        .mark_attendance_impl(batch(AttendanceStatus::Late, "/uploads/b.jpg"))
        .await
        .unwrap();

    let records = storage.list_student_attendance_impl(s1.id, 30).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, AttendanceStatus::Late);
    assert_eq!(records[0].marked_by, Some(teacher_user.id));

    let sessions = attendance_sessions::Entity::find().all(&storage.db).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].photo_url.as_deref(), Some("/uploads/b.jpg"));

    let june = storage
        .list_student_attendance_between_impl(s2.id, "2025-06-01", "2025-06-30")
        .await
        .unwrap();
    assert_eq!(june.len(), 1);
    let may = storage
        .list_student_attendance_between_impl(s2.id, "2025-05-01", "2025-05-31")
        .await
        .unwrap();
    assert!(may.is_empty());
}

#[tokio::test]
async fn test_mark_attendance_is_atomic() {
    let storage = storage().await;
    let class_id = class(&storage, 7, "C").await;
    let s1 = student(&storage, "ok@school.test", class_id, "1").await;
    let (teacher_user, _) = teacher(&storage, "t2@school.test").await;

    let result = storage
        .mark_attendance_impl(AttendanceBatch {
            class_id,
            date: "2025-06-03".to_string(),
            marked_by: teacher_user.id,
            photo_url: Some("/uploads/class.jpg".to_string()),
            records: vec![
                AttendanceRecord {
                    student_id: s1.id,
                    status: AttendanceStatus::Present,
                    remarks: None,
                },
                // 不存在的学生触发外键错误
                AttendanceRecord {
                    student_id: 424242,
                    status: AttendanceStatus::Present,
                    remarks: None,
                },
            ],
        })
        .await;

    assert!(result.is_err());
    assert_eq!(attendance::Entity::find().count(&storage.db).await.unwrap(), 0);
    assert_eq!(
        attendance_sessions::Entity::find().count(&storage.db).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_mark_attendance_without_photo_skips_session() {
    let storage = storage().await;
    let class_id = class(&storage, 8, "A").await;
    let s1 = student(&storage, "np@school.test", class_id, "1").await;
    let (teacher_user, _) = teacher(&storage, "t3@school.test").await;

    storage
        .mark_attendance_impl(AttendanceBatch {
            class_id,
            date: "2025-06-04".to_string(),
            marked_by: teacher_user.id,
            photo_url: None,
            records: vec![AttendanceRecord {
                student_id: s1.id,
                status: AttendanceStatus::Excused,
                remarks: None,
            }],
        })
        .await
        .unwrap();

    assert_eq!(
        attendance_sessions::Entity::find().count(&storage.db).await.unwrap(),
        0
    );
}

async fn student_fee(storage: &SeaOrmStorage, student_id: i64, amount: f64, paid: f64) -> i64 {
    let structure = storage
        .create_fee_structure_impl(
            CreateFeeStructureRequest {
                name: "Tuition".to_string(),
                description: None,
                applicable_grades: vec![5],
                academic_year: None,
                items: vec![CreateFeeItemRequest {
                    name: "Term fee".to_string(),
                    amount,
                    frequency: "monthly".to_string(),
                    is_optional: false,
                    due_day: 10,
                }],
            },
            &current_academic_year(),
        )
        .await
        .unwrap();
    let now = chrono::Utc::now().timestamp();
    student_fees::ActiveModel {
        student_id: Set(student_id),
        fee_item_id: Set(structure.items[0].id),
        amount: Set(amount),
        due_date: Set("2025-04-10".to_string()),
        status: Set("partial".to_string()),
        paid_amount: Set(paid),
        waiver_amount: Set(0.0),
        waiver_reason: Set(None),
        academic_year: Set(current_academic_year()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&storage.db)
    .await
    .unwrap()
    .id
}

fn payment(student_id: i64, fee_id: Option<i64>, amount: f64, collector: i64) -> NewPayment {
    NewPayment {
        student_id,
        student_fee_id: fee_id,
        amount,
        payment_method: PaymentMethod::Cash,
        transaction_id: None,
        notes: None,
        collected_by: collector,
        receipt_number: format!("RCP-20250601-{}", fee_id.unwrap_or(0) + amount as i64),
    }
}

#[tokio::test]
async fn test_payment_settles_fee() {
    let storage = storage().await;
    let class_id = class(&storage, 5, "A").await;
    let s = student(&storage, "payer@school.test", class_id, "1").await;
    let admin = storage
        .create_user_impl(user_req("bursar@school.test", UserRole::Admin))
        .await
        .unwrap();
    let fee_id = student_fee(&storage, s.id, 1000.0, 600.0).await;

    let recorded = storage
        .record_payment_impl(payment(s.id, Some(fee_id), 500.0, admin.id))
        .await
        .unwrap();
    assert_eq!(recorded.status, "completed");
    assert_eq!(recorded.collected_by, Some(admin.id));

    let fee = student_fees::Entity::find_by_id(fee_id)
        .one(&storage.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fee.paid_amount, 1100.0);
    assert_eq!(fee.status, "paid");

    let payments = storage.list_payments_impl(50).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(
        payments[0].student_name.as_deref(),
        Some("User payer@school.test")
    );
}

#[tokio::test]
async fn test_payment_partial_and_rejections() {
    let storage = storage().await;
    let class_id = class(&storage, 5, "A").await;
    let s = student(&storage, "partial@school.test", class_id, "1").await;
    let other = student(&storage, "other@school.test", class_id, "2").await;
    let admin = storage
        .create_user_impl(user_req("cashier@school.test", UserRole::Admin))
        .await
        .unwrap();
    let fee_id = student_fee(&storage, s.id, 1000.0, 0.0).await;

    storage
        .record_payment_impl(payment(s.id, Some(fee_id), 300.0, admin.id))
        .await
        .unwrap();
    let fee = student_fees::Entity::find_by_id(fee_id)
        .one(&storage.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fee.status, "partial");

    let missing = storage
        .record_payment_impl(payment(s.id, Some(9999), 100.0, admin.id))
        .await
        .unwrap_err();
    assert!(missing.is_not_found());

    let negative = storage
        .record_payment_impl(payment(s.id, Some(fee_id), 0.0, admin.id))
        .await
        .unwrap_err();
    assert_eq!(negative.status_code(), actix_web::http::StatusCode::BAD_REQUEST);

    let foreign = storage
        .record_payment_impl(payment(other.id, Some(fee_id), 50.0, admin.id))
        .await
        .unwrap_err();
    assert_eq!(foreign.status_code(), actix_web::http::StatusCode::BAD_REQUEST);

    // 失败的缴费不落库
    assert_eq!(storage.list_payments_impl(50).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_teacher_dashboard_queries() {
    let storage = storage().await;
    let year = current_academic_year();
    let class_b = class(&storage, 9, "B").await;
    let class_a = class(&storage, 9, "A").await;
    let s1 = student(&storage, "d1@school.test", class_a, "1").await;
    student(&storage, "d2@school.test", class_b, "1").await;
    let (_, t) = teacher(&storage, "dash@school.test").await;
    let subject = storage
        .create_subject_impl(CreateSubjectRequest {
            name: "Physics".to_string(),
            code: "PHY".to_string(),
            description: None,
            grade_levels: vec![9],
            credits: 2,
            is_optional: false,
        })
        .await
        .unwrap();

    let now = chrono::Utc::now().timestamp();
    for class_id in [class_b, class_a] {
        teacher_assignments::ActiveModel {
            teacher_id: Set(t.id),
            class_id: Set(class_id),
            subject_id: Set(Some(subject.id)),
            is_class_teacher: Set(false),
            academic_year: Set(year.clone()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .unwrap();
    }
    for period in [3, 1] {
        timetables::ActiveModel {
            class_id: Set(class_a),
            day_of_week: Set(2),
            period_number: Set(period),
            subject_id: Set(Some(subject.id)),
            teacher_id: Set(Some(t.id)),
            start_time: Set("09:00".to_string()),
            end_time: Set("09:45".to_string()),
            room_number: Set(None),
            academic_year: Set(year.clone()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .unwrap();
    }

    let assignments = storage
        .list_teacher_assignments_impl(t.id, &year)
        .await
        .unwrap();
    let names: Vec<_> = assignments
        .iter()
        .map(|a| a.class_name.clone().unwrap())
        .collect();
    assert_eq!(names, vec!["Grade 9A", "Grade 9B"]);
    assert_eq!(assignments[0].subject_name.as_deref(), Some("Physics"));

    let schedule = storage
        .list_teacher_schedule_impl(t.id, 2, &year)
        .await
        .unwrap();
    let periods: Vec<_> = schedule.iter().map(|e| e.period_number).collect();
    assert_eq!(periods, vec![1, 3]);
    assert!(
        storage
            .list_teacher_schedule_impl(t.id, 3, &year)
            .await
            .unwrap()
            .is_empty()
    );

    assert_eq!(
        storage
            .count_students_in_classes_impl(&[class_a, class_b])
            .await
            .unwrap(),
        2
    );
    assert_eq!(storage.count_students_in_classes_impl(&[]).await.unwrap(), 0);

    let hw = storage
        .create_homework_impl(NewHomework {
            title: "Forces".to_string(),
            description: None,
            class_id: class_a,
            subject_id: Some(subject.id),
            teacher_id: t.id,
            due_date: now + 86400,
            max_marks: 100,
            attachments: vec![],
        })
        .await
        .unwrap();
    assert_eq!(hw.status, "active");

    for text in ["draft", "final"] {
        storage
            .upsert_homework_submission_impl(
                hw.id,
                s1.id,
                SubmitHomeworkRequest {
                    submission_text: Some(text.to_string()),
                    attachments: vec![],
                },
            )
            .await
            .unwrap();
    }
    assert_eq!(storage.count_pending_submissions_impl(t.id).await.unwrap(), 1);

    let active = storage.list_class_homework_impl(class_a, "active").await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].subject_name.as_deref(), Some("Physics"));
}

#[tokio::test]
async fn test_announcements_skip_expired_and_pin_first() {
    let storage = storage().await;
    let author = storage
        .create_user_impl(user_req("news@school.test", UserRole::Teacher))
        .await
        .unwrap();
    let now = chrono::Utc::now().timestamp();

    for (title, pinned, expires_at) in [
        ("old news", false, Some(now - 60)),
        ("regular", false, None),
        ("pinned", true, Some(now + 3600)),
    ] {
        storage
            .create_announcement_impl(NewAnnouncement {
                title: title.to_string(),
                content: "body".to_string(),
                author_id: author.id,
                target_type: "all".to_string(),
                target_id: None,
                priority: "normal".to_string(),
                is_pinned: pinned,
                expires_at,
            })
            .await
            .unwrap();
    }

    let list = storage.list_announcements_impl(20).await.unwrap();
    let titles: Vec<_> = list.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["pinned", "regular"]);
    assert_eq!(list[0].author_name.as_deref(), Some("User news@school.test"));
}

#[tokio::test]
async fn test_audit_log_falls_back_to_system() {
    let storage = storage().await;
    storage
        .create_audit_log_impl(NewAuditLog {
            action: "create".to_string(),
            entity_type: "class".to_string(),
            entity_id: Some(1),
            new_values: Some(serde_json::json!({"name": "Grade 1A"})),
            ..Default::default()
        })
        .await
        .unwrap();

    let logs = storage.list_audit_logs_impl(100).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].user_name, "System");
    assert_eq!(
        logs[0].new_values,
        Some(serde_json::json!({"name": "Grade 1A"}))
    );
}
