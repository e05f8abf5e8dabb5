pub mod academic;

pub mod admin;

pub mod announcements;

pub mod auth;

pub mod classes;

pub mod health;

pub mod students;

pub mod teachers;

pub use academic::configure_academic_routes;
pub use admin::configure_admin_routes;
pub use announcements::configure_announcement_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use health::configure_health_routes;
pub use students::configure_student_routes;
pub use teachers::configure_teacher_routes;

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};
    use std::sync::Arc;

    use super::*;
    use crate::middlewares::RequireJWT;
    use crate::models::AppStartTime;
    use crate::runtime::lifetime::startup::{DEFAULT_ADMIN_EMAIL, seed_admin_with_password};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::utils::jwt::JwtUtils;

    async fn memory_storage() -> Arc<dyn Storage> {
        Arc::new(
            SeaOrmStorage::with_url("sqlite::memory:")
                .await
                .expect("in-memory storage"),
        )
    }

    macro_rules! school_app {
        ($storage:expr) => {
            test::init_service(
                App::new()
                    .wrap(RequireJWT)
                    .app_data(web::Data::new($storage.clone()))
                    .app_data(web::Data::new(AppStartTime {
                        start_datetime: chrono::Utc::now(),
                    }))
                    .configure(configure_health_routes)
                    .configure(configure_auth_routes)
                    .configure(configure_student_routes)
                    .configure(configure_teacher_routes)
                    .configure(configure_classes_routes)
                    .configure(configure_academic_routes)
                    .configure(configure_announcement_routes)
                    .configure(configure_admin_routes),
            )
            .await
        };
    }

    fn bearer(user_id: i64, email: &str, role: &str) -> (&'static str, String) {
        let tokens = JwtUtils::generate_token_pair(user_id, email, role).unwrap();
        ("Authorization", format!("Bearer {}", tokens.access_token))
    }

    #[actix_web::test]
    async fn test_health_and_ready_are_public() {
        let storage = memory_storage().await;
        let app = school_app!(storage);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "schools24-backend");

        let req = test::TestRequest::get().uri("/ready").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["ready"], true);
    }

    #[actix_web::test]
    async fn test_compressed_cache_is_the_only_cache_registered() {
        use crate::cache::CompressedCache;
        use crate::cache::object_cache::moka::MokaCacheWrapper;

        let storage = memory_storage().await;
        let compressed = CompressedCache::new(Arc::new(MokaCacheWrapper::with_capacity(100, 60)));
        let app = test::init_service(
            App::new()
                .wrap(RequireJWT)
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(compressed.clone()))
                .configure(configure_health_routes)
                .configure(configure_academic_routes),
        )
        .await;
        let student = bearer(7, "pupil@school.edu", "student");

        for _ in 0..2 {
            let req = test::TestRequest::get()
                .uri("/api/v1/academic/subjects")
                .insert_header(student.clone())
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["cache"]["misses"], 1);
        assert_eq!(body["cache"]["hits"], 1);
    }

    #[actix_web::test]
    async fn test_protected_routes_require_token() {
        let storage = memory_storage().await;
        let app = school_app!(storage);

        for uri in [
            "/api/v1/auth/me",
            "/api/v1/student/dashboard",
            "/api/v1/teacher/dashboard",
            "/api/v1/admin/dashboard",
            "/api/v1/announcements",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/dashboard")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_role_gates() {
        let storage = memory_storage().await;
        let app = school_app!(storage);
        let student = bearer(41, "pupil@school.edu", "student");

        for uri in ["/api/v1/admin/dashboard", "/api/v1/teacher/dashboard"] {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header(student.clone())
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{uri}");
        }

        // 只有管理员能建班
        let req = test::TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(student.clone())
            .set_json(json!({"name": "Class 5", "grade": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // 教师角色通过了角色检查，但没有教师档案
        let teacher = bearer(42, "staff@school.edu", "teacher");
        let req = test::TestRequest::get()
            .uri("/api/v1/teacher/profile")
            .insert_header(teacher)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_teacher_login_issues_role_claim() {
        use crate::config::AppConfig;
        use crate::models::users::entities::UserRole;
        use crate::models::users::requests::CreateUserRequest;
        use crate::utils::password::hash_password;

        let storage = memory_storage().await;
        storage
            .create_user(CreateUserRequest {
                email: "meera@school.edu".to_string(),
                password_hash: hash_password("chalk-dust").unwrap(),
                role: UserRole::Teacher,
                full_name: "Meera Iyer".to_string(),
                phone: None,
            })
            .await
            .unwrap();
        let app = school_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "meera@school.edu", "password": "wrong-pass"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "Meera@School.edu", "password": "chalk-dust"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;

        let token = body["data"]["access_token"].as_str().expect("access token");
        let claims = JwtUtils::verify_token(token).unwrap();
        assert_eq!(claims.role, "teacher");
        assert_eq!(
            claims.exp - claims.iat,
            AppConfig::get().jwt.expiration_hours * 3600
        );
    }

    #[actix_web::test]
    async fn test_admin_enrolls_student_and_records_payment() {
        let storage = memory_storage().await;
        seed_admin_with_password(&storage, "admin-pass")
            .await
            .expect("admin seeded");
        let app = school_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": DEFAULT_ADMIN_EMAIL, "password": "admin-pass"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let token = body["data"]["access_token"]
            .as_str()
            .expect("access token")
            .to_string();
        let auth = ("Authorization", format!("Bearer {token}"));

        let req = test::TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(auth.clone())
            .set_json(json!({"name": "Class 7-A", "grade": 7, "section": "A"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let class_id = body["data"]["id"].as_i64().expect("class id");

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/students")
            .insert_header(auth.clone())
            .set_json(json!({
                "email": "Asha@School.edu",
                "password": "asha-pass",
                "full_name": "Asha Rao",
                "admission_number": "ADM-0007",
                "class_id": class_id,
                "date_of_birth": "2012-04-18",
                "gender": "female"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let user_id = body["data"]["user_id"].as_i64().expect("user id");

        let student = storage
            .get_student_by_user_id(user_id)
            .await
            .unwrap()
            .expect("student profile");
        assert_eq!(student.class_id, Some(class_id));

        // 同一邮箱不能重复建档
        let req = test::TestRequest::post()
            .uri("/api/v1/admin/students")
            .insert_header(auth.clone())
            .set_json(json!({
                "email": "asha@school.edu",
                "password": "asha-pass",
                "full_name": "Asha Rao",
                "admission_number": "ADM-0008",
                "date_of_birth": "2012-04-18",
                "gender": "female"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/payments")
            .insert_header(auth.clone())
            .set_json(json!({
                "student_id": student.id,
                "amount": 0,
                "payment_method": "cash"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/payments")
            .insert_header(auth.clone())
            .set_json(json!({
                "student_id": student.id,
                "amount": 1500.0,
                "payment_method": "upi",
                "transaction_id": "UPI-991"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert!(
            body["data"]["receipt_number"]
                .as_str()
                .is_some_and(|r| r.starts_with("RCP-"))
        );

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/audit-logs")
            .insert_header(auth)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let actions: Vec<&str> = body["data"]
            .as_array()
            .expect("audit log list")
            .iter()
            .filter_map(|log| log["entity_type"].as_str())
            .collect();
        assert!(actions.contains(&"class"));
        assert!(actions.contains(&"student"));
        assert!(actions.contains(&"payment"));
    }
}
