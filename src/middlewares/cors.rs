use actix_cors::Cors;

use crate::config::CorsConfig;

/// 按配置构建 CORS。来源列表含 `*` 时放行任意来源
pub fn build_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(config.allowed_methods.iter().map(String::as_str))
        .allowed_headers(config.allowed_headers.iter().map(String::as_str))
        .supports_credentials()
        .max_age(config.max_age);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};

    fn config(origins: &[&str]) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
            allowed_methods: vec!["GET".into(), "POST".into()],
            allowed_headers: vec!["Content-Type".into(), "Authorization".into()],
            max_age: 600,
        }
    }

    #[actix_web::test]
    async fn test_configured_origin_allowed() {
        let app = test::init_service(
            App::new()
                .wrap(build_cors(&config(&["http://localhost:3000"])))
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/ping")
            .insert_header(("Origin", "http://localhost:3000"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:3000"
        );

        let req = test::TestRequest::get()
            .uri("/ping")
            .insert_header(("Origin", "http://evil.example"))
            .to_request();
        // 不在白名单的来源要么被拒绝，要么不带 CORS 头
        if let Ok(resp) = test::try_call_service(&app, req).await {
            assert!(resp.headers().get("access-control-allow-origin").is_none());
        }
    }
}
