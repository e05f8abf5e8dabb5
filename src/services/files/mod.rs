pub mod serve;
pub mod upload;

use actix_web::{HttpResponse, Result as ActixResult};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::errors::Result;

pub use upload::PendingUpload;

/// 上传文件的落盘与读取，根目录默认取 `upload.dir`
pub struct FileService {
    upload_dir: Option<PathBuf>,
}

impl FileService {
    pub fn new_lazy() -> Self {
        Self { upload_dir: None }
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: Some(dir.into()),
        }
    }

    pub(crate) fn upload_dir(&self) -> PathBuf {
        match &self.upload_dir {
            Some(dir) => dir.clone(),
            None => PathBuf::from(&AppConfig::get().upload.dir),
        }
    }

    // 保存到子目录，返回可访问的相对 URL
    pub async fn persist(&self, upload: PendingUpload, subdir: &str) -> Result<String> {
        upload::persist(self, upload, subdir).await
    }

    // GET /uploads/{path}
    pub async fn serve_upload(&self, path: &str) -> ActixResult<HttpResponse> {
        serve::serve_upload(self, path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_multipart::Multipart;
    use actix_web::{App, test, web};
    use futures_util::TryStreamExt;

    const BOUNDARY: &str = "----schools24boundary";

    fn multipart_body(filename: &str, data: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"photo\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("schools24-test-{}", uuid::Uuid::new_v4()))
    }

    async fn upload(dir: web::Data<PathBuf>, mut payload: Multipart) -> ActixResult<HttpResponse> {
        let service = FileService::with_dir(dir.get_ref().clone());
        let Ok(Some(mut field)) = payload.try_next().await else {
            return Ok(HttpResponse::BadRequest().finish());
        };
        let pending = match upload::read_file_field(&mut field).await {
            Ok(pending) => pending,
            Err(response) => return Ok(response),
        };
        match service.persist(pending, "2025-03").await {
            Ok(url) => Ok(HttpResponse::Ok().body(url)),
            Err(e) => Ok(HttpResponse::InternalServerError().body(e.to_string())),
        }
    }

    #[actix_web::test]
    async fn test_upload_then_serve() {
        let dir = temp_dir();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(dir.clone()))
                .route("/upload", web::post().to(upload)),
        )
        .await;

        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x01];
        let req = test::TestRequest::post()
            .uri("/upload")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body("class.PNG", &png))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let url = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(url.starts_with("/uploads/2025-03/"));
        assert!(url.ends_with(".png"));

        let service = FileService::with_dir(dir.clone());
        let relative = url.trim_start_matches("/uploads/");
        let resp = service.serve_upload(relative).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");

        let resp = service.serve_upload("2025-03/missing.png").await.unwrap();
        assert_eq!(resp.status(), 404);
        let resp = service.serve_upload("../escape.png").await.unwrap();
        assert_eq!(resp.status(), 400);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[actix_web::test]
    async fn test_upload_rejects_mismatched_content() {
        let dir = temp_dir();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(dir.clone()))
                .route("/upload", web::post().to(upload)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/upload")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body("photo.jpg", b"not really a jpeg"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let req = test::TestRequest::post()
            .uri("/upload")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body("script.exe", b"MZ\x90\x00"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        assert!(!dir.exists());
    }
}
