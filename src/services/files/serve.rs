use actix_web::{HttpResponse, Result as ActixResult, http::header};
use std::io::ErrorKind;

use super::FileService;
use crate::errors::SchoolSystemError;
use crate::models::{ApiResponse, ErrorCode};

/// 只允许上传目录内的相对路径
pub(crate) fn is_safe_relative_path(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && !path.contains('\0')
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

fn content_type_for(path: &str) -> &'static str {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

pub async fn serve_upload(service: &FileService, path: &str) -> ActixResult<HttpResponse> {
    if !is_safe_relative_path(path) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, "Invalid file path")));
    }

    let full_path = service.upload_dir().join(path);
    match tokio::fs::read(&full_path).await {
        Ok(buf) => Ok(HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, content_type_for(path)))
            .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
            .body(buf)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::FileNotFound, "File not found"))),
        Err(e) => {
            tracing::error!("{}", SchoolSystemError::file_operation(format!("{e}")));
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "File read failed",
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_paths() {
        assert!(is_safe_relative_path("2025-03/abc.jpg"));
        assert!(!is_safe_relative_path("../etc/passwd"));
        assert!(!is_safe_relative_path("2025-03/../../secret"));
        assert!(!is_safe_relative_path("/etc/passwd"));
        assert!(!is_safe_relative_path("a//b.png"));
        assert!(!is_safe_relative_path(""));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for("x/photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("x/blob"), "application/octet-stream");
    }
}
