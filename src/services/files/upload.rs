use actix_multipart::Field;
use actix_web::HttpResponse;
use futures_util::stream::StreamExt;
use std::path::PathBuf;
use uuid::Uuid;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::{Result, SchoolSystemError};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::{normalized_extension, validate_magic_bytes};

/// 已校验、尚未落盘的上传文件
#[derive(Debug)]
pub struct PendingUpload {
    pub original_name: String,
    pub extension: String,
    pub data: Vec<u8>,
}

/// 读取文件字段：扩展名白名单、魔术字节、大小上限
pub async fn read_file_field(
    field: &mut Field,
) -> std::result::Result<PendingUpload, HttpResponse> {
    let config = AppConfig::get();
    let max_size = config.upload.max_size;

    let original_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(|s| s.to_string())
        .unwrap_or_default();

    let extension = match normalized_extension(&original_name) {
        Some(ext)
            if config
                .upload
                .allowed_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(&ext)) =>
        {
            ext
        }
        _ => {
            return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed",
            )));
        }
    };

    let mut data: Vec<u8> = Vec::new();
    let mut first_chunk = true;
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                format!("读取上传数据失败: {e}"),
            ))
        })?;

        // 第一个 chunk 时验证魔术字节
        if first_chunk {
            first_chunk = false;
            if !validate_magic_bytes(&chunk, &extension) {
                return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::FileTypeNotAllowed,
                    "文件内容与扩展名不匹配",
                )));
            }
        }

        if data.len() + chunk.len() > max_size {
            return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileSizeExceeded,
                format!("File size exceeds limit of {max_size} bytes"),
            )));
        }
        data.extend_from_slice(&chunk);
    }

    if data.is_empty() {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "Uploaded file is empty",
        )));
    }

    Ok(PendingUpload {
        original_name,
        extension,
        data,
    })
}

/// 读取普通文本字段
pub async fn read_text_field(
    field: &mut Field,
    limit: usize,
) -> std::result::Result<String, HttpResponse> {
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("读取表单字段失败: {e}"),
            ))
        })?;
        if buf.len() + chunk.len() > limit {
            return Err(HttpResponse::PayloadTooLarge().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Form field too large",
            )));
        }
        buf.extend_from_slice(&chunk);
    }

    String::from_utf8(buf).map_err(|_| {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Form field is not valid UTF-8",
        ))
    })
}

/// 写入 `<upload_dir>/<subdir>/<uuid><ext>`，返回 `/uploads/<subdir>/<uuid><ext>`
pub async fn persist(service: &FileService, upload: PendingUpload, subdir: &str) -> Result<String> {
    let dest_dir: PathBuf = service.upload_dir().join(subdir);
    tokio::fs::create_dir_all(&dest_dir).await.map_err(|e| {
        SchoolSystemError::file_operation(format!("创建上传目录失败 {}: {e}", dest_dir.display()))
    })?;

    let stored_name = format!("{}{}", Uuid::new_v4(), upload.extension);
    let dest_path = dest_dir.join(&stored_name);
    tokio::fs::write(&dest_path, &upload.data)
        .await
        .map_err(|e| SchoolSystemError::file_operation(format!("写入上传文件失败: {e}")))?;

    tracing::debug!(
        "Stored upload {} ({} bytes) as {}",
        upload.original_name,
        upload.data.len(),
        dest_path.display()
    );

    Ok(format!("/uploads/{subdir}/{stored_name}"))
}
