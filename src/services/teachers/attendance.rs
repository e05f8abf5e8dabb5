use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use tracing::{info, warn};

use super::TeacherService;
use crate::models::attendance::entities::AttendanceStatus;
use crate::models::attendance::requests::{AttendanceBatch, AttendanceEntry, AttendanceRecord};
use crate::models::teachers::responses::MarkAttendanceResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::files::PendingUpload;
use crate::services::files::upload::{read_file_field, read_text_field};
use crate::services::{current_user_id, error_response};
use crate::utils::academic_year::parse_date;

const MAX_TEXT_FIELD_SIZE: usize = 256 * 1024;

#[derive(Default)]
struct AttendanceForm {
    class_id: Option<String>,
    date: Option<String>,
    attendance: Option<String>,
    photo: Option<PendingUpload>,
}

fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message.into()))
}

/// 解析点名记录。无法识别的学生 ID 跳过，状态不合法时整体拒绝
pub(crate) fn build_records(
    entries: Vec<AttendanceEntry>,
) -> Result<Vec<AttendanceRecord>, String> {
    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(student_id) = entry.student_id() else {
            warn!("Skipping attendance entry with invalid student id: {}", entry.student_id);
            continue;
        };
        let status: AttendanceStatus = entry.status.trim().parse()?;
        records.push(AttendanceRecord {
            student_id,
            status,
            remarks: entry.remarks.filter(|r| !r.trim().is_empty()),
        });
    }
    Ok(records)
}

async fn read_form(payload: &mut Multipart) -> Result<AttendanceForm, HttpResponse> {
    let mut form = AttendanceForm::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| bad_request(ErrorCode::BadRequest, format!("Invalid multipart body: {e}")))?
    {
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "photo" => {
                if form.photo.is_some() {
                    return Err(bad_request(
                        ErrorCode::MultifileUploadNotAllowed,
                        "Only one photo can be uploaded",
                    ));
                }
                form.photo = Some(read_file_field(&mut field).await?);
            }
            "class_id" => {
                form.class_id = Some(read_text_field(&mut field, MAX_TEXT_FIELD_SIZE).await?);
            }
            "date" => {
                form.date = Some(read_text_field(&mut field, MAX_TEXT_FIELD_SIZE).await?);
            }
            "attendance" => {
                form.attendance = Some(read_text_field(&mut field, MAX_TEXT_FIELD_SIZE).await?);
            }
            // 其余字段忽略
            _ => {}
        }
    }

    Ok(form)
}

pub async fn mark_attendance(
    service: &TeacherService,
    request: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user_id(request) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };
    if let Err(response) = service.current_teacher(request).await {
        return Ok(response);
    }

    let form = match read_form(&mut payload).await {
        Ok(form) => form,
        Err(response) => return Ok(response),
    };

    let class_id = match form.class_id.as_deref().map(str::trim).map(str::parse::<i64>) {
        Some(Ok(id)) if id > 0 => id,
        _ => return Ok(bad_request(ErrorCode::BadRequest, "Invalid class ID")),
    };

    let date = match form.date.as_deref().map(str::trim) {
        Some(date) if parse_date(date).is_some() => date.to_string(),
        _ => {
            return Ok(bad_request(
                ErrorCode::BadRequest,
                "Invalid date format, use YYYY-MM-DD",
            ));
        }
    };

    let Some(raw_attendance) = form.attendance else {
        return Ok(bad_request(ErrorCode::AttendanceInvalid, "attendance is required"));
    };
    let entries: Vec<AttendanceEntry> = match serde_json::from_str(&raw_attendance) {
        Ok(entries) => entries,
        Err(_) => {
            return Ok(bad_request(
                ErrorCode::AttendanceInvalid,
                "invalid attendance json format",
            ));
        }
    };
    let records = match build_records(entries) {
        Ok(records) => records,
        Err(msg) => return Ok(bad_request(ErrorCode::AttendanceInvalid, msg)),
    };

    let storage = service.get_storage(request);
    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, "获取班级失败")),
    }

    // 照片按月份分目录保存
    let photo_url = match form.photo {
        Some(photo) => {
            let subdir = chrono::Local::now().format("%Y-%m").to_string();
            match service.files().persist(photo, &subdir).await {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::error!("Failed to save attendance photo: {}", e);
                    return Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::FileUploadFailed,
                            "failed to save photo",
                        )),
                    );
                }
            }
        }
        None => None,
    };

    let batch = AttendanceBatch {
        class_id,
        date: date.clone(),
        marked_by: user_id,
        photo_url: photo_url.clone(),
        records,
    };

    match storage.mark_attendance(batch).await {
        Ok(count) => {
            info!(
                "User {} marked attendance for class {} on {} ({} records)",
                user_id, class_id, date, count
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                MarkAttendanceResponse {
                    message: "Attendance marked successfully".to_string(),
                    photo_url: photo_url.unwrap_or_default(),
                },
                "Attendance marked successfully",
            )))
        }
        Err(e) => {
            tracing::error!("Attendance marking failed: {}", e);
            Ok(HttpResponse::build(e.status_code()).json(ApiResponse::error_empty(
                ErrorCode::AttendanceMarkFailed,
                format!("Attendance marking failed: {}", e.message()),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_records_skips_bad_ids() {
        let entries: Vec<AttendanceEntry> = serde_json::from_str(
            r#"[
                {"student_id": 1, "status": "present"},
                {"student_id": "abc", "status": "absent"},
                {"student_id": "2", "status": "late", "remarks": "bus"},
                {"student_id": 3, "status": "excused", "remarks": "  "},
                {"student_id": 0, "status": "present"},
                {"student_id": -4, "status": "absent"},
                {"student_id": "-7", "status": "late"}
            ]"#,
        )
        .unwrap();
        let records = build_records(entries).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].student_id, 2);
        assert_eq!(records[1].status, AttendanceStatus::Late);
        assert_eq!(records[1].remarks.as_deref(), Some("bus"));
        assert!(records[2].remarks.is_none());
        assert!(records.iter().all(|r| r.student_id > 0));
    }

    #[test]
    fn test_build_records_all_non_positive_ids() {
        let entries: Vec<AttendanceEntry> = serde_json::from_str(
            r#"[{"student_id": 0, "status": "present"}, {"student_id": -4, "status": "absent"}]"#,
        )
        .unwrap();
        assert!(build_records(entries).unwrap().is_empty());
    }

    #[test]
    fn test_build_records_rejects_unknown_status() {
        let entries: Vec<AttendanceEntry> =
            serde_json::from_str(r#"[{"student_id": 1, "status": "sick"}]"#).unwrap();
        assert!(build_records(entries).is_err());
    }
}
