use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::announcements::requests::{CreateAnnouncementRequest, NewAnnouncement};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user_id;
use crate::utils::academic_year::parse_rfc3339_timestamp;

const DEFAULT_PRIORITY: &str = "normal";
const DEFAULT_TARGET: &str = "all";

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub async fn create_announcement(
    service: &TeacherService,
    request: &HttpRequest,
    announcement: CreateAnnouncementRequest,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user_id(request) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };
    if let Err(response) = service.current_teacher(request).await {
        return Ok(response);
    }

    if announcement.title.trim().is_empty() || announcement.content.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "title and content are required",
        )));
    }

    let expires_at = match announcement.expires_at.as_deref() {
        Some(raw) => match parse_rfc3339_timestamp(raw) {
            Some(ts) => Some(ts),
            None => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "Invalid expires_at, expected RFC3339",
                )));
            }
        },
        None => None,
    };

    let new_announcement = NewAnnouncement {
        title: announcement.title.trim().to_string(),
        content: announcement.content,
        author_id: user_id,
        target_type: non_empty_or(announcement.target_type, DEFAULT_TARGET),
        target_id: announcement.target_id,
        priority: non_empty_or(announcement.priority, DEFAULT_PRIORITY),
        is_pinned: announcement.is_pinned,
        expires_at,
    };

    match service
        .get_storage(request)
        .create_announcement(new_announcement)
        .await
    {
        Ok(created) => {
            info!("User {} published announcement {}", user_id, created.id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(created, "Announcement created successfully")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::AnnouncementCreationFailed,
                format!("Announcement creation failed: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(non_empty_or(None, DEFAULT_PRIORITY), "normal");
        assert_eq!(non_empty_or(Some("  ".into()), DEFAULT_TARGET), "all");
        assert_eq!(non_empty_or(Some(" high ".into()), DEFAULT_PRIORITY), "high");
    }
}
