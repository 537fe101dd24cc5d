use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Validation failures for attendance input (query strings, edit payloads, stored rows).
///
/// Classification and aggregation never produce these; only parsing does.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttendanceError {
    #[error("invalid month `{0}`, expected YYYY-MM")]
    InvalidMonth(String),

    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid time `{0}`, expected HH:MM")]
    InvalidTime(String),

    #[error("unknown attendance status `{0}`")]
    UnknownStatus(String),

    #[error("quarter must be between 1 and 4, got {0}")]
    InvalidQuarter(u8),
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(json!({
            "message": self.to_string()
        }))
    }
}
