use crate::models::ErrorBody;
use axum::http::StatusCode;

/// Failure talking to the payments backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Unreachable server, broken connection or undecodable body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response carrying a JSON error body.
    #[error("server responded with {status}")]
    Status {
        status: reqwest::StatusCode,
        body: ErrorBody,
    },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        Self {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
