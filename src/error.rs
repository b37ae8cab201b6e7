use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Every handler failure funnels through here and surfaces as an HTTP status
/// with a JSON `{ok: false, error}` body. No retries, no partial-success
/// reporting.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("too many requests")]
    RateLimited,

    #[error("captcha verification failed")]
    CaptchaRejected,

    #[error("pdf rendering failed: {0}")]
    Pdf(String),

    #[error("email delivery failed: {0}")]
    Mail(String),

    #[error("blob storage error: {0}")]
    Blob(String),

    #[error("captcha service error: {0}")]
    Captcha(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),

    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("archive failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::CaptchaRejected => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        let body = Json(serde_json::json!({
            "ok": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_client_errors_to_4xx() {
        assert_eq!(
            ApiError::BadRequest("items empty".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(ApiError::CaptchaRejected.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("orders/x/links.json".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn maps_infrastructure_errors_to_500() {
        assert_eq!(
            ApiError::Mail("status 500".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Pdf("no fonts".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
