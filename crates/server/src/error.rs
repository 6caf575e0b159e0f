use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use semsort_common::SemsortError;
use std::fmt;
use tracing::error;

/// HTTP wrapper around [`SemsortError`]
#[derive(Debug)]
pub struct HttpError(pub SemsortError);

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<SemsortError> for HttpError {
    fn from(err: SemsortError) -> Self {
        Self(err)
    }
}

impl ResponseError for HttpError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(self.0.to_string())
    }
}

pub type HttpResult<T> = std::result::Result<T, HttpError>;
