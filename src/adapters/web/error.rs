//! HTTP error responses for web adapter.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::domain::error::TickcalcError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(serde::Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &TickcalcError) -> StatusCode {
    match err {
        TickcalcError::Formula(_)
        | TickcalcError::InvalidRange { .. }
        | TickcalcError::NoData { .. } => StatusCode::BAD_REQUEST,
        TickcalcError::ConfigParse { .. }
        | TickcalcError::ConfigMissing { .. }
        | TickcalcError::ConfigInvalid { .. }
        | TickcalcError::Data { .. }
        | TickcalcError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<TickcalcError> for WebError {
    fn from(err: TickcalcError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
