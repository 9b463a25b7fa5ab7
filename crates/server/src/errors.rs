use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use service::shops::ShopValidationError;
use thiserror::Error;
use tracing::error;

/// Every failure a handler can report. Rendered as `{"error": <Display>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Shop not found")]
    ShopNotFound,
    #[error("Endpoint not found")]
    EndpointNotFound,
    #[error("{0}")]
    BadRequest(#[from] ShopValidationError),
    #[error("Shop already exists")]
    Conflict,
    #[error("Failed to persist shops")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ShopNotFound | Self::EndpointNotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => Self::ShopNotFound,
            ServiceError::Conflict(_) => Self::Conflict,
            ServiceError::Storage(msg) | ServiceError::Corrupt(msg) => Self::Storage(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Storage(detail) = &self {
            error!(error = %detail, "request failed while persisting shops");
        }
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
