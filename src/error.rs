use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::{ErrorResponse, NOT_FOUND_MESSAGE, SERVER_ERROR_MESSAGE};
use crate::bookmarks::{RepositoryError, ValidationError};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("ValidationError: {0}")]
    Validation(#[from] ValidationError),
    #[error("RepositoryError: {}", crate::unpack_error(.0))]
    Repository(#[from] RepositoryError),
    #[error("UnknownId: {0}")]
    UnknownId(String),
    #[error("BodyRejected: {0}")]
    BodyRejected(#[from] BytesRejection),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::Validation(_) => StatusCode::BAD_REQUEST,
            HandlerError::Repository(RepositoryError::NotFound(_)) | HandlerError::UnknownId(_) => {
                StatusCode::NOT_FOUND
            }
            HandlerError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HandlerError::BodyRejected(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            HandlerError::Validation(e) => {
                tracing::warn!(error = %e, "rejected request body");
                ErrorResponse::new(e.to_string())
            }
            HandlerError::Repository(RepositoryError::NotFound(id)) => {
                tracing::warn!(id, "bookmark not found");
                ErrorResponse::new(NOT_FOUND_MESSAGE)
            }
            HandlerError::UnknownId(id) => {
                tracing::warn!(id = %id, "bookmark id is not numeric");
                ErrorResponse::new(NOT_FOUND_MESSAGE)
            }
            HandlerError::BodyRejected(rejection) => {
                tracing::warn!(error = %rejection, "could not read request body");
                ErrorResponse::new(rejection.body_text())
            }
            HandlerError::Repository(e) => {
                tracing::error!(error = %crate::unpack_error(e), "store failure");
                ErrorResponse::new(SERVER_ERROR_MESSAGE)
            }
        };
        (status, Json(body)).into_response()
    }
}
