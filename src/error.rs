use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the record services.
///
/// Validation and not-found errors are detected before any mutation.
/// Store and corruption errors carry detail for the server log only;
/// callers receive a generic message.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or malformed required fields. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Unknown record id. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Underlying store unavailable or command failed. HTTP 500.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Stored blob is not a JSON object. HTTP 500.
    #[error("corrupt document: {0}")]
    Corrupt(String),
}

impl ServiceError {
    pub fn is_internal(&self) -> bool {
        matches!(self, ServiceError::Store(_) | ServiceError::Corrupt(_))
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Store(_) | ServiceError::Corrupt(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}
