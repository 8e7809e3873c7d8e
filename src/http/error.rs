//! API error surface: every handler returns `Result<_, ApiError>` and
//! the impl below maps each class to its status code and JSON body.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::validate::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("forbidden")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ApiError::Validation(ValidationError {
            field,
            message: message.into(),
        })
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            other => ApiError::Internal(other.into()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(err) => HttpResponse::BadRequest().json(err),
            ApiError::NotFound => {
                HttpResponse::NotFound().json(json!({ "detail": "Not found." }))
            }
            ApiError::Unauthorized(msg) => {
                HttpResponse::Unauthorized().json(json!({ "detail": msg }))
            }
            ApiError::Forbidden => HttpResponse::Forbidden().json(json!({
                "detail": "You do not have permission to perform this action."
            })),
            ApiError::Internal(err) => {
                log::error!("internal error: {err:#}");
                HttpResponse::InternalServerError()
                    .json(json!({ "detail": "Internal server error." }))
            }
        }
    }
}
