use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::{articles::services::ArticleError, auth::services::AuthError, users::services::UserError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            // detail stays in the log
            ApiError::Internal(detail) => {
                error!(error = %detail, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_owned())
            }
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<ArticleError> for ApiError {
    fn from(err: ArticleError) -> Self {
        match err {
            ArticleError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ArticleError::DataAccess(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => ApiError::Unauthorized(err.to_string()),
            UserError::InvalidEmail | UserError::PasswordTooShort => {
                ApiError::BadRequest(err.to_string())
            }
            UserError::EmailTaken => ApiError::Conflict(err.to_string()),
            UserError::Hashing(_) | UserError::DataAccess(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken
            | AuthError::UnexpectedToken
            | AuthError::UnexpectedUser
            | AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::Signing(_) | AuthError::Password(_) | AuthError::DataAccess(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}
