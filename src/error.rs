use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::member::Role;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("You need to be logged in to access this page")]
    Unauthenticated,
    #[error("The {0} role is required to access this page")]
    Forbidden(Role),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("Failed to hash or verify a password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("Failed to sign a session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("Failed to render page: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Db(_) | AppError::Hash(_) | AppError::Token(_) | AppError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
            (status, "Something went wrong on our end".to_owned()).into_response()
        } else {
            (status, self.to_string()).into_response()
        }
    }
}
