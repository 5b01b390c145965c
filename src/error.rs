use axum::{
    extract::{multipart::MultipartRejection, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::views;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("not signed in")]
    Unauthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Upload(String),

    #[error("not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Upload(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthenticated => Redirect::to("/login").into_response(),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                views::login_page(Some("Invalid credentials")),
            )
                .into_response(),
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, views::signup_page(Some(msg.as_str()))).into_response()
            }
            AppError::Validation(msg) | AppError::Upload(msg) => (
                StatusCode::BAD_REQUEST,
                views::error_page(StatusCode::BAD_REQUEST, &msg),
            )
                .into_response(),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                views::error_page(StatusCode::NOT_FOUND, "Not found"),
            )
                .into_response(),
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    views::error_page(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong"),
                )
                    .into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_redirects_to_login() {
        let res = AppError::Unauthenticated.into_response();
        assert!(res.status().is_redirection());
        assert_eq!(res.headers()[axum::http::header::LOCATION], "/login");
    }

    #[test]
    fn user_facing_errors_map_to_client_statuses() {
        assert_eq!(
            AppError::validation("calories must be a whole number").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::upload("no file selected").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Conflict("Email already in use".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn storage_faults_are_server_errors() {
        let err = AppError::Storage(anyhow::anyhow!("disk full"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
