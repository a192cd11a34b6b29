/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - security errors は故意に一般的なメッセージへ変換 (enumeration 対策)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;

/// Uniform client-visible error shape: `{error_code, timestamp, message[]}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_code: u16,
    pub timestamp: String,
    pub message: Vec<String>,
}

impl ErrorResponse {
    fn new(status: StatusCode, message: Vec<String>) -> Self {
        Self {
            error_code: status.as_u16(),
            timestamp: Utc::now().format("%d-%m-%Y %I:%M:%S").to_string(),
            message,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Login failed. Unknown identity and wrong password are indistinguishable
    /// on purpose.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// No usable credential on a route that requires one, or a presented token
    /// was rejected. The sub-reason (expired / bad signature / malformed) is
    /// logged server-side only.
    #[error("user could not be authenticated")]
    Unauthenticated,

    /// Valid credential, but the role or ownership check failed.
    #[error("access denied")]
    Forbidden,

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("{0}")]
    BadRequest(String),

    /// A collaborator (database) failed. Not a security denial.
    #[error("service temporarily unavailable")]
    Upstream,

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse::new(status, vec![self.to_string()]);
        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Db(_) => AppError::Upstream,
            RepoError::Corrupt(_) => AppError::Internal,
        }
    }
}
