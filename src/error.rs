use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

/// ApiError
///
/// The application-wide error taxonomy. Every controller and middleware failure funnels
/// into one of these variants, which map one-to-one onto HTTP status codes:
///
/// - `Validation` (400): missing fields or a violated schema rule.
/// - `Unauthorized` (401): absent, malformed, or expired credential.
/// - `Forbidden` (403): relationship/ownership mismatch in the resource tree.
/// - `NotFound` (404): a referenced resource does not exist.
/// - `Database` / `Crypto` (500): infrastructure failures. These are logged server-side
///   and surface to the client only as a generic message.
///
/// There is no local recovery or retry anywhere: errors propagate straight to the
/// terminal `IntoResponse` stage.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("database failure")]
    Database(#[from] sqlx::Error),
    #[error("crypto failure")]
    Crypto(#[from] bcrypt::BcryptError),
    #[error("token signing failure")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// ErrorBody
///
/// The uniform JSON error envelope returned to clients: `{message, statusCode}`.
/// Stack traces and error sources stay in the server logs.
#[derive(Debug, Serialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorBody {
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Crypto(_) | ApiError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            // Infrastructure failures are logged with their source but never leaked.
            ApiError::Database(e) => {
                tracing::error!("database error: {:?}", e);
                "Une erreur interne est survenue.".to_string()
            }
            ApiError::Crypto(e) => {
                tracing::error!("bcrypt error: {:?}", e);
                "Une erreur interne est survenue.".to_string()
            }
            ApiError::Token(e) => {
                tracing::error!("jwt signing error: {:?}", e);
                "Une erreur interne est survenue.".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            message,
            status_code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}
