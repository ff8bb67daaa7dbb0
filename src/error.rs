use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::repository::RepoError;

/// AppError
///
/// Every user-visible failure of a suggestion route. A non-owner attempting a mutation is
/// not represented here: that outcome is a plain redirect.
#[derive(Error, Debug)]
pub enum AppError {
    /// The record is absent, the id is malformed, or the record is private to someone else.
    #[error("Not found")]
    NotFound,

    #[error("Invalid payload: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A body that is not valid JSON for the payload type (wrong content type, bad syntax,
/// unknown status) is a client error like any other failed validation.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage causes are logged here and never reach the client.
        let body = match &self {
            AppError::NotFound => json!({ "view": "error/404" }),
            AppError::Validation(message) => json!({ "view": "error/422", "message": message }),
            AppError::Storage(e) => {
                tracing::error!("storage failure: {:?}", e);
                json!({ "view": "error/500" })
            }
        };

        (status, Json(body)).into_response()
    }
}
