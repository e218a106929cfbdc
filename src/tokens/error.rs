use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::database::TokenDatabaseError;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] TokenDatabaseError),
}

impl From<JsonRejection> for TokenError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => {
                error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = json!({ "success": false, "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
