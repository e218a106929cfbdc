use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0}")]
    InvalidInput(String),
}

impl From<JsonRejection> for DispatchError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
        };
        let body = json!({ "success": false, "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
