use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, header::USER_AGENT},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use super::{entities::TokenRecord, error::TokenError};
use crate::context::AppContext;

const TOKENS_TAG: &str = "tokens";

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveTokenRequest {
    /// Device push token to register; `null` counts as missing
    #[serde(default)]
    pub token: Option<String>,
    /// Client descriptor; falls back to the request's User-Agent header
    #[serde(default, alias = "clientInfo")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveTokenResponse {
    pub success: bool,
    #[schema(example = "Token saved successfully")]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenListResponse {
    pub success: bool,
    pub tokens: Vec<TokenRecord>,
}

pub fn router() -> OpenApiRouter<Arc<AppContext>> {
    OpenApiRouter::new().routes(routes!(save_token, list_tokens))
}

#[utoipa::path(
    post,
    path = "/save-token",
    request_body = SaveTokenRequest,
    responses(
        (status = 200, description = "Token saved", body = SaveTokenResponse),
        (status = 400, description = "Token missing or empty, or the body is not a JSON object"),
        (status = 500, description = "Token store failure")
    ),
    tag = TOKENS_TAG
)]
async fn save_token(
    State(context): State<Arc<AppContext>>,
    headers: HeaderMap,
    payload: Result<Json<SaveTokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, TokenError> {
    let Json(req) = payload?;
    let user_agent = req.user_agent.filter(|ua| !ua.is_empty()).or_else(|| {
        headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    });

    context
        .token_service
        .register_token(req.token.as_deref().unwrap_or_default(), user_agent)
        .await?;

    Ok(Json(SaveTokenResponse {
        success: true,
        message: "Token saved successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/save-token",
    responses(
        (status = 200, description = "All registered tokens", body = TokenListResponse),
        (status = 500, description = "Token store failure")
    ),
    tag = TOKENS_TAG
)]
async fn list_tokens(
    State(context): State<Arc<AppContext>>,
) -> Result<impl IntoResponse, TokenError> {
    let tokens = context.token_service.list_tokens().await?;
    Ok(Json(TokenListResponse {
        success: true,
        tokens,
    }))
}
