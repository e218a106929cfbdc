use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use super::{entities::DispatchResult, error::DispatchError, gateway::NotificationError};
use crate::context::AppContext;

const NOTIFICATIONS_TAG: &str = "notifications";

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendNotificationRequest {
    /// Target device token; not required to be registered
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Notification body
    #[serde(default, alias = "body")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendNotificationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Provider error payload when delivery failed
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub error: Option<NotificationError>,
}

impl From<DispatchResult> for SendNotificationResponse {
    fn from(result: DispatchResult) -> Self {
        match result {
            DispatchResult::Delivered => Self {
                success: true,
                message: Some("Notification sent!".to_string()),
                error: None,
            },
            DispatchResult::Failed(err) => Self {
                success: false,
                message: None,
                error: Some(err),
            },
        }
    }
}

pub fn router() -> OpenApiRouter<Arc<AppContext>> {
    OpenApiRouter::new().routes(routes!(send_notification))
}

#[utoipa::path(
    post,
    path = "/send-notification",
    request_body = SendNotificationRequest,
    responses(
        (status = 200, description = "Delivery attempted; `success` tells whether the provider accepted it", body = SendNotificationResponse),
        (status = 400, description = "Token, title or message missing, or the body is not a JSON object")
    ),
    tag = NOTIFICATIONS_TAG
)]
async fn send_notification(
    State(context): State<Arc<AppContext>>,
    payload: Result<Json<SendNotificationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, DispatchError> {
    let Json(req) = payload?;
    context
        .notification_service
        .dispatch(
            req.token.as_deref().unwrap_or_default(),
            req.title.as_deref().unwrap_or_default(),
            req.message.as_deref().unwrap_or_default(),
        )
        .await
        .map(SendNotificationResponse::from)
        .map(Json)
}
