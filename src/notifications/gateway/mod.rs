pub mod apns;
pub mod dummy;
pub mod fcm;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use super::entities::Notification;

/// Failure reported by a push provider. Serialized verbatim into dispatch
/// responses, so callers can branch on `type`.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum NotificationError {
    #[error("Failed to send notification: {0}")]
    SendFailure(String),

    #[error("Provider rejected notification with status {status}")]
    Rejected {
        status: u16,
        body: serde_json::Value,
    },

    #[error("Failed to initialize notification service: {0}")]
    InitializationFailed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationGateway {
    /// Delivers `notification` to a single device. Exactly one attempt is made.
    async fn send_notification(
        &self,
        device_token: &str,
        notification: &Notification,
    ) -> Result<(), NotificationError>;
}
