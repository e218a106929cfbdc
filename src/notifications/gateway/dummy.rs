use async_trait::async_trait;
use tracing::{debug, info};

use super::{NotificationError, NotificationGateway};
use crate::notifications::entities::Notification;

/// Gateway that only logs, for development without provider credentials.
pub struct DummyNotificationGateway;

#[async_trait]
impl NotificationGateway for DummyNotificationGateway {
    async fn send_notification(
        &self,
        device_token: &str,
        notification: &Notification,
    ) -> Result<(), NotificationError> {
        debug!(device_token, "Notification target");
        info!(
            title = %notification.title,
            link = %notification.link,
            "Notification"
        );
        Ok(())
    }
}
