use std::{sync::Arc, time::Duration};
use tokio::time::timeout;
use tracing::{instrument, warn};

use super::entities::{DispatchResult, Notification};
use super::error::DispatchError;
use super::gateway::{NotificationError, NotificationGateway};

pub struct NotificationService<G: NotificationGateway + ?Sized> {
    notification_gateway: Arc<G>,
    deep_link: String,
    send_timeout: Duration,
}

impl<G: NotificationGateway + ?Sized> NotificationService<G> {
    /// `deep_link` is attached to every notification, regardless of its target or content.
    /// A provider that has not answered within `send_timeout` counts as a failed delivery.
    pub fn new(
        notification_gateway: Arc<G>,
        deep_link: impl Into<String>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            notification_gateway,
            deep_link: deep_link.into(),
            send_timeout,
        }
    }

    /// Sends one notification to `target_token`. Provider failures are returned as
    /// [`DispatchResult::Failed`]; only invalid input is an error.
    ///
    /// The token is not checked against the registry.
    #[instrument(skip_all)]
    pub async fn dispatch(
        &self,
        target_token: &str,
        title: &str,
        body: &str,
    ) -> Result<DispatchResult, DispatchError> {
        if target_token.is_empty() {
            return Err(DispatchError::InvalidInput("Token is required".to_string()));
        }
        if title.is_empty() {
            return Err(DispatchError::InvalidInput("Title is required".to_string()));
        }
        if body.is_empty() {
            return Err(DispatchError::InvalidInput("Message is required".to_string()));
        }

        let notification = Notification {
            title: title.to_string(),
            body: body.to_string(),
            link: self.deep_link.clone(),
        };

        let sent = timeout(
            self.send_timeout,
            self.notification_gateway
                .send_notification(target_token, &notification),
        )
        .await
        .unwrap_or_else(|_| {
            Err(NotificationError::SendFailure(format!(
                "Provider did not respond within {:?}",
                self.send_timeout
            )))
        });

        match sent {
            Ok(()) => Ok(DispatchResult::Delivered),
            Err(err) => {
                warn!("Notification not delivered: {}", err);
                Ok(DispatchResult::Failed(err))
            }
        }
    }
}
