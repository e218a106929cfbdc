use super::gateway::NotificationError;

/// Provider-agnostic notification payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Deep link opened when the notification is clicked
    pub link: String,
}

/// Outcome of a single delivery attempt.
#[derive(Debug)]
pub enum DispatchResult {
    Delivered,
    /// The provider refused or failed the send. Nothing was delivered.
    Failed(NotificationError),
}
