use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A registered device push token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    /// Opaque device push token, unique within the registry
    #[schema(example = "fQ3x9v-Z1yE:APA91bHk2...")]
    pub token: String,
    /// Time of the most recent (re-)registration
    pub timestamp: DateTime<Utc>,
    /// Free-text descriptor of the registering client, usually its user agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl TokenRecord {
    pub fn new(token: impl Into<String>, user_agent: Option<String>) -> Self {
        Self {
            token: token.into(),
            timestamp: Utc::now(),
            user_agent,
        }
    }
}

/// Inserts `record` into `records`, replacing any record with the same token in place.
pub(crate) fn upsert_in_place(records: &mut Vec<TokenRecord>, record: TokenRecord) {
    match records.iter_mut().find(|existing| existing.token == record.token) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}
