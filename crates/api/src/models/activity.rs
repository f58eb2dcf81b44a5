//! Activity log entries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use shopsphere_core::{ActivityAction, EntityType, UserId};

/// Where a request came from, as far as the headers tell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// An entry to append to the activity log.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub user_id: Option<UserId>,
    pub action: ActivityAction,
    pub entity_type: EntityType,
    pub entity_id: Option<String>,
    pub metadata: Map<String, Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl NewActivity {
    /// Start an entry for `action` by `user_id`.
    #[must_use]
    pub fn new(user_id: Option<UserId>, action: ActivityAction) -> Self {
        Self {
            user_id,
            action,
            entity_type: EntityType::Other,
            entity_id: None,
            metadata: Map::new(),
            ip_address: None,
            user_agent: None,
        }
    }

    /// Point the entry at an entity.
    #[must_use]
    pub fn entity(mut self, entity_type: EntityType, entity_id: impl ToString) -> Self {
        self.entity_type = entity_type;
        self.entity_id = Some(entity_id.to_string());
        self
    }

    /// Record the client the request came from.
    #[must_use]
    pub fn client(mut self, client: &ClientInfo) -> Self {
        self.ip_address.clone_from(&client.ip_address);
        self.user_agent.clone_from(&client.user_agent);
        self
    }

    /// Attach a metadata field.
    #[must_use]
    pub fn meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_owned(), value.into());
        self
    }
}

/// A stored activity log entry. Entries are never updated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: String,
    pub user_id: Option<UserId>,
    pub action: ActivityAction,
    pub entity_type: EntityType,
    pub entity_id: Option<String>,
    pub metadata: Map<String, Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}
