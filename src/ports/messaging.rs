//! Messaging outbound port. Read conversations and annotate them (e.g. Intercom).

use crate::domain::{Conversation, DomainError, LinkUpdate};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{info, warn};

/// Custom attribute holding the cross-link to the task.
pub const TASK_LINK_ATTRIBUTE: &str = "asana_task_url";

/// Port for the external messaging system.
///
/// Implementors provide the raw calls; the attribute helpers are shared so that
/// every implementation follows the same read-before-write rule.
#[async_trait::async_trait]
pub trait MessagingPort: Send + Sync {
    async fn get_conversation(&self, conversation_id: &str) -> Result<Conversation, DomainError>;

    /// Overwrite the named custom attributes. Returns the updated conversation.
    async fn set_conversation_attributes(
        &self,
        conversation_id: &str,
        attributes: HashMap<String, Value>,
    ) -> Result<Conversation, DomainError>;

    /// Raw `/me` record of the token owner. Used for connectivity self-checks.
    async fn get_current_admin(&self) -> Result<Value, DomainError>;

    /// Read one custom attribute. `Ok(None)` when the conversation has no such attribute.
    async fn get_conversation_attribute(
        &self,
        conversation_id: &str,
        name: &str,
    ) -> Result<Option<Value>, DomainError> {
        let conversation = self.get_conversation(conversation_id).await?;
        Ok(conversation.custom_attributes.get(name).cloned())
    }

    /// Point the conversation at `task_url`. Idempotent: no write when already set.
    ///
    /// A failed read is treated as "not set" and the write is still attempted.
    async fn set_conversation_task_link(
        &self,
        conversation_id: &str,
        task_url: &str,
    ) -> Result<LinkUpdate, DomainError> {
        match self
            .get_conversation_attribute(conversation_id, TASK_LINK_ATTRIBUTE)
            .await
        {
            Ok(Some(existing)) if existing.as_str() == Some(task_url) => {
                info!(conversation_id, task_url, "task link already set");
                return Ok(LinkUpdate::AlreadySet);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(conversation_id, error = %e, "could not read existing task link");
            }
        }

        let attributes = HashMap::from([(
            TASK_LINK_ATTRIBUTE.to_string(),
            Value::String(task_url.to_string()),
        )]);
        self.set_conversation_attributes(conversation_id, attributes)
            .await?;
        info!(conversation_id, task_url, "task link set");
        Ok(LinkUpdate::Written)
    }
}
