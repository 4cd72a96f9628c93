//! Intercom adapter. Implements MessagingPort via the Intercom REST API.

use crate::domain::event::id_to_string;
use crate::domain::{Conversation, ConversationPart, DomainError, PartAuthor};
use crate::ports::MessagingPort;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

pub const INTERCOM_API_URL: &str = "https://api.intercom.io";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Conversation as returned by `GET /conversations/{id}`; only the fields we read.
#[derive(Deserialize)]
struct ConversationRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    custom_attributes: Option<HashMap<String, Value>>,
    #[serde(default)]
    conversation_parts: Option<PartList>,
}

#[derive(Deserialize)]
struct PartList {
    #[serde(default)]
    conversation_parts: Vec<PartRecord>,
}

#[derive(Deserialize)]
struct PartRecord {
    #[serde(default)]
    author: Option<AuthorRecord>,
}

#[derive(Deserialize)]
struct AuthorRecord {
    #[serde(default)]
    email: Option<String>,
}

impl From<ConversationRecord> for Conversation {
    fn from(record: ConversationRecord) -> Self {
        let parts = record
            .conversation_parts
            .map(|list| list.conversation_parts)
            .unwrap_or_default()
            .into_iter()
            .map(|part| ConversationPart {
                author: PartAuthor {
                    email: part.author.and_then(|a| a.email),
                },
            })
            .collect();

        Conversation {
            id: record
                .id
                .as_ref()
                .and_then(id_to_string)
                .unwrap_or_default(),
            custom_attributes: record.custom_attributes.unwrap_or_default(),
            parts,
        }
    }
}

/// Intercom API adapter.
///
/// Requires an access token from the Intercom developer hub.
pub struct IntercomAdapter {
    client: Client,
    base_url: String,
    token: String,
}

impl IntercomAdapter {
    /// Create a new Intercom adapter.
    ///
    /// # Errors
    /// Returns `DomainError::Config` if the HTTP client cannot be built.
    pub fn new(base_url: String, token: String) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::Config(format!("Intercom HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, DomainError> {
        let res = request
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DomainError::Messaging(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "Intercom API returned error");
            return Err(DomainError::Messaging(format!(
                "Intercom API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        res.json()
            .await
            .map_err(|e| DomainError::Messaging(format!("Failed to parse response: {}", e)))
    }

    fn decode_conversation(value: Value) -> Result<Conversation, DomainError> {
        serde_json::from_value::<ConversationRecord>(value)
            .map(Conversation::from)
            .map_err(|e| DomainError::Messaging(format!("Unexpected conversation shape: {}", e)))
    }
}

#[async_trait::async_trait]
impl MessagingPort for IntercomAdapter {
    async fn get_conversation(&self, conversation_id: &str) -> Result<Conversation, DomainError> {
        let request = self
            .client
            .get(self.url(&format!("conversations/{}", conversation_id)));
        Self::decode_conversation(self.send(request).await?)
    }

    async fn set_conversation_attributes(
        &self,
        conversation_id: &str,
        attributes: HashMap<String, Value>,
    ) -> Result<Conversation, DomainError> {
        let body = serde_json::json!({ "custom_attributes": attributes });
        let request = self
            .client
            .put(self.url(&format!("conversations/{}", conversation_id)))
            .json(&body);
        let response = self.send(request).await?;

        // Any 2xx means the write landed; the echoed record is decoded best-effort.
        let mut conversation = match Self::decode_conversation(response) {
            Ok(conversation) => conversation,
            Err(e) => {
                warn!(conversation_id, error = %e, "conversation update response not decoded");
                Conversation {
                    id: String::new(),
                    custom_attributes: HashMap::new(),
                    parts: Vec::new(),
                }
            }
        };
        if conversation.id.is_empty() {
            conversation.id = conversation_id.to_string();
        }
        for (key, value) in attributes {
            conversation.custom_attributes.entry(key).or_insert(value);
        }
        Ok(conversation)
    }

    async fn get_current_admin(&self) -> Result<Value, DomainError> {
        self.send(self.client.get(self.url("me"))).await
    }
}
