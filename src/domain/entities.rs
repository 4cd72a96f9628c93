//! Domain entities. Pure data structures for the core business.
//!
//! Task-side types mirror Asana's field names so adapters can decode them
//! directly; conversation types are mapped from Intercom records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name used when the tracker returns a task without one.
pub const UNTITLED_TASK: &str = "untitled";

/// A task as returned by the project listing (`gid` and `name` only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl TaskSummary {
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNTITLED_TASK,
        }
    }
}

/// Compact `{gid, name}` reference used for assignees, projects and parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Full task record. Read-only from this service's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetails {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub assignee: Option<NamedRef>,
    #[serde(default)]
    pub due_on: Option<NaiveDate>,
    #[serde(default)]
    pub projects: Vec<NamedRef>,
}

/// A resource attached to a task. Either URL field may carry a conversation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub view_url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub resource_subtype: Option<String>,
    /// Owning task.
    #[serde(default)]
    pub parent: Option<NamedRef>,
}

impl Attachment {
    /// URL fields in lookup priority order: view URL first, then URL.
    pub fn candidate_urls(&self) -> impl Iterator<Item = &str> {
        [self.view_url.as_deref(), self.url.as_deref()]
            .into_iter()
            .flatten()
    }
}

/// Authenticated tracker user. Only used for connectivity checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsanaUser {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A support conversation in the messaging system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub custom_attributes: HashMap<String, serde_json::Value>,
    pub parts: Vec<ConversationPart>,
}

impl Conversation {
    /// Author e-mail of the most recent part, if any.
    pub fn last_author_email(&self) -> Option<&str> {
        self.parts.last()?.author.email.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationPart {
    pub author: PartAuthor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartAuthor {
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of a successful conversation-to-task lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTask {
    pub task_gid: String,
    pub task_name: String,
    pub attachment_gid: String,
    pub conversation_url: String,
}

/// What `set_conversation_task_link` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkUpdate {
    /// The attribute already held the URL; nothing was written.
    AlreadySet,
    Written,
}
