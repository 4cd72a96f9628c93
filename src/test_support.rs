//! In-memory port fakes for unit tests. They record every call they receive.

use crate::domain::{
    AsanaUser, Attachment, Conversation, DomainError, NamedRef, TaskDetails, TaskSummary,
};
use crate::ports::{MessagingPort, TASK_LINK_ATTRIBUTE, TaskTrackerPort};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub fn attachment(gid: &str, view_url: Option<&str>, url: Option<&str>) -> Attachment {
    Attachment {
        gid: gid.to_string(),
        name: Some(format!("attachment {gid}")),
        url: url.map(str::to_string),
        view_url: view_url.map(str::to_string),
        host: Some("external".to_string()),
        resource_type: Some("attachment".to_string()),
        resource_subtype: Some("external".to_string()),
        parent: None,
    }
}

pub fn conversation_url(id: &str) -> String {
    format!("https://app.intercom.com/a/inbox/w1/inbox/conversation/{id}")
}

#[derive(Default)]
pub struct FakeTaskTracker {
    project_id: String,
    target_section: Option<String>,
    tasks: Vec<TaskSummary>,
    attachments: HashMap<String, Vec<Attachment>>,
    fail_listing: bool,
    fail_moves: bool,
    fail_attachments_for: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeTaskTracker {
    pub fn new(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            ..Self::default()
        }
    }

    pub fn with_section(mut self, section_id: &str) -> Self {
        self.target_section = Some(section_id.to_string());
        self
    }

    pub fn with_task(mut self, gid: &str, name: Option<&str>, attachments: Vec<Attachment>) -> Self {
        self.tasks.push(TaskSummary {
            gid: gid.to_string(),
            name: name.map(str::to_string),
        });
        self.attachments.insert(gid.to_string(), attachments);
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_moves(mut self) -> Self {
        self.fail_moves = true;
        self
    }

    pub fn failing_attachments_for(mut self, task_gid: &str) -> Self {
        self.fail_attachments_for.insert(task_gid.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn moves(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("move:"))
            .collect()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait::async_trait]
impl TaskTrackerPort for FakeTaskTracker {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    fn target_section_id(&self) -> Option<&str> {
        self.target_section.as_deref()
    }

    async fn list_project_tasks(&self, project_id: &str) -> Result<Vec<TaskSummary>, DomainError> {
        self.record(format!("list_tasks:{project_id}"));
        if self.fail_listing {
            return Err(DomainError::TaskTracker("connection reset".to_string()));
        }
        Ok(self.tasks.clone())
    }

    async fn list_task_attachments(&self, task_id: &str) -> Result<Vec<Attachment>, DomainError> {
        self.record(format!("attachments:{task_id}"));
        if self.fail_attachments_for.contains(task_id) {
            return Err(DomainError::TaskTracker("timeout".to_string()));
        }
        Ok(self.attachments.get(task_id).cloned().unwrap_or_default())
    }

    async fn get_task_details(&self, task_id: &str) -> Result<TaskDetails, DomainError> {
        self.record(format!("details:{task_id}"));
        let summary = self
            .tasks
            .iter()
            .find(|t| t.gid == task_id)
            .ok_or_else(|| DomainError::TaskTracker(format!("task {task_id} not found")))?;
        Ok(TaskDetails {
            gid: summary.gid.clone(),
            name: summary.name.clone(),
            notes: None,
            completed: false,
            assignee: None,
            due_on: None,
            projects: vec![NamedRef {
                gid: self.project_id.clone(),
                name: None,
            }],
        })
    }

    async fn move_task_to_section(
        &self,
        task_id: &str,
        section_id: Option<&str>,
    ) -> Result<bool, DomainError> {
        let Some(section) = section_id.or(self.target_section.as_deref()) else {
            return Ok(false);
        };
        self.record(format!("move:{task_id}:{section}"));
        if self.fail_moves {
            return Err(DomainError::TaskTracker("403 Forbidden".to_string()));
        }
        Ok(true)
    }

    async fn get_current_user(&self) -> Result<AsanaUser, DomainError> {
        self.record("me".to_string());
        Ok(AsanaUser {
            gid: "u1".to_string(),
            name: Some("Bridge Bot".to_string()),
            email: Some("bot@example.com".to_string()),
        })
    }
}

#[derive(Default)]
pub struct FakeMessaging {
    conversations: Mutex<HashMap<String, Conversation>>,
    fail_reads: bool,
    fail_writes: bool,
    calls: Mutex<Vec<String>>,
    writes: Mutex<Vec<(String, HashMap<String, Value>)>>,
}

impl FakeMessaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// One conversation, optionally already linked to `task_link`.
    pub fn with_conversation(id: &str, task_link: Option<&str>) -> Self {
        let mut conversation = Conversation {
            id: id.to_string(),
            ..Conversation::default()
        };
        if let Some(link) = task_link {
            conversation.custom_attributes.insert(
                TASK_LINK_ATTRIBUTE.to_string(),
                Value::String(link.to_string()),
            );
        }
        let fake = Self::default();
        if let Ok(mut conversations) = fake.conversations.lock() {
            conversations.insert(id.to_string(), conversation);
        }
        fake
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn writes(&self) -> Vec<(String, HashMap<String, Value>)> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait::async_trait]
impl MessagingPort for FakeMessaging {
    async fn get_conversation(&self, conversation_id: &str) -> Result<Conversation, DomainError> {
        self.record(format!("get:{conversation_id}"));
        if self.fail_reads {
            return Err(DomainError::Messaging("503 Service Unavailable".to_string()));
        }
        self.conversations
            .lock()
            .ok()
            .and_then(|c| c.get(conversation_id).cloned())
            .ok_or_else(|| DomainError::Messaging(format!("404 conversation {conversation_id}")))
    }

    async fn set_conversation_attributes(
        &self,
        conversation_id: &str,
        attributes: HashMap<String, Value>,
    ) -> Result<Conversation, DomainError> {
        self.record(format!("set:{conversation_id}"));
        if self.fail_writes {
            return Err(DomainError::Messaging("422 Unprocessable Entity".to_string()));
        }
        if let Ok(mut writes) = self.writes.lock() {
            writes.push((conversation_id.to_string(), attributes.clone()));
        }
        let mut conversations = self
            .conversations
            .lock()
            .map_err(|e| DomainError::Messaging(e.to_string()))?;
        let conversation = conversations
            .entry(conversation_id.to_string())
            .or_insert_with(|| Conversation {
                id: conversation_id.to_string(),
                ..Conversation::default()
            });
        conversation.custom_attributes.extend(attributes);
        Ok(conversation.clone())
    }

    async fn get_current_admin(&self) -> Result<Value, DomainError> {
        self.record("me".to_string());
        Ok(serde_json::json!({"type": "admin", "name": "Fake Admin"}))
    }
}
