//! Asana adapter. Implements TaskTrackerPort via the Asana REST API.

use crate::domain::{AsanaUser, Attachment, DomainError, NamedRef, TaskDetails, TaskSummary};
use crate::ports::TaskTrackerPort;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const ASANA_API_URL: &str = "https://app.asana.com/api/1.0";

/// Single page; tasks beyond it are never inspected.
const TASK_PAGE_LIMIT: u32 = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const TASK_LIST_FIELDS: &str = "gid,name";
const ATTACHMENT_FIELDS: &str = "gid,name,resource_type,resource_subtype,url,view_url,host,parent";
const TASK_DETAIL_FIELDS: &str =
    "gid,name,notes,completed,assignee,assignee.name,due_on,projects,projects.name";

/// Asana wraps every payload in `{"data": ...}`.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Asana API adapter bound to one project.
///
/// Requires a personal access token. Tasks are moved into `target_section_gid`
/// unless a section is passed explicitly.
pub struct AsanaAdapter {
    client: Client,
    base_url: String,
    token: String,
    project_gid: String,
    target_section_gid: Option<String>,
}

impl AsanaAdapter {
    /// Create a new Asana adapter.
    ///
    /// # Arguments
    /// * `base_url` - API root, normally `ASANA_API_URL`
    /// * `token` - personal access token
    /// * `project_gid` - project scanned for conversation links
    /// * `target_section_gid` - default destination section (optional)
    ///
    /// # Errors
    /// Returns `DomainError::Config` if the HTTP client cannot be built.
    pub fn new(
        base_url: String,
        token: String,
        project_gid: String,
        target_section_gid: Option<String>,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::Config(format!("Asana HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            project_gid,
            target_section_gid,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send with bearer auth and decode `{"data": T}`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, DomainError> {
        let res = request
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DomainError::TaskTracker(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::TaskTracker(format!(
                "Asana API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let envelope: Envelope<T> = res
            .json()
            .await
            .map_err(|e| DomainError::TaskTracker(format!("Failed to parse response: {}", e)))?;
        Ok(envelope.data)
    }
}

#[async_trait::async_trait]
impl TaskTrackerPort for AsanaAdapter {
    fn project_id(&self) -> &str {
        &self.project_gid
    }

    fn target_section_id(&self) -> Option<&str> {
        self.target_section_gid.as_deref()
    }

    async fn list_project_tasks(&self, project_id: &str) -> Result<Vec<TaskSummary>, DomainError> {
        let limit = TASK_PAGE_LIMIT.to_string();
        let request = self.client.get(self.url("tasks")).query(&[
            ("project", project_id),
            ("opt_fields", TASK_LIST_FIELDS),
            ("limit", limit.as_str()),
        ]);
        let tasks: Vec<TaskSummary> = self.send(request).await?;
        debug!(project_id, count = tasks.len(), "listed project tasks");
        Ok(tasks)
    }

    async fn list_task_attachments(&self, task_id: &str) -> Result<Vec<Attachment>, DomainError> {
        let request = self
            .client
            .get(self.url("attachments"))
            .query(&[("parent", task_id), ("opt_fields", ATTACHMENT_FIELDS)]);
        let mut attachments: Vec<Attachment> = self.send(request).await?;
        for attachment in &mut attachments {
            attachment.parent.get_or_insert_with(|| NamedRef {
                gid: task_id.to_string(),
                name: None,
            });
        }
        Ok(attachments)
    }

    async fn get_task_details(&self, task_id: &str) -> Result<TaskDetails, DomainError> {
        let request = self
            .client
            .get(self.url(&format!("tasks/{}", task_id)))
            .query(&[("opt_fields", TASK_DETAIL_FIELDS)]);
        self.send(request).await
    }

    async fn move_task_to_section(
        &self,
        task_id: &str,
        section_id: Option<&str>,
    ) -> Result<bool, DomainError> {
        let Some(section) = section_id.or(self.target_section_gid.as_deref()) else {
            warn!(task_id, "no target section to move task into");
            return Ok(false);
        };

        let body = serde_json::json!({ "data": { "task": task_id } });
        let request = self
            .client
            .post(self.url(&format!("sections/{}/addTask", section)))
            .json(&body);
        let _: serde_json::Value = self.send(request).await?;

        info!(task_id, section, "task moved to section");
        Ok(true)
    }

    async fn get_current_user(&self) -> Result<AsanaUser, DomainError> {
        self.send(self.client.get(self.url("users/me"))).await
    }
}
