//! Task tracker outbound port. Read tasks and move them between sections (e.g. Asana).

use crate::domain::{AsanaUser, Attachment, DomainError, TaskDetails, TaskSummary};

/// Port for the external task tracker.
///
/// Every method makes exactly one request; callers decide how to degrade on `Err`.
#[async_trait::async_trait]
pub trait TaskTrackerPort: Send + Sync {
    /// Project this tracker is bound to.
    fn project_id(&self) -> &str;

    /// Default section used by `move_task_to_section` when none is given.
    fn target_section_id(&self) -> Option<&str>;

    /// List tasks in a project. Returns a single page only.
    async fn list_project_tasks(&self, project_id: &str) -> Result<Vec<TaskSummary>, DomainError>;

    /// List attachments of a task, in the tracker's order.
    async fn list_task_attachments(&self, task_id: &str) -> Result<Vec<Attachment>, DomainError>;

    async fn get_task_details(&self, task_id: &str) -> Result<TaskDetails, DomainError>;

    /// Add a task to a section, falling back to `target_section_id()`.
    ///
    /// Returns `Ok(false)` without any request when no section is available.
    ///
    /// # Errors
    /// Returns `DomainError` if the API call fails.
    async fn move_task_to_section(
        &self,
        task_id: &str,
        section_id: Option<&str>,
    ) -> Result<bool, DomainError>;

    /// Authenticated user. Used for connectivity self-checks.
    async fn get_current_user(&self) -> Result<AsanaUser, DomainError>;
}
