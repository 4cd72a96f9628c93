//! Conversation resolver: find the task whose attachments reference a conversation.
//!
//! The tracker offers no query by attachment URL, so this is a linear scan:
//! tasks in listing order, attachments in listing order, view URL before URL.
//! The first match wins and nothing after it is requested.

use crate::domain::{ResolvedTask, extract_conversation_id};
use crate::ports::TaskTrackerPort;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ResolvedTask),
    NotFound,
    /// The project listing itself failed; reported to callers like `NotFound`.
    ListingFailed(String),
}

impl Resolution {
    pub fn task(&self) -> Option<&ResolvedTask> {
        match self {
            Self::Found(task) => Some(task),
            _ => None,
        }
    }
}

pub struct ConversationResolver {
    tracker: Arc<dyn TaskTrackerPort>,
}

impl ConversationResolver {
    pub fn new(tracker: Arc<dyn TaskTrackerPort>) -> Self {
        Self { tracker }
    }

    pub async fn resolve(&self, conversation_id: &str) -> Resolution {
        let project_id = self.tracker.project_id();
        info!(conversation_id, project_id, "resolving conversation to task");

        let tasks = match self.tracker.list_project_tasks(project_id).await {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(project_id, error = %e, "failed to list project tasks");
                return Resolution::ListingFailed(e.to_string());
            }
        };
        debug!(project_id, tasks = tasks.len(), "listed project tasks");

        for task in &tasks {
            let attachments = match self.tracker.list_task_attachments(&task.gid).await {
                Ok(attachments) => attachments,
                Err(e) => {
                    warn!(task_gid = %task.gid, error = %e, "failed to list attachments, skipping task");
                    continue;
                }
            };

            for attachment in &attachments {
                for url in attachment.candidate_urls() {
                    if extract_conversation_id(url) == Some(conversation_id) {
                        info!(
                            conversation_id,
                            task_gid = %task.gid,
                            attachment_gid = %attachment.gid,
                            url,
                            "task found"
                        );
                        return Resolution::Found(ResolvedTask {
                            task_gid: task.gid.clone(),
                            task_name: task.display_name().to_string(),
                            attachment_gid: attachment.gid.clone(),
                            conversation_url: url.to_string(),
                        });
                    }
                }
            }
        }

        info!(conversation_id, scanned = tasks.len(), "no task references conversation");
        Resolution::NotFound
    }
}
