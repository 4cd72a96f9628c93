//! Webhook use case: resolve the task for a conversation reply, link it back, maybe move it.
//!
//! Single pass per delivery, no state kept between deliveries:
//! resolve -> link (best effort) -> exclusion check -> move.

use crate::domain::{DomainError, ExclusionList, LinkUpdate, ResolvedTask, WebhookEvent, task_url};
use crate::ports::{MessagingPort, TaskTrackerPort};
use crate::usecases::resolver::{ConversationResolver, Resolution};
use std::sync::Arc;
use tracing::{error, info, warn};

/// What happened to one webhook delivery. Every variant is a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The payload carried no conversation id; nothing was called.
    NoConversation,
    TaskNotFound {
        conversation_id: String,
    },
    /// Linked but not moved: the reply author is excluded.
    Skipped {
        conversation_id: String,
        task: ResolvedTask,
        author_email: String,
        link_set: bool,
    },
    Moved {
        conversation_id: String,
        task: ResolvedTask,
        link_set: bool,
    },
    MoveFailed {
        conversation_id: String,
        task: ResolvedTask,
        link_set: bool,
        reason: String,
    },
}

pub struct WebhookService {
    tracker: Option<Arc<dyn TaskTrackerPort>>,
    messaging: Option<Arc<dyn MessagingPort>>,
    exclusions: ExclusionList,
}

impl WebhookService {
    /// Clients are `None` when their credentials were missing at startup.
    pub fn new(
        tracker: Option<Arc<dyn TaskTrackerPort>>,
        messaging: Option<Arc<dyn MessagingPort>>,
        exclusions: ExclusionList,
    ) -> Self {
        Self {
            tracker,
            messaging,
            exclusions,
        }
    }

    pub fn tracker(&self) -> Option<&Arc<dyn TaskTrackerPort>> {
        self.tracker.as_ref()
    }

    pub fn messaging(&self) -> Option<&Arc<dyn MessagingPort>> {
        self.messaging.as_ref()
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    pub fn resolver(&self) -> Option<ConversationResolver> {
        self.tracker
            .as_ref()
            .map(|tracker| ConversationResolver::new(Arc::clone(tracker)))
    }

    /// Run the workflow for one event.
    ///
    /// # Errors
    /// Returns `DomainError::NotConfigured` when either client is missing.
    /// Outbound failures never surface here; they degrade to an outcome.
    pub async fn handle(&self, event: &WebhookEvent) -> Result<WebhookOutcome, DomainError> {
        info!(
            topic = event.topic.as_deref().unwrap_or("unknown"),
            conversation_id = event.conversation_id.as_deref().unwrap_or("none"),
            "webhook received"
        );

        let Some(tracker) = &self.tracker else {
            error!("Asana client not configured");
            return Err(DomainError::NotConfigured("Asana"));
        };
        let Some(messaging) = &self.messaging else {
            error!("Intercom client not configured");
            return Err(DomainError::NotConfigured("Intercom"));
        };

        let Some(conversation_id) = event.conversation_id.clone() else {
            info!("no conversation id in webhook payload");
            return Ok(WebhookOutcome::NoConversation);
        };

        let resolver = ConversationResolver::new(Arc::clone(tracker));
        let task = match resolver.resolve(&conversation_id).await {
            Resolution::Found(task) => task,
            Resolution::NotFound | Resolution::ListingFailed(_) => {
                info!(conversation_id, "task not found for conversation");
                return Ok(WebhookOutcome::TaskNotFound { conversation_id });
            }
        };

        let link = task_url(tracker.project_id(), &task.task_gid);
        let link_set = match messaging
            .set_conversation_task_link(&conversation_id, &link)
            .await
        {
            Ok(LinkUpdate::AlreadySet | LinkUpdate::Written) => true,
            Err(e) => {
                warn!(conversation_id, task_url = %link, error = %e, "failed to set task link");
                false
            }
        };

        if let Some(author) = event.author_email.as_deref() {
            if self.exclusions.contains(author) {
                info!(
                    conversation_id,
                    task_gid = %task.task_gid,
                    author,
                    "reply author excluded, not moving task"
                );
                return Ok(WebhookOutcome::Skipped {
                    conversation_id,
                    task,
                    author_email: author.to_string(),
                    link_set,
                });
            }
        }

        match tracker.move_task_to_section(&task.task_gid, None).await {
            Ok(true) => {
                info!(conversation_id, task_gid = %task.task_gid, "task moved");
                Ok(WebhookOutcome::Moved {
                    conversation_id,
                    task,
                    link_set,
                })
            }
            Ok(false) => {
                warn!(task_gid = %task.task_gid, "no target section configured");
                Ok(WebhookOutcome::MoveFailed {
                    conversation_id,
                    task,
                    link_set,
                    reason: "no target section configured".to_string(),
                })
            }
            Err(e) => {
                warn!(task_gid = %task.task_gid, error = %e, "failed to move task");
                Ok(WebhookOutcome::MoveFailed {
                    conversation_id,
                    task,
                    link_set,
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeMessaging, FakeTaskTracker, attachment, conversation_url};

    fn event(conversation_id: Option<&str>, author: Option<&str>) -> WebhookEvent {
        WebhookEvent {
            topic: Some("conversation.admin.replied".to_string()),
            conversation_id: conversation_id.map(str::to_string),
            author_email: author.map(str::to_string),
        }
    }

    fn linked_tracker() -> Arc<FakeTaskTracker> {
        Arc::new(
            FakeTaskTracker::new("P1")
                .with_section("S1")
                .with_task(
                    "T1",
                    Some("Refund request"),
                    vec![attachment("att1", Some(&conversation_url("4137")), None)],
                ),
        )
    }

    fn service(
        tracker: &Arc<FakeTaskTracker>,
        messaging: &Arc<FakeMessaging>,
        exclusions: ExclusionList,
    ) -> WebhookService {
        WebhookService::new(
            Some(Arc::clone(tracker) as Arc<dyn TaskTrackerPort>),
            Some(Arc::clone(messaging) as Arc<dyn MessagingPort>),
            exclusions,
        )
    }

    #[tokio::test]
    async fn test_links_and_moves_task() {
        let tracker = linked_tracker();
        let messaging = Arc::new(FakeMessaging::with_conversation("4137", None));
        let service = service(&tracker, &messaging, ExclusionList::default());

        let outcome = service
            .handle(&event(Some("4137"), Some("customer@example.com")))
            .await
            .unwrap();

        match outcome {
            WebhookOutcome::Moved { task, link_set, .. } => {
                assert_eq!(task.task_gid, "T1");
                assert_eq!(task.task_name, "Refund request");
                assert!(link_set);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(tracker.moves(), vec!["move:T1:S1".to_string()]);
        let writes = messaging.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(
            writes[0].1.get("asana_task_url").and_then(|v| v.as_str()),
            Some("https://app.asana.com/0/P1/T1")
        );
    }

    #[tokio::test]
    async fn test_no_conversation_id_makes_no_calls() {
        let tracker = linked_tracker();
        let messaging = Arc::new(FakeMessaging::new());
        let service = service(&tracker, &messaging, ExclusionList::default());

        let outcome = service.handle(&event(None, None)).await.unwrap();

        assert_eq!(outcome, WebhookOutcome::NoConversation);
        assert!(tracker.calls().is_empty());
        assert!(messaging.calls().is_empty());
    }

    #[tokio::test]
    async fn test_excluded_author_links_but_skips_move() {
        let tracker = linked_tracker();
        let messaging = Arc::new(FakeMessaging::with_conversation("4137", None));
        let service = service(
            &tracker,
            &messaging,
            ExclusionList::new(["a.user@example.com"]),
        );

        let outcome = service
            .handle(&event(Some("4137"), Some("A.User@Example.com")))
            .await
            .unwrap();

        match outcome {
            WebhookOutcome::Skipped {
                author_email,
                link_set,
                ..
            } => {
                assert_eq!(author_email, "A.User@Example.com");
                assert!(link_set);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(messaging.writes().len(), 1);
        assert!(tracker.moves().is_empty());
    }

    #[tokio::test]
    async fn test_task_not_found() {
        let tracker = linked_tracker();
        let messaging = Arc::new(FakeMessaging::new());
        let service = service(&tracker, &messaging, ExclusionList::default());

        let outcome = service.handle(&event(Some("999"), None)).await.unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::TaskNotFound {
                conversation_id: "999".to_string()
            }
        );
        assert!(messaging.calls().is_empty());
        assert!(tracker.moves().is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure_reports_not_found() {
        let tracker = Arc::new(FakeTaskTracker::new("P1").failing_listing());
        let messaging = Arc::new(FakeMessaging::new());
        let service = service(&tracker, &messaging, ExclusionList::default());

        let outcome = service.handle(&event(Some("4137"), None)).await.unwrap();

        assert!(matches!(outcome, WebhookOutcome::TaskNotFound { .. }));
    }

    #[tokio::test]
    async fn test_link_failure_does_not_stop_move() {
        let tracker = linked_tracker();
        let messaging = Arc::new(FakeMessaging::with_conversation("4137", None).failing_writes());
        let service = service(&tracker, &messaging, ExclusionList::default());

        let outcome = service.handle(&event(Some("4137"), None)).await.unwrap();

        assert!(matches!(
            outcome,
            WebhookOutcome::Moved {
                link_set: false,
                ..
            }
        ));
        assert_eq!(tracker.moves().len(), 1);
    }

    #[tokio::test]
    async fn test_move_failure_is_an_outcome() {
        let tracker = Arc::new(
            FakeTaskTracker::new("P1")
                .with_section("S1")
                .with_task(
                    "T1",
                    Some("Refund request"),
                    vec![attachment("att1", None, Some(&conversation_url("5")))],
                )
                .failing_moves(),
        );
        let messaging = Arc::new(FakeMessaging::with_conversation("5", None));
        let service = service(&tracker, &messaging, ExclusionList::default());

        let outcome = service.handle(&event(Some("5"), None)).await.unwrap();

        assert!(matches!(outcome, WebhookOutcome::MoveFailed { .. }));
    }

    #[tokio::test]
    async fn test_missing_section_is_move_failure() {
        let tracker = Arc::new(FakeTaskTracker::new("P1").with_task(
            "T1",
            None,
            vec![attachment("att1", None, Some(&conversation_url("5")))],
        ));
        let messaging = Arc::new(FakeMessaging::with_conversation("5", None));
        let service = service(&tracker, &messaging, ExclusionList::default());

        let outcome = service.handle(&event(Some("5"), None)).await.unwrap();

        match outcome {
            WebhookOutcome::MoveFailed { reason, .. } => {
                assert_eq!(reason, "no target section configured");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(tracker.moves().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_clients_are_errors() {
        let messaging = Arc::new(FakeMessaging::new());
        let service = WebhookService::new(
            None,
            Some(Arc::clone(&messaging) as Arc<dyn MessagingPort>),
            ExclusionList::default(),
        );

        let err = service
            .handle(&event(Some("1"), None))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotConfigured("Asana")));
        assert!(messaging.calls().is_empty());

        let tracker = linked_tracker();
        let service = WebhookService::new(
            Some(Arc::clone(&tracker) as Arc<dyn TaskTrackerPort>),
            None,
            ExclusionList::default(),
        );
        let err = service.handle(&event(Some("1"), None)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotConfigured("Intercom")));
        assert!(tracker.calls().is_empty());
    }
}
