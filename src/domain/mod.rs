//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod conversation_ref;
pub mod entities;
pub mod errors;
pub mod event;
pub mod exclusion;

pub use conversation_ref::{extract_conversation_id, task_url};
pub use entities::{
    AsanaUser, Attachment, Conversation, ConversationPart, LinkUpdate, NamedRef, PartAuthor,
    ResolvedTask, TaskDetails, TaskSummary,
};
pub use errors::DomainError;
pub use event::WebhookEvent;
pub use exclusion::ExclusionList;
