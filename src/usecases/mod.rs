//! Application use cases. Orchestrate domain logic via ports.

pub mod resolver;
pub mod webhook_service;

pub use resolver::{ConversationResolver, Resolution};
pub use webhook_service::{WebhookOutcome, WebhookService};
