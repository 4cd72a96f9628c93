//! Port traits. API boundaries for the hexagon.
//!
//! Outbound only: the application calls into the task tracker and the
//! messaging system. The inbound side is the HTTP adapter.

pub mod messaging;
pub mod task_tracker;

pub use messaging::{MessagingPort, TASK_LINK_ATTRIBUTE};
pub use task_tracker::TaskTrackerPort;
