//! Conversation references embedded in task attachment URLs.

use regex::Regex;
use std::sync::LazyLock;

/// Base for canonical task links shown to support agents.
pub const ASANA_APP_URL: &str = "https://app.asana.com/0";

static CONVERSATION_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/conversation/(\d+)").expect("valid conversation pattern")
});

/// Extracts the conversation id from a URL containing `/conversation/<digits>`.
///
/// Only the first occurrence is considered.
pub fn extract_conversation_id(url: &str) -> Option<&str> {
    CONVERSATION_PATH
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Canonical browser URL of a task within a project.
pub fn task_url(project_gid: &str, task_gid: &str) -> String {
    format!("{}/{}/{}", ASANA_APP_URL, project_gid, task_gid)
}
