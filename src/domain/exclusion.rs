//! Reply authors whose messages must not move tasks.

use std::collections::HashSet;

/// Immutable set of lower-cased e-mail addresses. Built once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    emails: HashSet<String>,
}

impl ExclusionList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    /// Parses a comma-separated list, e.g. from `EXCLUDED_AUTHOR_EMAILS`.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// Case-insensitive membership check.
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}
