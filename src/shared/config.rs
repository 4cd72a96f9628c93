//! Application configuration. API credentials, project ids, listen port.

use crate::domain::ExclusionList;
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 8080;

/// Shown by `/debug` in place of secrets.
pub const MASKED: &str = "***hidden***";
pub const NOT_SET: &str = "not set";

/// Raw settings, read once at startup and immutable afterwards.
///
/// Every field is kept as an optional string; typed accessors below apply
/// defaults so a malformed value never prevents startup.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Asana
    // ─────────────────────────────────────────────────────────────────────────
    /// Personal access token. Read from ASANA_ACCESS_TOKEN.
    #[serde(default)]
    pub asana_access_token: Option<String>,

    /// Project scanned for conversation links. Read from ASANA_PROJECT_GID.
    #[serde(default)]
    pub asana_project_gid: Option<String>,

    /// Section tasks are moved into. Read from ASANA_TARGET_SECTION_GID.
    #[serde(default)]
    pub asana_target_section_gid: Option<String>,

    /// API root override (tests, proxies). Read from ASANA_BASE_URL.
    #[serde(default)]
    pub asana_base_url: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Intercom
    // ─────────────────────────────────────────────────────────────────────────
    /// Access token. Read from INTERCOM_ACCESS_TOKEN.
    #[serde(default)]
    pub intercom_access_token: Option<String>,

    /// API root override. Read from INTERCOM_BASE_URL.
    #[serde(default)]
    pub intercom_base_url: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Service
    // ─────────────────────────────────────────────────────────────────────────
    /// Comma-separated reply authors whose messages never move tasks.
    /// Read from EXCLUDED_AUTHOR_EMAILS.
    #[serde(default)]
    pub excluded_author_emails: Option<String>,

    /// Listen port. Read from PORT.
    #[serde(default)]
    pub port: Option<String>,

    /// `true` raises the default log level to debug. Read from DEBUG.
    #[serde(default)]
    pub debug: Option<String>,
}

impl AppConfig {
    /// Load from `.env`, the process environment and, if `BRIDGE_CONFIG` names one,
    /// a config file. Environment wins over the file.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("BRIDGE_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c = c.add_source(config::Environment::default());
        c.build()?.try_deserialize()
    }

    pub fn asana_token(&self) -> Option<&str> {
        non_empty(&self.asana_access_token)
    }

    pub fn asana_project_gid(&self) -> Option<&str> {
        non_empty(&self.asana_project_gid)
    }

    pub fn asana_target_section_gid(&self) -> Option<&str> {
        non_empty(&self.asana_target_section_gid)
    }

    pub fn intercom_token(&self) -> Option<&str> {
        non_empty(&self.intercom_access_token)
    }

    /// Returns the Asana API root. Defaults to the public endpoint.
    pub fn asana_base_url_or_default(&self) -> String {
        non_empty(&self.asana_base_url)
            .unwrap_or(crate::adapters::integrations::ASANA_API_URL)
            .to_string()
    }

    /// Returns the Intercom API root. Defaults to the public endpoint.
    pub fn intercom_base_url_or_default(&self) -> String {
        non_empty(&self.intercom_base_url)
            .unwrap_or(crate::adapters::integrations::INTERCOM_API_URL)
            .to_string()
    }

    /// Returns the listen port. Defaults to 8080 if unset or invalid.
    pub fn port_or_default(&self) -> u16 {
        non_empty(&self.port)
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn debug_enabled(&self) -> bool {
        non_empty(&self.debug).is_some_and(|d| d.trim().eq_ignore_ascii_case("true"))
    }

    pub fn exclusion_list(&self) -> ExclusionList {
        non_empty(&self.excluded_author_emails)
            .map(ExclusionList::parse)
            .unwrap_or_default()
    }

    /// Asana needs both a token and a project.
    pub fn is_asana_configured(&self) -> bool {
        self.asana_token().is_some() && self.asana_project_gid().is_some()
    }

    pub fn is_intercom_configured(&self) -> bool {
        self.intercom_token().is_some()
    }

    /// Presence of a secret, never its value.
    pub fn masked(value: Option<&str>) -> &'static str {
        if value.is_some() { MASKED } else { NOT_SET }
    }

    /// Plain identifier for display, or `NOT_SET`.
    pub fn shown(value: Option<&str>) -> &str {
        value.unwrap_or(NOT_SET)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
