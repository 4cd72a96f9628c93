//! Wiring & DI. Entry point: load config, bootstrap adapters, inject into services, serve HTTP.
//! No business logic here; the workflow lives in WebhookService.

use dotenv::dotenv;
use intercom_asana_bridge::adapters::http::{AppState, router};
use intercom_asana_bridge::adapters::integrations::{AsanaAdapter, IntercomAdapter};
use intercom_asana_bridge::ports::{MessagingPort, TaskTrackerPort};
use intercom_asana_bridge::shared::config::AppConfig;
use intercom_asana_bridge::usecases::WebhookService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    let loaded = AppConfig::load();
    let cfg = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };

    let default_level = if cfg.debug_enabled() { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }
    if let Err(e) = &loaded {
        warn!(error = %e, "config could not be loaded, continuing with defaults");
    }

    // --- Outbound clients: either may be missing; the webhook then answers 500 ---
    let tracker = connect_asana(&cfg).await;
    let messaging = connect_intercom(&cfg).await;

    let exclusions = cfg.exclusion_list();
    info!(excluded_authors = exclusions.len(), "author exclusion list loaded");

    let service = WebhookService::new(tracker, messaging, exclusions);
    let port = cfg.port_or_default();
    let app = router(AppState::new(service, cfg));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| anyhow::anyhow!("bind port {}: {}", port, e))?;
    info!(port, "listening for Intercom webhooks");
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}

/// Build the Asana adapter and check the token against `/users/me`.
/// Returns None (client disabled) when credentials are missing or the check fails.
async fn connect_asana(cfg: &AppConfig) -> Option<Arc<dyn TaskTrackerPort>> {
    let (Some(token), Some(project)) = (cfg.asana_token(), cfg.asana_project_gid()) else {
        error!(
            token_set = cfg.asana_token().is_some(),
            project_set = cfg.asana_project_gid().is_some(),
            "Asana client not initialized: ASANA_ACCESS_TOKEN and ASANA_PROJECT_GID are required"
        );
        return None;
    };

    let adapter = match AsanaAdapter::new(
        cfg.asana_base_url_or_default(),
        token.to_string(),
        project.to_string(),
        cfg.asana_target_section_gid().map(str::to_string),
    ) {
        Ok(adapter) => adapter,
        Err(e) => {
            error!(error = %e, "Asana client not initialized");
            return None;
        }
    };

    match adapter.get_current_user().await {
        Ok(user) => info!(
            user = user.name.as_deref().unwrap_or("unknown"),
            project,
            target_section = cfg.asana_target_section_gid().unwrap_or("not set"),
            "Asana client initialized"
        ),
        Err(e) => {
            error!(error = %e, "Asana connectivity check failed; client disabled");
            return None;
        }
    }
    if cfg.asana_target_section_gid().is_none() {
        warn!("ASANA_TARGET_SECTION_GID not set; tasks will be linked but never moved");
    }

    Some(Arc::new(adapter))
}

/// Build the Intercom adapter and check the token against `/me`.
async fn connect_intercom(cfg: &AppConfig) -> Option<Arc<dyn MessagingPort>> {
    let Some(token) = cfg.intercom_token() else {
        error!("Intercom client not initialized: INTERCOM_ACCESS_TOKEN is required");
        return None;
    };

    let adapter = match IntercomAdapter::new(cfg.intercom_base_url_or_default(), token.to_string())
    {
        Ok(adapter) => adapter,
        Err(e) => {
            error!(error = %e, "Intercom client not initialized");
            return None;
        }
    };

    match adapter.get_current_admin().await {
        Ok(me) => info!(
            admin = me.get("name").and_then(|v| v.as_str()).unwrap_or("unknown"),
            kind = me.get("type").and_then(|v| v.as_str()).unwrap_or("unknown"),
            "Intercom client initialized"
        ),
        Err(e) => {
            error!(error = %e, "Intercom connectivity check failed; client disabled");
            return None;
        }
    }

    Some(Arc::new(adapter))
}
