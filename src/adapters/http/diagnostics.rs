//! Operational endpoints: index, health, masked config, connectivity and lookup checks.

use super::AppState;
use crate::shared::config::AppConfig;
use crate::usecases::Resolution;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::warn;

/// Tasks echoed by `/test-asana`.
const SAMPLE_TASKS: usize = 3;

/// GET /
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Intercom Webhook Handler",
        "endpoints": {
            "webhook": "/intercom-webhook",
            "health": "/health",
            "debug": "/debug",
            "test_asana": "/test-asana",
            "test_search": "/test-search/{conversation_id}",
        }
    }))
}

/// GET /health
///
/// Always 200. Reports which settings are present and which clients are live.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let cfg = &state.config;
    let mut status = json!({
        "status": "healthy",
        "asana_client_configured": state.service.tracker().is_some(),
        "intercom_client_configured": state.service.messaging().is_some(),
        "excluded_authors": state.service.exclusions().len(),
        "asana_settings_complete": cfg.is_asana_configured(),
        "intercom_settings_complete": cfg.is_intercom_configured(),
        "environment_check": {
            "ASANA_ACCESS_TOKEN": cfg.asana_token().is_some(),
            "ASANA_PROJECT_GID": cfg.asana_project_gid().is_some(),
            "ASANA_TARGET_SECTION_GID": cfg.asana_target_section_gid().is_some(),
            "INTERCOM_ACCESS_TOKEN": cfg.intercom_token().is_some(),
        },
    });

    if let Some(tracker) = state.service.tracker() {
        status["project_gid"] = json!(tracker.project_id());
        status["target_section_configured"] = json!(tracker.target_section_id().is_some());
    }

    Json(status)
}

/// GET /debug
///
/// Masked configuration. Tokens are never echoed.
pub async fn debug_config(State(state): State<AppState>) -> Json<Value> {
    let cfg = &state.config;
    Json(json!({
        "environment_variables": {
            "ASANA_ACCESS_TOKEN": AppConfig::masked(cfg.asana_token()),
            "ASANA_PROJECT_GID": AppConfig::shown(cfg.asana_project_gid()),
            "ASANA_TARGET_SECTION_GID": AppConfig::shown(cfg.asana_target_section_gid()),
            "ASANA_BASE_URL": cfg.asana_base_url_or_default(),
            "INTERCOM_ACCESS_TOKEN": AppConfig::masked(cfg.intercom_token()),
            "INTERCOM_BASE_URL": cfg.intercom_base_url_or_default(),
            "PORT": cfg.port_or_default(),
            "DEBUG": cfg.debug_enabled(),
        },
        "asana_client_initialized": state.service.tracker().is_some(),
        "intercom_client_initialized": state.service.messaging().is_some(),
        "excluded_authors_count": state.service.exclusions().len(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /test-asana
///
/// Verifies the token works and the project is readable.
pub async fn test_asana(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let Some(tracker) = state.service.tracker() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Asana client not initialized",
                "suggestion": "Check /debug endpoint for environment variables",
            })),
        );
    };

    let user = match tracker.get_current_user().await {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "Asana connectivity check failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Could not get user info from Asana API: {e}"),
                    "suggestion": "Check your Asana token and project GID",
                })),
            );
        }
    };

    let project_id = tracker.project_id();
    let tasks = match tracker.list_project_tasks(project_id).await {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!(project_id, error = %e, "failed to list project tasks");
            Vec::new()
        }
    };
    let sample: Vec<Value> = tasks
        .iter()
        .take(SAMPLE_TASKS)
        .map(|t| json!({"gid": t.gid, "name": t.display_name()}))
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "asana_connection": "OK",
            "user_info": {
                "name": user.name,
                "email": user.email,
                "gid": user.gid,
            },
            "project_info": {
                "project_gid": project_id,
                "tasks_count": tasks.len(),
                "sample_tasks": sample,
            },
            "target_section_gid": tracker.target_section_id(),
        })),
    )
}

/// GET /test-search/{conversation_id}
///
/// Runs the resolver without touching Intercom or moving anything.
pub async fn test_search(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let (Some(resolver), Some(tracker)) = (state.service.resolver(), state.service.tracker())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Asana client not configured"})),
        );
    };

    match resolver.resolve(&conversation_id).await {
        Resolution::Found(task) => {
            let details = match tracker.get_task_details(&task.task_gid).await {
                Ok(details) => json!(details),
                Err(e) => {
                    warn!(task_gid = %task.task_gid, error = %e, "failed to fetch task details");
                    Value::Null
                }
            };
            (
                StatusCode::OK,
                Json(json!({"found": true, "task": task, "details": details})),
            )
        }
        Resolution::NotFound | Resolution::ListingFailed(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({"found": false, "conversation_id": conversation_id})),
        ),
    }
}
