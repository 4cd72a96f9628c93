//! `POST /intercom-webhook`: parse the delivery and hand it to the webhook service.

use super::AppState;
use crate::domain::WebhookEvent;
use crate::usecases::WebhookOutcome;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::{debug, error, warn};

pub async fn handle_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    if body.iter().all(u8::is_ascii_whitespace) {
        warn!("webhook without body");
        return (StatusCode::BAD_REQUEST, Json(json!({"status": "no data"})));
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "webhook body is not valid JSON");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": "error", "message": format!("Invalid JSON body: {e}")})),
            );
        }
    };
    if is_empty_payload(&payload) {
        warn!("webhook JSON carries no data");
        return (StatusCode::BAD_REQUEST, Json(json!({"status": "no data"})));
    }
    debug!(payload = %payload, "webhook payload");

    let event = WebhookEvent::from_payload(&payload);
    match state.service.handle(&event).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome_body(&outcome))),
        Err(e) => {
            error!(error = %e, "webhook not processed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": e.to_string()})),
            )
        }
    }
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
    }
}

/// Response body for each outcome.
pub fn outcome_body(outcome: &WebhookOutcome) -> Value {
    match outcome {
        WebhookOutcome::NoConversation => json!({
            "status": "ok",
            "message": "No conversation ID found",
        }),
        WebhookOutcome::TaskNotFound { conversation_id } => json!({
            "status": "ok",
            "task_found": false,
            "conversation_id": conversation_id,
            "message": format!("Task with conversation ID {conversation_id} not found"),
        }),
        WebhookOutcome::Skipped {
            conversation_id,
            task,
            author_email,
            link_set,
        } => json!({
            "status": "skipped",
            "task_found": true,
            "task_moved": false,
            "task_gid": task.task_gid,
            "task_name": task.task_name,
            "conversation_id": conversation_id,
            "author_email": author_email,
            "link_set": link_set,
            "message": "Reply author is excluded; task linked but not moved",
        }),
        WebhookOutcome::Moved {
            conversation_id,
            task,
            link_set,
        } => json!({
            "status": "ok",
            "task_found": true,
            "task_moved": true,
            "task_gid": task.task_gid,
            "task_name": task.task_name,
            "conversation_id": conversation_id,
            "link_set": link_set,
        }),
        WebhookOutcome::MoveFailed {
            conversation_id,
            task,
            link_set,
            reason,
        } => json!({
            "status": "ok",
            "task_found": true,
            "task_moved": false,
            "task_gid": task.task_gid,
            "task_name": task.task_name,
            "conversation_id": conversation_id,
            "link_set": link_set,
            "error": "Failed to move task",
            "reason": reason,
        }),
    }
}
