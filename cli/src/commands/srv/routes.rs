//! # Helpdesk HTTP Routes
//!
//! File: cli/src/commands/srv/routes.rs
//!
//! ## Overview
//!
//! JSON endpoints served by `helpdesk srv`. Every handler shares one
//! `ResponseRegistry` through axum state.
//!
//! | Method | Path         | Purpose                                  |
//! |--------|--------------|------------------------------------------|
//! | GET    | `/health`    | Liveness and version                     |
//! | POST   | `/chat`      | Answer `{"message": ...}`                |
//! | GET    | `/responses` | Dump the response table                  |
//! | POST   | `/responses` | Add `{"trigger": ..., "response": ...}`  |
//!
//! Request problems map to 400 with an `error` field. A registry that cannot
//! be read maps to 500. Unknown paths get 404 and known paths with the wrong
//! method get 405, both as JSON.
//!
use crate::core::registry::ResponseRegistry;
use crate::core::validation::{normalize, UserInput};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Shared handler state.
pub type AppState = Arc<ResponseRegistry>;

const SERVICE_NAME: &str = "Helpdesk Contact Center";
const ENDPOINTS: [&str; 3] = ["/chat", "/health", "/responses"];

/// Errors a handler can answer with.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] crate::core::registry::RegistryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                warn!("Rejected request: {}", message);
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(source) => {
                error!("Response table error: {}", source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error", "status": "error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::BadRequest("Content-Type must be application/json".to_string())
            }
            other => ApiError::BadRequest(format!("Malformed JSON body: {}", other.body_text())),
        }
    }
}

/// # Build Router (`router`)
///
/// Wires the endpoints and JSON fallbacks around `registry`.
///
/// ## Arguments
///
/// * `registry`: The shared table every handler reads and writes.
///
/// ## Returns
///
/// * `Router`: Ready to serve, without middleware. `server_logic::create_app`
///   adds tracing and CORS on top.
pub fn router(registry: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/responses", get(list_responses).post(add_response))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(registry)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// True for the JSON values treated as absent: `null`, `false`, zero, and
/// empty strings, arrays and objects.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Pulls the JSON payload out of the request, rejecting blank bodies.
fn require_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    let Json(body) = payload?;
    if is_blank(&body) {
        return Err(ApiError::BadRequest("Empty request body".to_string()));
    }
    Ok(body)
}

/// # Chat Endpoint (`POST /chat`)
///
/// Answers `{"message": ...}` with `{"response": ..., "status": "success"}`.
/// A blank or missing `message` is a 400. Any other non-string value is
/// still looked up and gets the invalid-input reply.
///
/// ## Errors
///
/// * `ApiError::BadRequest` for an unreadable, blank or message-less body.
/// * `ApiError::Internal` when the response table is unavailable.
async fn chat(
    State(registry): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = require_body(payload)?;

    let message = body
        .get("message")
        .filter(|value| !is_blank(value))
        .cloned()
        .ok_or_else(|| ApiError::BadRequest("Message field is required".to_string()))?;

    let input = UserInput::from(message);
    let reply = registry.resolve(input.clone())?.into_text();
    if let Some(text) = input.as_text() {
        let head: String = text.chars().take(50).collect();
        info!("Processed message: {}...", head);
    }

    Ok(Json(json!({ "response": reply, "status": "success" })))
}

async fn list_responses(State(registry): State<AppState>) -> Json<Value> {
    let responses = registry.list();
    Json(json!({ "count": responses.len(), "responses": responses }))
}

/// # Add Response Endpoint (`POST /responses`)
///
/// Stores `{"trigger": ..., "response": ...}` and answers 201 with the
/// normalized trigger.
///
/// ## Errors
///
/// * `ApiError::BadRequest` when the trigger or response is missing or
///   rejected by the registry.
/// * `ApiError::Internal` when the response table is unavailable.
async fn add_response(
    State(registry): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let body = require_body(payload)?;
    let trigger = UserInput::from(body.get("trigger").cloned());
    let response = body.get("response").and_then(Value::as_str).unwrap_or("");

    if !registry.try_insert(trigger.clone(), response)? {
        return Err(ApiError::BadRequest(
            "Trigger and response are required".to_string(),
        ));
    }

    let key = trigger.as_text().map(normalize).unwrap_or_default();
    Ok((
        StatusCode::CREATED,
        Json(json!({ "trigger": key, "status": "created" })),
    ))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "available_endpoints": ENDPOINTS,
        })),
    )
}

async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
