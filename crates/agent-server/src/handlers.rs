//! HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use agent_core::{SessionId, Termination, ToolSchema};
use betting_advisor::{SetupReport, QUICK_ACTIONS, WELCOME_MESSAGE};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
    pub reasoning_engine_connected: bool,
    pub tools: SetupReport,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub session_id: String,
    pub termination: Termination,
    pub iterations: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub welcome: String,
}

#[derive(Debug, Serialize)]
pub struct QuickAction {
    pub label: &'static str,
    pub prompt: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// Handler error rendered as `{error, code}` JSON
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.into(),
                code,
            },
        }
    }

    fn session_not_found(id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "SESSION_NOT_FOUND",
            format!("Unknown session: {id}"),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.agent.provider();
    let reasoning_engine_connected = provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: provider.name().to_string(),
        model: state.agent.config().generation.model.clone(),
        reasoning_engine_connected,
        tools: (*state.setup).clone(),
    })
}

/// Registered tool descriptors
pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolSchema>> {
    Json(state.agent.tools().list_descriptors())
}

/// Canned prompts for one-click questions
pub async fn quick_actions() -> Json<Vec<QuickAction>> {
    Json(
        QUICK_ACTIONS
            .iter()
            .map(|&(label, prompt)| QuickAction { label, prompt })
            .collect(),
    )
}

/// Start a new conversation
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let (id, _) = state.sessions.create().await;
    tracing::info!(session_id = %id, "Session created");

    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: id.to_string(),
            welcome: WELCOME_MESSAGE.to_string(),
        }),
    )
}

/// Clear a conversation
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let handle = state
        .sessions
        .get(&SessionId::from_string(id.as_str()))
        .await
        .ok_or_else(|| ApiError::session_not_found(&id))?;

    handle.lock().await.reset();
    tracing::info!(session_id = %id, "Session reset");
    Ok(StatusCode::NO_CONTENT)
}

/// End a conversation and free its history
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.sessions.remove(&SessionId::from_string(id.as_str())).await {
        return Err(ApiError::session_not_found(&id));
    }

    tracing::info!(session_id = %id, "Session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Main chat endpoint
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "EMPTY_MESSAGE",
            "Message must not be empty",
        ));
    }

    let (id, handle) = match payload.session_id.as_deref() {
        Some(raw) => {
            let id = SessionId::from_string(raw);
            let handle = state
                .sessions
                .get(&id)
                .await
                .ok_or_else(|| ApiError::session_not_found(raw))?;
            (id, handle)
        }
        None => state.sessions.create().await,
    };

    // Held for the whole run: one run at a time per session
    let mut session = handle.lock().await;
    let outcome = state.agent.run(&mut session, message).await;

    Ok(Json(ChatResponse {
        message: outcome.answer,
        session_id: id.to_string(),
        termination: outcome.termination,
        iterations: outcome.iterations,
    }))
}
