//! PronosAI HTTP Server
//!
//! Axum-based server exposing the betting advisor agent over a REST API.
//! Each chat session keeps its own conversation; runs inside one session
//! are serialized.

mod config;
mod handlers;
mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{AgentBuilder, LlmProvider, SessionManager};
use agent_runtime::OpenAiProvider;
use betting_advisor::{AdvisorConfig, BETTING_ADVISOR_PROMPT};

use crate::config::ServerConfig;
use crate::handlers::{
    chat_handler, create_session, delete_session, health_check, list_tools, quick_actions,
    reset_session,
};
use crate::state::AppState;

pub(crate) fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/tools", get(list_tools))
        .route("/api/quick-actions", get(quick_actions))
        // Sessions
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", delete(delete_session))
        .route("/api/sessions/{id}/reset", post(reset_session))
        // Agent API
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Periodically drop sessions idle for longer than `max_idle`
fn spawn_session_sweeper(sessions: Arc<SessionManager>, max_idle: Duration) {
    let period = (max_idle / 4).clamp(Duration::from_secs(1), Duration::from_secs(300));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            sessions.prune_idle(max_idle).await;
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_config = ServerConfig::from_env()?;
    let advisor_config = AdvisorConfig::from_env();

    // Reasoning engine; a missing key aborts startup
    let provider = Arc::new(OpenAiProvider::from_env()?);
    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to {}", provider.name()),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ {} not reachable - answers will carry a diagnostic", provider.name());
        }
    }

    // Tools, gated on their credentials
    let (tools, setup) = betting_advisor::build_registry(&advisor_config)?;
    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }
    for disabled in &setup.disabled {
        tracing::warn!("  ⚠ {} disabled (set {})", disabled.tool.name(), disabled.missing);
    }

    let agent_config = server_config.agent_config(BETTING_ADVISOR_PROMPT)?;
    tracing::info!(origin = ?agent_config.system_prompt.origin(), "System prompt selected");
    let agent = AgentBuilder::new()
        .provider(provider)
        .tools(tools)
        .system_prompt(agent_config.system_prompt)
        .generation(agent_config.generation)
        .max_iterations(agent_config.max_iterations)
        .history_window(agent_config.history_window)
        .tool_timeout(agent_config.tool_timeout)
        .build()?;

    let state = AppState {
        agent: Arc::new(agent),
        sessions: Arc::new(SessionManager::new()),
        setup: Arc::new(setup),
    };

    spawn_session_sweeper(Arc::clone(&state.sessions), server_config.session_idle);

    let app = build_router(state);

    // Start server
    let addr = server_config.bind_addr;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 PronosAI server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                  - Health check");
    tracing::info!("  GET  /api/tools               - Registered tools");
    tracing::info!("  GET  /api/quick-actions       - Shortcut prompts");
    tracing::info!("  POST /api/sessions            - New session");
    tracing::info!("  POST /api/sessions/{{id}}/reset - Clear session");
    tracing::info!("  DELETE /api/sessions/{{id}}     - End session");
    tracing::info!("  POST /api/chat                - Send message");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
