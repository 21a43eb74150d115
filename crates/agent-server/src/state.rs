//! Application State

use std::sync::Arc;

use agent_core::{Agent, SessionManager};
use betting_advisor::SetupReport;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Agent with the betting tools registered
    pub agent: Arc<Agent>,

    /// Live chat sessions
    pub sessions: Arc<SessionManager>,

    /// Tools registered or disabled at startup
    pub setup: Arc<SetupReport>,
}
