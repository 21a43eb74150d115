//! Service Kit - Agent Tools
//!
//! Domain-specific tools that implement `agent_core::Tool` for the betting advisor.

mod odds_connection;
mod odds_lookup;
mod ping;
mod sports_list;
mod web_search;

pub use odds_connection::OddsConnectionTool;
pub use odds_lookup::OddsLookupTool;
pub use ping::PingTool;
pub use sports_list::SportsListTool;
pub use web_search::WebSearchTool;

use agent_core::{Status, ToolResult};

use crate::error::AdvisorError;

/// Upstream failure as a tool result the model can read
fn upstream_failure(tool: &str, err: &AdvisorError) -> ToolResult {
    tracing::warn!(tool, error = %err, "Upstream call failed");
    ToolResult::failure(tool, Status::Error.line(err))
}
