//! Odds Connection Tool
//!
//! Checks that the odds credential works and reports the remaining quota.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Status, Tool, ToolCall, ToolResult, ToolSchema};

use crate::odds::OddsClient;
use crate::ToolKind;

pub struct OddsConnectionTool {
    odds: Arc<dyn OddsClient>,
}

impl OddsConnectionTool {
    pub fn new(odds: Arc<dyn OddsClient>) -> Self {
        Self { odds }
    }
}

#[async_trait]
impl Tool for OddsConnectionTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: ToolKind::TestOddsConnection.name().into(),
            description: "Test the connection to the sports odds API and show the remaining request quota.".into(),
            parameters: vec![],
        }
    }

    async fn execute(&self, _call: &ToolCall) -> CoreResult<ToolResult> {
        let name = ToolKind::TestOddsConnection.name();
        match self.odds.sports().await {
            Ok(listing) => {
                let remaining = listing.requests_remaining.as_deref().unwrap_or("N/A");
                tracing::info!(tool = name, provider = self.odds.name(), remaining, "Odds API reachable");
                Ok(ToolResult::success(
                    name,
                    Status::Ok.line(format!(
                        "Odds API connected! {} sports available. Remaining quota: {remaining}",
                        listing.sports.len()
                    )),
                ))
            }
            Err(e) => Ok(super::upstream_failure(name, &e)),
        }
    }
}
