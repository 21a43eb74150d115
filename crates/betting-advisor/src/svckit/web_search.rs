//! Web Search Tool

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema};

use crate::search::SearchClient;
use crate::ToolKind;

pub struct WebSearchTool {
    search: Arc<dyn SearchClient>,
}

impl WebSearchTool {
    pub fn new(search: Arc<dyn SearchClient>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: ToolKind::Search.name().into(),
            description: "Search the web for current information: team news, injuries, recent results, form.".into(),
            parameters: vec![ParameterSchema::string("query", "Search query")],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let name = ToolKind::Search.name();
        let query = call.str_arg("query").unwrap_or_default().trim();
        tracing::info!(tool = name, query, "Web search");

        match self.search.search(query).await {
            Ok(text) => Ok(ToolResult::success(name, text)),
            Err(e) => Ok(super::upstream_failure(name, &e)),
        }
    }
}
