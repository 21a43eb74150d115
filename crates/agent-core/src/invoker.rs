//! Tool Invoker
//!
//! Runs tool calls behind a wall-clock ceiling. Each call gets its own
//! task, so a handler that errors, hangs, blocks its thread or panics only
//! ever surfaces as a failed [`ToolResult`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;

use crate::error::AgentError;
use crate::status::Status;
use crate::tool::{Tool, ToolCall, ToolRegistry, ToolResult};

/// Default per-invocation ceiling
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(15);

/// Executes tool calls against a registry
#[derive(Clone)]
pub struct ToolInvoker {
    registry: Arc<ToolRegistry>,
    timeout: Duration,
}

impl ToolInvoker {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Invoke one tool with the given call.
    ///
    /// The handler runs on a spawned task and is aborted once the ceiling
    /// passes. A handler that blocks its worker thread still returns on
    /// time under the multi-threaded runtime.
    pub async fn invoke(&self, tool: Arc<dyn Tool>, call: &ToolCall) -> ToolResult {
        let name = call.name.as_str();
        let started = Instant::now();

        if let Err(e) = tool.validate(call) {
            tracing::debug!(tool = %name, error = %e, "Rejected tool arguments");
            return failed(name, &e).with_id(call.id.clone());
        }

        let owned = call.clone();
        let mut task = tokio::spawn(async move { tool.execute(&owned).await });

        let result = match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(Ok(Ok(mut result))) => {
                result.name = name.to_string();
                result
            }
            Ok(Ok(Err(e))) => failed(name, &e),
            Ok(Err(join)) if join.is_panic() => {
                tracing::error!(tool = %name, "Tool handler panicked");
                failed(name, &AgentError::ToolExecution("handler panicked".into()))
            }
            Ok(Err(join)) => failed(name, &AgentError::ToolExecution(join.to_string())),
            Err(_elapsed) => {
                task.abort();
                tracing::warn!(tool = %name, timeout_secs = self.timeout.as_secs(), "Tool timed out");
                ToolResult::failure(
                    name,
                    Status::Error.line(format!(
                        "Tool '{name}' timed out after {}s",
                        self.timeout.as_secs()
                    )),
                )
            }
        };

        tracing::debug!(
            tool = %name,
            succeeded = result.succeeded,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Tool finished"
        );

        result.with_id(call.id.clone())
    }

    /// Look the call up by name and invoke it
    pub async fn invoke_call(&self, call: &ToolCall) -> ToolResult {
        match self.registry.lookup(&call.name) {
            Ok(tool) => self.invoke(tool, call).await,
            Err(e) => {
                tracing::warn!(tool = %call.name, "Model requested an unregistered tool");
                failed(&call.name, &e).with_id(call.id.clone())
            }
        }
    }

    /// Invoke a batch concurrently; results follow request order
    pub async fn invoke_all(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        join_all(calls.iter().map(|call| self.invoke_call(call))).await
    }
}

fn failed(name: &str, err: &AgentError) -> ToolResult {
    ToolResult::failure(name, Status::Error.line(format!("Tool '{name}' failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{BlockingTool, EchoTool, HangingTool, PanickingTool, SlowEchoTool};

    fn invoker_with(tools: Vec<Arc<dyn Tool>>) -> ToolInvoker {
        let mut registry = ToolRegistry::new();
        for tool in tools {
            registry.register_arc(tool).unwrap();
        }
        ToolInvoker::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn successful_call_keeps_id() {
        let invoker = invoker_with(vec![Arc::new(EchoTool::named("echo"))]);
        let call = ToolCall::new("echo").with_arg("text", "hi").with_id("c1");

        let result = invoker.invoke_call(&call).await;
        assert!(result.succeeded);
        assert_eq!(result.output, "hi");
        assert_eq!(result.id.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn hanging_handler_hits_timeout() {
        let invoker = invoker_with(vec![Arc::new(HangingTool)])
            .with_timeout(Duration::from_millis(50));

        let started = Instant::now();
        let result = invoker.invoke_call(&ToolCall::new("hang")).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!result.succeeded);
        assert!(result.output.contains("timed out"));
        assert!(result.output.starts_with(Status::Error.prefix()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn thread_blocking_handler_hits_timeout() {
        let invoker = invoker_with(vec![Arc::new(BlockingTool::for_duration(
            Duration::from_secs(2),
        ))])
        .with_timeout(Duration::from_millis(50));

        let started = Instant::now();
        let result = invoker.invoke_call(&ToolCall::new("block")).await;

        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(!result.succeeded);
        assert!(result.output.contains("timed out"));
    }

    #[tokio::test]
    async fn panicking_handler_becomes_failure() {
        let invoker = invoker_with(vec![Arc::new(PanickingTool)]);
        let result = invoker.invoke_call(&ToolCall::new("panic")).await;

        assert!(!result.succeeded);
        assert!(result.error_detail.unwrap().contains("panicked"));
    }

    #[tokio::test]
    async fn unknown_tool_becomes_failure() {
        let invoker = invoker_with(vec![]);
        let result = invoker.invoke_call(&ToolCall::new("place_bet")).await;

        assert!(!result.succeeded);
        assert!(result.output.contains("Unknown tool: place_bet"));
    }

    #[tokio::test]
    async fn missing_argument_is_reported_not_executed() {
        let invoker = invoker_with(vec![Arc::new(EchoTool::named("echo"))]);
        let result = invoker.invoke_call(&ToolCall::new("echo")).await;

        assert!(!result.succeeded);
        assert!(result.output.contains("Missing required parameter: text"));
    }

    #[tokio::test]
    async fn batch_results_follow_request_order() {
        let invoker = invoker_with(vec![Arc::new(SlowEchoTool)]);
        let calls = vec![
            ToolCall::new("slow_echo").with_arg("text", "first").with_arg("delay_ms", 80),
            ToolCall::new("slow_echo").with_arg("text", "second").with_arg("delay_ms", 0),
            ToolCall::new("missing"),
        ];

        let results = invoker.invoke_all(&calls).await;
        let outputs: Vec<_> = results.iter().map(|r| r.output.as_str()).collect();
        assert_eq!(outputs[0], "first");
        assert_eq!(outputs[1], "second");
        assert!(!results[2].succeeded);
    }
}
