//! Scripted provider and toy tools shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::message::Turn;
use crate::provider::{Completion, GenerationOptions, LlmProvider};
use crate::tool::{ParameterSchema, Tool, ToolCall, ToolResult, ToolSchema};

/// Replays queued completions, then repeats `fallback` (or errors)
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<Completion>>>,
    fallback: Option<Completion>,
    native_tools: bool,
    seen: Mutex<Vec<Vec<Turn>>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<Completion>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            native_tools: true,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `completion`
    pub fn repeating(completion: Completion) -> Self {
        let mut provider = Self::new(Vec::new());
        provider.fallback = Some(completion);
        provider
    }

    pub fn without_native_tools(mut self) -> Self {
        self.native_tools = false;
        self
    }

    /// Contexts passed to each `complete` call
    pub fn seen(&self) -> Vec<Vec<Turn>> {
        self.seen.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn supports_native_tools(&self) -> bool {
        self.native_tools
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        turns: &[Turn],
        _tools: &[ToolSchema],
        _options: &GenerationOptions,
    ) -> Result<Completion> {
        self.seen.lock().unwrap().push(turns.to_vec());
        let next = self.script.lock().unwrap().pop_front();
        match (next, &self.fallback) {
            (Some(step), _) => step,
            (None, Some(fallback)) => Ok(fallback.clone()),
            (None, None) => Err(AgentError::Other("script exhausted".into())),
        }
    }
}

/// Returns its `text` argument and counts invocations
pub struct EchoTool {
    name: String,
    calls: Arc<AtomicUsize>,
}

impl EchoTool {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name.clone(),
            description: "Echo the given text".into(),
            parameters: vec![ParameterSchema::string("text", "Text to echo")],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ToolResult::success(&self.name, call.str_arg("text").unwrap_or_default()))
    }
}

/// Echo after `delay_ms`
pub struct SlowEchoTool;

#[async_trait]
impl Tool for SlowEchoTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "slow_echo".into(),
            description: "Echo after a delay".into(),
            parameters: vec![ParameterSchema::string("text", "Text to echo")],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let delay = call.arguments.get("delay_ms").and_then(serde_json::Value::as_u64).unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(ToolResult::success("slow_echo", call.str_arg("text").unwrap_or_default()))
    }
}

/// Never finishes
pub struct HangingTool;

#[async_trait]
impl Tool for HangingTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "hang".into(),
            description: "Sleeps forever".into(),
            parameters: vec![],
        }
    }

    async fn execute(&self, _call: &ToolCall) -> Result<ToolResult> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(ToolResult::success("hang", "woke up"))
    }
}

/// Blocks its worker thread without yielding
pub struct BlockingTool {
    duration: Duration,
}

impl BlockingTool {
    pub const fn for_duration(duration: Duration) -> Self {
        Self { duration }
    }
}

#[async_trait]
impl Tool for BlockingTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "block".into(),
            description: "Blocks the thread".into(),
            parameters: vec![],
        }
    }

    async fn execute(&self, _call: &ToolCall) -> Result<ToolResult> {
        std::thread::sleep(self.duration);
        Ok(ToolResult::success("block", "done"))
    }
}

/// Panics inside the handler
pub struct PanickingTool;

#[async_trait]
impl Tool for PanickingTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "panic".into(),
            description: "Always panics".into(),
            parameters: vec![],
        }
    }

    async fn execute(&self, _call: &ToolCall) -> Result<ToolResult> {
        panic!("upstream returned garbage")
    }
}
