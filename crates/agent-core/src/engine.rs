//! Reasoning Engine Adapter
//!
//! Wraps one provider call and turns the completion into a [`Decision`].
//! Provider failures and unreadable tool requests never escape: they come
//! back as a diagnostic final answer.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::Turn;
use crate::provider::{Completion, GenerationOptions, LlmProvider};
use crate::status::Status;
use crate::tool::{ToolCall, ToolSchema};

const TOOL_FENCE: &str = "```tool";
const FENCE_END: &str = "```";

/// What the model wants to do next
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    FinalAnswer(String),
    /// Calls to run, with any text the model wrote alongside them
    ToolCalls { content: String, calls: Vec<ToolCall> },
}

/// Stateless adapter over an [`LlmProvider`]
#[derive(Clone)]
pub struct ReasoningEngine {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl ReasoningEngine {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    pub const fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Ask the model for the next step given the full context
    pub async fn decide(&self, context: &[Turn], tools: &[ToolSchema]) -> Decision {
        let offered: &[ToolSchema] = if self.provider.supports_native_tools() {
            tools
        } else {
            &[]
        };

        match self.provider.complete(context, offered, &self.options).await {
            Ok(completion) => interpret(completion),
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "Reasoning step failed");
                Decision::FinalAnswer(diagnostic(&e))
            }
        }
    }
}

fn interpret(completion: Completion) -> Decision {
    if !completion.tool_calls.is_empty() {
        return Decision::ToolCalls {
            content: completion.content,
            calls: with_ids(completion.tool_calls),
        };
    }

    match parse_tool_calls(&completion.content) {
        Ok(calls) if !calls.is_empty() => Decision::ToolCalls {
            content: preamble(&completion.content).to_string(),
            calls: with_ids(calls),
        },
        Ok(_) if completion.content.trim().is_empty() => {
            Decision::FinalAnswer(Status::Warning.line("The model returned an empty answer."))
        }
        Ok(_) => Decision::FinalAnswer(completion.content),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding malformed tool request");
            Decision::FinalAnswer(diagnostic(&e))
        }
    }
}

fn diagnostic(err: &AgentError) -> String {
    Status::Error.line(format!(
        "I could not complete the reasoning step. {}",
        err.user_message()
    ))
}

/// Prose written before the first fenced tool block
fn preamble(content: &str) -> &str {
    content
        .find(TOOL_FENCE)
        .map_or("", |start| content[..start].trim())
}

fn with_ids(calls: Vec<ToolCall>) -> Vec<ToolCall> {
    calls
        .into_iter()
        .map(|mut call| {
            if call.id.is_none() {
                call.id = Some(uuid::Uuid::new_v4().to_string());
            }
            call
        })
        .collect()
}

/// Extract tool calls written as fenced ```` ```tool ```` JSON blocks.
///
/// A fenced block that is unterminated or not valid JSON is an error. With
/// no fenced block, a bare JSON object carrying a `"tool"` key is accepted,
/// and anything else is plain text.
pub fn parse_tool_calls(content: &str) -> Result<Vec<ToolCall>> {
    let mut calls = Vec::new();
    let mut rest = content;

    while let Some(start) = rest.find(TOOL_FENCE) {
        let body = &rest[start + TOOL_FENCE.len()..];
        let end = body.find(FENCE_END).ok_or_else(|| {
            AgentError::ModelOutputUnparseable("unterminated tool block".into())
        })?;

        let json = body[..end].trim();
        let call = serde_json::from_str::<ToolCall>(json)
            .map_err(|e| AgentError::ModelOutputUnparseable(format!("{e}: {json}")))?;
        calls.push(call);

        rest = &body[end + FENCE_END.len()..];
    }

    if calls.is_empty() {
        calls.extend(parse_inline_tool_call(content));
    }

    Ok(calls)
}

fn parse_inline_tool_call(content: &str) -> Option<ToolCall> {
    if !content.contains(r#""tool""#) {
        return None;
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }

    serde_json::from_str::<ToolCall>(&content[start..=end]).ok()
}
