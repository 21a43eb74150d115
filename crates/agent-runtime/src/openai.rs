//! OpenAI-compatible LLM Provider
//!
//! Implementation of `LlmProvider` over `/chat/completions`. Works with
//! OpenAI itself and with Ollama's OpenAI-compatible endpoint.

use std::collections::HashMap;
use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::{Role, Turn},
    provider::{Completion, GenerationOptions, LlmProvider, TokenUsage},
    tool::{ToolCall, ToolSchema},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// Provider name used in logs
    pub name: String,

    /// API base URL, without the trailing `/chat/completions`
    pub base_url: String,

    /// Bearer credential
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Send tool schemas as native function definitions
    pub native_tools: bool,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            name: "openai".into(),
            base_url: "https://api.openai.com/v1".into(),
            api_key: String::new(),
            timeout_secs: 120,
            native_tools: true,
        }
    }
}

impl OpenAiConfig {
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Local Ollama through its OpenAI-compatible endpoint
    pub fn ollama(base_url: Option<&str>) -> Self {
        Self {
            name: "ollama".into(),
            base_url: base_url.unwrap_or("http://localhost:11434/v1").into(),
            api_key: "ollama".into(),
            ..Default::default()
        }
    }

    /// Read `OPENAI_API_KEY` (required), `OPENAI_BASE_URL` and
    /// `OPENAI_NATIVE_TOOLS`. With `LLM_PROVIDER=ollama` no key is needed and
    /// `OLLAMA_BASE_URL` picks the server.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = if get("LLM_PROVIDER").is_some_and(|p| p.eq_ignore_ascii_case("ollama")) {
            Self::ollama(get("OLLAMA_BASE_URL").as_deref())
        } else {
            let api_key = get("OPENAI_API_KEY")
                .ok_or_else(|| AgentError::ConfigurationMissing("OPENAI_API_KEY".into()))?;
            let mut config = Self::openai(api_key);
            if let Some(base_url) = get("OPENAI_BASE_URL") {
                config.base_url = base_url;
            }
            config
        };

        if let Some(native) = get("OPENAI_NATIVE_TOOLS").and_then(|v| v.parse().ok()) {
            config.native_tools = native;
        }

        Ok(config)
    }
}

/// OpenAI-compatible LLM provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(mut config: OpenAiConfig) -> Result<Self> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Other(format!("HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenAiConfig::from_env()?)
    }

    pub const fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Convert agent turns to wire messages
    fn to_api_messages(turns: &[Turn], native_tools: bool) -> Vec<ApiMessage> {
        turns
            .iter()
            .map(|turn| match turn.role {
                Role::Assistant if !turn.tool_calls.is_empty() => {
                    if native_tools {
                        ApiMessage {
                            role: "assistant".into(),
                            content: (!turn.content.is_empty()).then(|| turn.content.clone()),
                            tool_calls: Some(turn.tool_calls.iter().map(ApiToolCall::from).collect()),
                            tool_call_id: None,
                        }
                    } else {
                        ApiMessage::text("assistant", render_tool_blocks(turn))
                    }
                }
                Role::Tool if native_tools && turn.tool_call_id.is_some() => ApiMessage {
                    role: "tool".into(),
                    content: Some(turn.content.clone()),
                    tool_calls: None,
                    tool_call_id: turn.tool_call_id.clone(),
                },
                // Without native tools, results come back as user context
                Role::Tool => ApiMessage::text(
                    "user",
                    format!(
                        "[Tool '{}' returned]\n{}",
                        turn.tool_name.as_deref().unwrap_or("tool"),
                        turn.content
                    ),
                ),
                role => ApiMessage::text(&role.to_string(), turn.content.clone()),
            })
            .collect()
    }

    /// Convert tool schemas to function definitions
    fn to_api_tools(tools: &[ToolSchema]) -> Vec<serde_json::Value> {
        tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.input_schema(),
                    }
                })
            })
            .collect()
    }

    fn parse_tool_call(call: ApiToolCall) -> Result<ToolCall> {
        let raw = call.function.arguments.trim();
        let arguments: HashMap<String, serde_json::Value> = if raw.is_empty() {
            HashMap::new()
        } else {
            serde_json::from_str(raw).map_err(|e| {
                AgentError::ModelOutputUnparseable(format!(
                    "arguments for '{}': {e}",
                    call.function.name
                ))
            })?
        };

        Ok(ToolCall {
            name: call.function.name,
            arguments,
            id: Some(call.id),
        })
    }

    fn convert_completion(response: ApiResponse) -> Result<Completion> {
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            AgentError::ModelOutputUnparseable("no choices in response".into())
        })?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(Self::parse_tool_call)
            .collect::<Result<Vec<_>>>()?;

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            model: response.model,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}

fn render_tool_blocks(turn: &Turn) -> String {
    let mut text = turn.content.clone();
    for call in &turn.tool_calls {
        let block = serde_json::json!({"tool": call.name, "arguments": call.arguments});
        text.push_str(&format!("\n```tool\n{block}\n```"));
    }
    text.trim_start().to_string()
}

fn status_error(status: u16, body: String) -> AgentError {
    match status {
        401 | 403 => AgentError::Unauthorized("invalid API key or insufficient permissions".into()),
        429 => AgentError::QuotaExceeded("rate limit or quota reached".into()),
        _ => AgentError::Provider {
            status,
            message: body,
        },
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn supports_native_tools(&self) -> bool {
        self.config.native_tools
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.base_url);
        match self.client.get(&url).bearer_auth(&self.config.api_key).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!(provider = %self.config.name, "Health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        turns: &[Turn],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let mut body = serde_json::json!({
            "model": options.model,
            "messages": Self::to_api_messages(turns, self.config.native_tools),
            "temperature": options.temperature,
        });
        if let Some(max_tokens) = options.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        if self.config.native_tools && !tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(tools));
        }

        tracing::debug!(provider = %self.config.name, model = %options.model, turns = turns.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status, body = %error_body, "Provider returned error");
            return Err(status_error(status, error_body));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| AgentError::ModelOutputUnparseable(format!("response body: {e}")))?;

        Self::convert_completion(api_response)
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl ApiMessage {
    fn text(role: &str, content: String) -> Self {
        Self {
            role: role.into(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: ApiFunction,
}

fn function_type() -> String {
    "function".into()
}

impl From<&ToolCall> for ApiToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone().unwrap_or_default(),
            kind: function_type(),
            function: ApiFunction {
                name: call.name.clone(),
                arguments: serde_json::to_string(&call.arguments).unwrap_or_else(|_| "{}".into()),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
