//! Agent Loop
//!
//! Bounded reason/act cycle:
//!
//! ```text
//!            ToolCalls                 results appended
//! Reasoning ──────────▶ Invoking ─────────────────────▶ Reasoning
//!     │ FinalAnswer                                        │ iteration_count == max
//!     ▼                                                    ▼
//!   Done                                                Aborted
//! ```
//!
//! Every run ends in `Done` or `Aborted` and always yields text.

use std::sync::Arc;
use std::time::Duration;

use crate::engine::{Decision, ReasoningEngine};
use crate::error::{AgentError, Result};
use crate::invoker::{DEFAULT_TOOL_TIMEOUT, ToolInvoker};
use crate::message::Turn;
use crate::prompt::PromptTemplate;
use crate::provider::{GenerationOptions, LlmProvider};
use crate::session::Session;
use crate::status::Status;
use crate::tool::{Tool, ToolCall, ToolRegistry};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt
    pub system_prompt: PromptTemplate,

    /// Reasoning rounds allowed to end in tool calls
    pub max_iterations: usize,

    /// Past turns included in each run's context
    pub history_window: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Per-invocation tool ceiling
    pub tool_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: PromptTemplate::local_default(DEFAULT_SYSTEM_PROMPT),
            max_iterations: 3,
            history_window: 10,
            generation: GenerationOptions::default(),
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. \
Use the available tools when they help, then answer concisely.";

/// Loop states
#[derive(Clone, Debug, PartialEq)]
pub enum LoopState {
    Reasoning,
    Invoking { content: String, calls: Vec<ToolCall> },
    Done(String),
    Aborted,
}

/// How a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Done,
    Aborted,
}

/// Per-run state, owned by a single invocation of [`Agent::run`]
#[derive(Debug)]
pub struct AgentRunState {
    pub context: Vec<Turn>,
    pub iteration_count: usize,
    pub max_iterations: usize,
    last_tool_output: Option<String>,
}

impl AgentRunState {
    fn new(context: Vec<Turn>, max_iterations: usize) -> Self {
        Self {
            context,
            iteration_count: 0,
            max_iterations,
            last_tool_output: None,
        }
    }

    const fn exhausted(&self) -> bool {
        self.iteration_count >= self.max_iterations
    }
}

/// Result of one run
#[derive(Clone, Debug)]
pub struct AgentOutcome {
    pub answer: String,
    pub termination: Termination,
    pub iterations: usize,
    pub tool_calls: usize,
}

/// The main Agent struct
pub struct Agent {
    engine: ReasoningEngine,
    invoker: ToolInvoker,
    config: AgentConfig,
}

impl Agent {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            engine: ReasoningEngine::new(provider, config.generation.clone()),
            invoker: ToolInvoker::new(tools).with_timeout(config.tool_timeout),
            config,
        }
    }

    /// Build the full system prompt, describing tools in text when the
    /// provider cannot take them natively
    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.text().to_string();
        let tools = self.invoker.registry();

        if !self.engine.provider().supports_native_tools() && !tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&tools.generate_prompt_section());
        }

        prompt
    }

    fn build_context(&self, session: &Session, user_turn: &Turn) -> Vec<Turn> {
        let history = session.conversation().recent(self.config.history_window);
        let mut context = Vec::with_capacity(history.len() + 2);
        context.push(Turn::system(self.build_system_prompt()));
        context.extend_from_slice(history);
        context.push(user_turn.clone());
        context
    }

    /// Answer `input` within `session`.
    ///
    /// The session only gains the user turn and the final answer. Tool
    /// traffic stays in the run context. Dropping the future mid-run
    /// leaves the session untouched.
    pub async fn run(&self, session: &mut Session, input: &str) -> AgentOutcome {
        let user_turn = Turn::user(input);
        let mut state =
            AgentRunState::new(self.build_context(session, &user_turn), self.config.max_iterations);
        let tools = self.invoker.registry().list_descriptors();
        let mut tool_calls = 0;

        tracing::info!(
            session_id = %session.id,
            history = state.context.len() - 2,
            tools = tools.len(),
            "Agent run started"
        );

        let mut step = LoopState::Reasoning;
        let (answer, termination) = loop {
            step = match step {
                LoopState::Reasoning if state.exhausted() => LoopState::Aborted,
                LoopState::Reasoning => {
                    tracing::debug!(iteration = state.iteration_count, "Reasoning");
                    match self.engine.decide(&state.context, &tools).await {
                        Decision::FinalAnswer(text) => LoopState::Done(text),
                        Decision::ToolCalls { content, calls } => {
                            LoopState::Invoking { content, calls }
                        }
                    }
                }
                LoopState::Invoking { content, calls } => {
                    tracing::debug!(
                        iteration = state.iteration_count,
                        calls = calls.len(),
                        "Invoking tools"
                    );
                    tool_calls += calls.len();
                    let results = self.invoker.invoke_all(&calls).await;
                    state.context.push(Turn::assistant_tool_calls(content, calls));

                    for result in results {
                        if result.succeeded {
                            state.last_tool_output = Some(result.output.clone());
                        }
                        state.context.push(Turn::tool(result.name, result.output, result.id));
                    }

                    state.iteration_count += 1;
                    LoopState::Reasoning
                }
                LoopState::Done(text) => break (text, Termination::Done),
                LoopState::Aborted => {
                    tracing::warn!(
                        session_id = %session.id,
                        max_iterations = state.max_iterations,
                        "Iteration ceiling reached without a final answer"
                    );
                    break (abort_answer(&state), Termination::Aborted);
                }
            };
        };

        session.append(user_turn);
        session.append(Turn::assistant(answer.clone()));

        tracing::info!(
            session_id = %session.id,
            iterations = state.iteration_count,
            tool_calls,
            termination = ?termination,
            "Agent run finished"
        );

        AgentOutcome {
            answer,
            termination,
            iterations: state.iteration_count,
            tool_calls,
        }
    }

    /// One-shot question in a throwaway session
    pub async fn ask(&self, question: &str) -> String {
        let mut session = Session::new();
        self.run(&mut session, question).await.answer
    }

    pub fn tools(&self) -> &ToolRegistry {
        self.invoker.registry()
    }

    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        self.engine.provider()
    }
}

fn abort_answer(state: &AgentRunState) -> String {
    let notice = Status::Warning.line(format!(
        "I could not complete this request within {} reasoning steps.",
        state.max_iterations
    ));

    match &state.last_tool_output {
        Some(output) => format!("{notice}\n\nLast tool result:\n{output}"),
        None => notice,
    }
}

/// Builder for Agent configuration
#[derive(Default)]
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Result<Self> {
        self.tools.register(tool)?;
        Ok(self)
    }

    #[must_use]
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.config.system_prompt = prompt;
        self
    }

    #[must_use]
    pub fn generation(mut self, options: GenerationOptions) -> Self {
        self.config.generation = options;
        self
    }

    #[must_use]
    pub const fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    #[must_use]
    pub const fn history_window(mut self, turns: usize) -> Self {
        self.config.history_window = turns;
        self
    }

    #[must_use]
    pub const fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.config.tool_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::ConfigurationMissing("reasoning engine provider".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}
