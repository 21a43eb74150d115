//! # agent-core
//!
//! Bounded tool-using agent loop with a provider-agnostic reasoning engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Agent                                │
//! │  ┌─────────────┐   ┌──────────────┐   ┌───────────────────┐  │
//! │  │ Agent Loop  │──▶│ ToolInvoker  │──▶│   ToolRegistry    │  │
//! │  │ (bounded)   │   │ (timeout)    │   └───────────────────┘  │
//! │  └──────┬──────┘   └──────────────┘                          │
//! │         ▼                                                     │
//! │  ┌──────────────────┐   ┌───────────────────────────────┐    │
//! │  │ ReasoningEngine  │──▶│ LlmProvider (Strategy)        │    │
//! │  └──────────────────┘   └───────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//!            ▲ Session (Conversation store, owned by the caller)
//! ```

pub mod engine;
pub mod error;
pub mod invoker;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod reasoning;
pub mod session;
pub mod status;
pub mod tool;

#[cfg(test)]
pub(crate) mod test_support;

pub use engine::{Decision, ReasoningEngine};
pub use error::{AgentError, Result};
pub use invoker::ToolInvoker;
pub use message::{Conversation, Role, Turn};
pub use prompt::PromptTemplate;
pub use provider::LlmProvider;
pub use reasoning::{Agent, AgentBuilder, AgentConfig, AgentOutcome, Termination};
pub use session::{Session, SessionId, SessionManager};
pub use status::Status;
pub use tool::{ParameterSchema, Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
