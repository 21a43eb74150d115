//! # agent-runtime
//!
//! Reasoning-engine providers for the agent.
//!
//! ## Providers
//!
//! - **OpenAI** (default): `/chat/completions` with native function calling
//! - **Ollama**: same client against Ollama's OpenAI-compatible endpoint
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::OpenAiProvider;
//!
//! let provider = OpenAiProvider::from_env()?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

pub mod openai;

pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use agent_core::{Agent, AgentError, LlmProvider, Result, Role, Session, Tool, ToolRegistry, Turn};
