//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// A required credential or setting is absent
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    /// Network failure or timeout on an external call
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream quota or rate limit exhausted
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Upstream rejected the credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Tool not found in registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool name registered twice
    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    /// The model returned structured output that could not be parsed
    #[error("Model output unparseable: {0}")]
    ModelOutputUnparseable(String),

    /// Tool validation failed
    #[error("Tool validation error: {0}")]
    ToolValidation(String),

    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Generic upstream error with status
    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Convert to a user-facing message
    pub fn user_message(&self) -> String {
        match self {
            Self::UpstreamUnavailable(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            Self::QuotaExceeded(_) => {
                "The AI service quota is exhausted. Please wait a moment.".into()
            }
            Self::Unauthorized(_) => {
                "The AI service rejected the configured credentials.".into()
            }
            Self::ModelOutputUnparseable(_) => {
                "The AI service returned a response that could not be understood.".into()
            }
            Self::UnknownTool(name) => format!("The tool '{name}' is not available."),
            Self::Provider { message, .. } => {
                format!("The AI service encountered an error: {message}")
            }
            _ => "An unexpected error occurred.".into(),
        }
    }
}
