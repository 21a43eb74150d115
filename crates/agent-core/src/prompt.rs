//! System prompt selection.
//!
//! A primary template comes from configuration (a file path). Without one,
//! the caller's built-in default is used. The choice is made once, at
//! startup. A configured file that cannot be read is an error, not a
//! silent fallback.

use std::path::{Path, PathBuf};

use crate::error::{AgentError, Result};

/// Where the active template came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptOrigin {
    Primary(PathBuf),
    LocalDefault,
}

/// Resolved system prompt
#[derive(Clone, Debug)]
pub struct PromptTemplate {
    text: String,
    origin: PromptOrigin,
}

impl PromptTemplate {
    pub fn local_default(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: PromptOrigin::LocalDefault,
        }
    }

    /// Use `primary` when configured, `local_default` otherwise
    pub fn select(primary: Option<&Path>, local_default: &str) -> Result<Self> {
        let Some(path) = primary else {
            return Ok(Self::local_default(local_default));
        };

        let text = std::fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Err(AgentError::ConfigurationMissing(format!(
                "system prompt file {} is empty",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Using primary system prompt");
        Ok(Self {
            text,
            origin: PromptOrigin::Primary(path.to_path_buf()),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn origin(&self) -> &PromptOrigin {
        &self.origin
    }
}
