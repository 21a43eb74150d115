//! Server configuration from the environment.

use std::path::PathBuf;
use std::time::Duration;

use agent_core::provider::GenerationOptions;
use agent_core::AgentConfig;
use agent_core::PromptTemplate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_iterations: usize,
    pub history_window: usize,
    pub tool_timeout: Duration,

    /// Sessions untouched for this long are dropped
    pub session_idle: Duration,

    /// Primary system prompt template; the built-in prompt is used when unset
    pub system_prompt_file: Option<PathBuf>,

    pub generation: GenerationOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let agent = AgentConfig::default();
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            max_iterations: agent.max_iterations,
            history_window: agent.history_window,
            tool_timeout: agent.tool_timeout,
            session_idle: Duration::from_secs(3600),
            system_prompt_file: None,
            generation: agent.generation,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(n) = parse(&get, "AGENT_MAX_ITERATIONS")? {
            config.max_iterations = n;
        }
        if let Some(n) = parse(&get, "AGENT_HISTORY_WINDOW")? {
            config.history_window = n;
        }
        if let Some(secs) = parse::<u64>(&get, "TOOL_TIMEOUT_SECS")? {
            config.tool_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse::<u64>(&get, "SESSION_IDLE_SECS")? {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    key: "SESSION_IDLE_SECS",
                    value: secs.to_string(),
                });
            }
            config.session_idle = Duration::from_secs(secs);
        }
        config.system_prompt_file = get("SYSTEM_PROMPT_FILE").map(PathBuf::from);

        if let Some(model) = get("OPENAI_MODEL") {
            config.generation.model = model;
        }
        if let Some(t) = parse(&get, "OPENAI_TEMPERATURE")? {
            config.generation.temperature = t;
        }

        if config.max_iterations == 0 {
            return Err(ConfigError::Invalid {
                key: "AGENT_MAX_ITERATIONS",
                value: "0".into(),
            });
        }

        Ok(config)
    }

    /// Agent settings, resolving the system prompt
    pub fn agent_config(&self, default_prompt: &str) -> agent_core::Result<AgentConfig> {
        Ok(AgentConfig {
            system_prompt: PromptTemplate::select(self.system_prompt_file.as_deref(), default_prompt)?,
            max_iterations: self.max_iterations,
            history_window: self.history_window,
            generation: self.generation.clone(),
            tool_timeout: self.tool_timeout,
        })
    }
}

fn parse<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    get(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.history_window, 10);
        assert_eq!(config.tool_timeout, Duration::from_secs(15));
        assert_eq!(config.session_idle, Duration::from_secs(3600));
        assert_eq!(config.generation.model, "gpt-4o");
        assert!(config.system_prompt_file.is_none());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("AGENT_MAX_ITERATIONS", "5"),
            ("TOOL_TIMEOUT_SECS", "30"),
            ("SESSION_IDLE_SECS", "600"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("SYSTEM_PROMPT_FILE", "/etc/pronos/prompt.md"),
        ])
        .unwrap();
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.tool_timeout, Duration::from_secs(30));
        assert_eq!(config.session_idle, Duration::from_secs(600));
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.system_prompt_file, Some(PathBuf::from("/etc/pronos/prompt.md")));
    }

    #[test]
    fn rejects_garbage_numbers() {
        let err = config(&[("AGENT_HISTORY_WINDOW", "ten")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for AGENT_HISTORY_WINDOW: 'ten'");
        assert!(config(&[("AGENT_MAX_ITERATIONS", "0")]).is_err());
        assert!(config(&[("SESSION_IDLE_SECS", "0")]).is_err());
    }

    #[test]
    fn missing_prompt_file_is_an_error() {
        let config = config(&[("SYSTEM_PROMPT_FILE", "/nonexistent/prompt.md")]).unwrap();
        assert!(config.agent_config("default").is_err());
    }
}
