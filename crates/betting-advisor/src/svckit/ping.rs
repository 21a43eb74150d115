//! Ping Tool
//!
//! Single ICMP echo to the host of a URL. The subprocess is killed when the
//! invocation is dropped or the timeout fires.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tokio::process::Command;

use agent_core::{ParameterSchema, Result as CoreResult, Status, Tool, ToolCall, ToolResult, ToolSchema};

use crate::ToolKind;

pub struct PingTool {
    program: String,
    timeout: Duration,
}

impl PingTool {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "ping".into(),
            timeout,
        }
    }

    /// Use a different executable (tests)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

/// Host part of `url`, if it parses and has one. IPv6 brackets are
/// stripped; a host that would read as a ping option is refused.
fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    (!host.is_empty() && !host.starts_with('-')).then(|| host.to_string())
}

#[async_trait]
impl Tool for PingTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: ToolKind::Ping.name().into(),
            description: "Ping the host of a URL to test network connectivity.".into(),
            parameters: vec![
                ParameterSchema::string("url", "URL to ping, including http:// or https://"),
                ParameterSchema {
                    name: "return_error".into(),
                    param_type: "boolean".into(),
                    description: "Return raw stderr when the ping fails".into(),
                    required: false,
                    default: Some(false.into()),
                },
            ],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let name = ToolKind::Ping.name();
        let url = call.str_arg("url").unwrap_or_default();
        let return_error = call
            .arguments
            .get("return_error")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);

        let Some(host) = host_of(url) else {
            return Ok(ToolResult::failure(
                name,
                Status::Error.line(format!(
                    "Invalid URL '{url}'. Include http:// or https://"
                )),
            ));
        };

        tracing::info!(tool = name, %host, "Pinging host");

        let child = Command::new(&self.program)
            .args(["-c", "1", "--", host.as_str()])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "Failed to spawn ping");
                return Ok(ToolResult::failure(name, Status::Error.line(format!("Ping error: {e}"))));
            }
        };

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Ok(ToolResult::failure(name, Status::Error.line(format!("Ping error: {e}"))));
            }
            Err(_) => {
                return Ok(ToolResult::failure(
                    name,
                    Status::Error.line(format!(
                        "Ping to {host} timed out after {}s",
                        self.timeout.as_secs()
                    )),
                ));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            Ok(ToolResult::success(
                name,
                Status::Ok.line(format!("Ping succeeded for {host}:\n{stdout}")),
            ))
        } else if return_error {
            Ok(ToolResult::failure(name, stderr.into_owned()))
        } else {
            Ok(ToolResult::failure(
                name,
                Status::Error.line(format!("Ping failed for {host}:\n{stderr}")),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_extraction() {
        assert_eq!(host_of("https://api.the-odds-api.com/v4").as_deref(), Some("api.the-odds-api.com"));
        assert_eq!(host_of("not a url"), None);
        assert_eq!(host_of("mailto:someone"), None);
    }

    #[test]
    fn option_like_hosts_are_refused() {
        assert_eq!(host_of("http://-w/"), None);
        assert_eq!(host_of("http://[::1]:8080/").as_deref(), Some("::1"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn host_follows_end_of_options() {
        let tool = PingTool::new(Duration::from_secs(5)).with_program("echo");
        let call = ToolCall::new("ping").with_arg("url", "http://[::1]/");
        let result = tool.execute(&call).await.unwrap();

        assert!(result.succeeded);
        assert!(result.output.contains("-c 1 -- ::1"));
    }

    #[tokio::test]
    async fn invalid_url_never_spawns() {
        let tool = PingTool::new(Duration::from_secs(1)).with_program("/nonexistent/ping");
        let call = ToolCall::new("ping").with_arg("url", "not a url");
        let result = tool.execute(&call).await.unwrap();

        assert!(!result.succeeded);
        assert_eq!(result.output, "❌ Invalid URL 'not a url'. Include http:// or https://");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn zero_exit_is_success() {
        let tool = PingTool::new(Duration::from_secs(5)).with_program("true");
        let call = ToolCall::new("ping").with_arg("url", "https://example.com");
        let result = tool.execute(&call).await.unwrap();

        assert!(result.succeeded);
        assert!(result.output.starts_with("✅ Ping succeeded for example.com"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_failure() {
        let tool = PingTool::new(Duration::from_secs(5)).with_program("false");
        let call = ToolCall::new("ping").with_arg("url", "https://example.com");
        let result = tool.execute(&call).await.unwrap();

        assert!(!result.succeeded);
        assert!(result.output.starts_with("❌ Ping failed for example.com"));
    }

    #[tokio::test]
    async fn missing_program_is_reported() {
        let tool = PingTool::new(Duration::from_secs(1)).with_program("/nonexistent/ping");
        let call = ToolCall::new("ping").with_arg("url", "https://example.com");
        let result = tool.execute(&call).await.unwrap();

        assert!(!result.succeeded);
        assert!(result.output.starts_with("❌ Ping error"));
    }
}
