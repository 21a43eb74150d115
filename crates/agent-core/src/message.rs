//! Conversation Turns
//!
//! Turn format used across the agent system, and the append-only
//! conversation store that feeds context to the agent loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tool::ToolCall;

/// Role of a turn's author
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool result (injected as context)
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::Tool => write!(f, "tool"),
        }
    }
}

/// A single turn in a conversation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turn {
    /// Turn role
    pub role: Role,

    /// Text content
    pub content: String,

    /// Creation time
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// Tool calls requested by an assistant turn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,

    /// Call answered by a tool turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Tool that produced a tool turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl Turn {
    /// Create a new turn
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Assistant turn that records the tool calls it requested
    pub fn assistant_tool_calls(content: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        let mut turn = Self::assistant(content);
        turn.tool_calls = calls;
        turn
    }

    /// Create a tool result turn
    pub fn tool(
        tool_name: impl Into<String>,
        content: impl Into<String>,
        tool_call_id: Option<String>,
    ) -> Self {
        let mut turn = Self::new(Role::Tool, content);
        turn.tool_name = Some(tool_name.into());
        turn.tool_call_id = tool_call_id;
        turn
    }
}

/// Append-only session history
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Last `n` turns, oldest first
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// All turns
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Drop the whole history (new conversation)
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_creation() {
        let turn = Turn::user("Odds for the EPL?");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "Odds for the EPL?");
        assert!(turn.tool_calls.is_empty());
    }

    #[test]
    fn recent_returns_last_turns_in_order() {
        let mut conv = Conversation::new();
        for i in 0..15 {
            conv.append(Turn::user(format!("q{i}")));
        }

        let window = conv.recent(10);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0].content, "q5");
        assert_eq!(window[9].content, "q14");
    }

    #[test]
    fn recent_larger_than_history_returns_all() {
        let mut conv = Conversation::new();
        conv.append(Turn::user("hi"));
        conv.append(Turn::assistant("hello"));

        assert_eq!(conv.recent(10).len(), 2);
        assert!(conv.recent(0).is_empty());
    }

    #[test]
    fn reset_clears_history() {
        let mut conv = Conversation::new();
        conv.append(Turn::user("hi"));
        conv.reset();
        assert!(conv.is_empty());
        assert!(conv.last().is_none());
    }

    #[test]
    fn tool_turn_serializes_lowercase_role() {
        let turn = Turn::tool("ping", "ok", Some("call-1".into()));
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call-1");
        assert_eq!(json["tool_name"], "ping");
    }
}
