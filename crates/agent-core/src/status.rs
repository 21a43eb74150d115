//! Status prefixes for user-visible text.

use std::fmt;

/// Outcome class of a user-visible line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warning,
    Error,
}

impl Status {
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Ok => "✅",
            Self::Warning => "⚠️",
            Self::Error => "❌",
        }
    }

    /// Prefix `text` with this status marker
    pub fn line(self, text: impl fmt::Display) -> String {
        format!("{} {text}", self.prefix())
    }

    /// Classify text by its leading marker
    pub fn of(text: &str) -> Option<Self> {
        [Self::Ok, Self::Warning, Self::Error]
            .into_iter()
            .find(|s| text.trim_start().starts_with(s.prefix()))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}
