//! Per-account log buffer for one round

use std::fmt::Display;

/// Lines produced while processing one account in one round.
///
/// Owned by that account's future while the round runs and handed to the
/// round runner afterwards, so it is never read and written concurrently.
/// Every entry is prefixed with the account's email and holds exactly one line.
#[derive(Debug, Clone, Default)]
pub struct RoundLog {
    email: String,
    lines: Vec<String>,
}

impl RoundLog {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            lines: Vec::new(),
        }
    }

    /// Append one line. Line breaks inside `message` (an HTML error page in a
    /// remote error, say) are folded into single spaces.
    pub fn push(&mut self, message: impl Display) {
        let message = message.to_string();
        let flat = message
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        self.lines.push(format!("[{}] {}", self.email, flat));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
