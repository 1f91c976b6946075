//! Detected style violations

use serde::Serialize;

/// A violation reported by a rule.
///
/// Findings are produced during a rule run and handed straight to the
/// runner or a reporter; they are never stored across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule_id: String,
    /// Token index in the stream as it was when the rule examined it
    pub position: usize,
    pub line: usize,
    pub message: String,
    pub fixable: bool,
}

impl Finding {
    pub fn new(rule_id: &str, position: usize, line: usize, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            position,
            line,
            message: message.into(),
            fixable: true,
        }
    }

    /// A finding that no edit can resolve, such as a rule fault
    pub fn unfixable(rule_id: &str, position: usize, line: usize, message: impl Into<String>) -> Self {
        Self {
            fixable: false,
            ..Self::new(rule_id, position, line, message)
        }
    }
}
