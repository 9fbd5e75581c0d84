//! Error types for parsing and playback.

use thiserror::Error;

/// A non-fatal problem found while parsing a scenario.
///
/// Parse errors never abort parsing: the offending directive is dropped and the
/// error is collected in [`Scenario::diagnostics`](crate::Scenario::diagnostics).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: invalid value for '{directive}': '{value}' ({reason})")]
    InvalidDirectiveValue {
        line: usize,
        directive: &'static str,
        value: String,
        reason: String,
    },
}

impl ParseError {
    /// The 1-based source line the error points at.
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidDirectiveValue { line, .. } => *line,
        }
    }
}

/// Fatal playback errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// The in-memory action list holds data the parser never produces.
    #[error("malformed action #{index} ({action}): {reason}")]
    MalformedAction {
        index: usize,
        action: &'static str,
        reason: String,
    },

    /// `run` was called before any scenario was loaded.
    #[error("no scenario loaded")]
    NoScenario,
}
