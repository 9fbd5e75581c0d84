//! Scenario parser.
//!
//! The top-level entry points are [`parse_str`] and [`parse_file`].

use crate::action::Action;
use crate::actions::{
    Axis, Clear, Cursor, Delay, Input, Margin, Output, Paste, Prompt, ScrollLines, TypingSpeed,
};
use crate::directive::{DirectiveName, lex};
use crate::error::ParseError;
use anyhow::{Context as _, Result, anyhow};
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A parsed scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    pub actions: Vec<Action>,
    /// `audio:` hints, in source order. They are not actions; the host decides
    /// what to do with them.
    pub audio: Vec<AudioCue>,
    /// Problems found while parsing. The offending directives are left out of
    /// [`actions`](Self::actions).
    pub diagnostics: Vec<ParseError>,
}

impl Scenario {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// An `audio:` hint: a path relative to the host's assets directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioCue {
    /// 1-based line of the `audio:` directive.
    pub line: usize,
    pub path: String,
    /// Index of the first action that follows the hint.
    pub before_action: usize,
}

impl AudioCue {
    /// Resolve the cue against `assets_dir`. Performs no I/O.
    pub fn resolve(&self, assets_dir: impl AsRef<Path>) -> PathBuf {
        assets_dir.as_ref().join(self.path.trim())
    }
}

/// Parse a scenario from a string slice.
///
/// Parsing never fails: lines that are not directives are skipped (outside of
/// `output:` blocks, where they are the printed text), and directives with
/// malformed values are reported in [`Scenario::diagnostics`].
///
/// # Example
///
/// ```
/// use scenetty::parse_str;
///
/// let scenario = parse_str("input: ls\noutput:\nREADME.md\ndelay: 500\n");
/// assert_eq!(scenario.actions.len(), 3);
/// assert!(scenario.is_clean());
/// ```
pub fn parse_str(content: &str) -> Scenario {
    let lines: Vec<&str> = content.lines().collect();
    let mut scenario = Scenario::default();
    let mut i = 0;

    while i < lines.len() {
        let line_num = i + 1;
        let Some(directive) = lex(lines[i]) else {
            tracing::trace!(line = line_num, "skipping text outside of a directive");
            i += 1;
            continue;
        };
        i += 1;

        let value = match directive.name {
            DirectiveName::Clear => String::new(),
            DirectiveName::Output => {
                let start = i;
                while i < lines.len() && lex(lines[i]).is_none() {
                    i += 1;
                }
                directive
                    .inline_value
                    .into_iter()
                    .chain(lines[start..i].iter().copied())
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            _ => match directive.inline_value {
                Some(value) => value.to_string(),
                // The next line is the value, unless it is a directive itself.
                None if i < lines.len() && lex(lines[i]).is_none() => {
                    i += 1;
                    lines[i - 1].to_string()
                }
                None => String::new(),
            },
        };

        if directive.name == DirectiveName::Audio {
            if value.trim().is_empty() {
                tracing::debug!(line = line_num, "skipping audio hint without a path");
                continue;
            }
            scenario.audio.push(AudioCue {
                line: line_num,
                path: value,
                before_action: scenario.actions.len(),
            });
            continue;
        }

        match parse_action(directive.name, &value) {
            Ok(action) => scenario.actions.push(action),
            Err(err) => {
                let err = ParseError::InvalidDirectiveValue {
                    line: line_num,
                    directive: directive.name.as_str(),
                    value,
                    reason: err.to_string(),
                };
                tracing::warn!("{err}");
                scenario.diagnostics.push(err);
            }
        }
    }

    scenario
}

/// Parse a scenario from a file.
///
/// Reads the entire file into memory and delegates to [`parse_str`].
///
/// # Errors
///
/// Returns an error if the file cannot be read. Malformed directives are not
/// errors; see [`Scenario::diagnostics`].
///
/// # Example
///
/// ```no_run
/// use scenetty::parse_file;
///
/// let scenario = parse_file("demo.tss").unwrap();
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<Scenario> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
    Ok(parse_str(&content))
}

/// Build the action for a directive's value.
fn parse_action(name: DirectiveName, value: &str) -> Result<Action> {
    match name {
        DirectiveName::Input => Input::parse(value).map(Action::Input),
        DirectiveName::Output => Output::parse(value).map(Action::Output),
        DirectiveName::Paste => Paste::parse(value).map(Action::Paste),
        DirectiveName::Delay => Delay::parse(value).map(Action::Delay),
        DirectiveName::Clear => Ok(Action::Clear(Clear)),
        DirectiveName::Prompt => Prompt::parse(value).map(Action::Prompt),
        DirectiveName::Cursor => Cursor::parse(value).map(Action::Cursor),
        DirectiveName::ScrollLines => ScrollLines::parse(value).map(Action::ScrollLines),
        DirectiveName::MarginX => Margin::parse(Axis::X, value).map(Action::Margin),
        DirectiveName::MarginY => Margin::parse(Axis::Y, value).map(Action::Margin),
        DirectiveName::TypingSpeed => TypingSpeed::parse(value).map(Action::TypingSpeed),
        DirectiveName::Audio => Err(anyhow!("'{name}' does not produce an action")),
    }
}

/// Parse a whole-number directive value, allowing surrounding whitespace.
pub(crate) fn parse_int<T>(value: &str) -> Result<T>
where
    T: FromStr<Err = ParseIntError>,
{
    value
        .trim()
        .parse()
        .map_err(|err| anyhow!("expected a whole number: {err}"))
}
