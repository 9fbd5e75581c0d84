//! Directive lexer: recognizes `name:` and `name: value` lines.
//!
//! A directive line is a lowercase identifier (letters, `_` and `-`) followed by
//! a colon and an optional value, matched against the whole line. Only names from
//! the fixed vocabulary count; anything else, including `Note: hi` or
//! `error: boom`, is ordinary text.

use std::fmt;

/// The fixed directive vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveName {
    Input,
    Output,
    Audio,
    Delay,
    Clear,
    Paste,
    Prompt,
    Cursor,
    ScrollLines,
    MarginX,
    MarginY,
    TypingSpeed,
}

impl DirectiveName {
    pub const ALL: [DirectiveName; 12] = [
        Self::Input,
        Self::Output,
        Self::Audio,
        Self::Delay,
        Self::Clear,
        Self::Paste,
        Self::Prompt,
        Self::Cursor,
        Self::ScrollLines,
        Self::MarginX,
        Self::MarginY,
        Self::TypingSpeed,
    ];

    /// The keyword as written in scenario source.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Audio => "audio",
            Self::Delay => "delay",
            Self::Clear => "clear",
            Self::Paste => "paste",
            Self::Prompt => "prompt",
            Self::Cursor => "cursor",
            Self::ScrollLines => "scroll_lines",
            Self::MarginX => "margin-x",
            Self::MarginY => "margin-y",
            Self::TypingSpeed => "typing_speed",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == keyword)
    }
}

impl fmt::Display for DirectiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recognized directive line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    pub name: DirectiveName,
    /// The value after the colon, with leading whitespace removed.
    /// `None` when nothing follows the colon; the caller then reads the value
    /// from the next line.
    pub inline_value: Option<&'a str>,
}

/// Lex a single source line.
///
/// Returns `None` when the line is not a directive from the vocabulary.
///
/// # Example
///
/// ```
/// use scenetty::directive::{lex, DirectiveName};
///
/// let d = lex("delay: 500").unwrap();
/// assert_eq!(d.name, DirectiveName::Delay);
/// assert_eq!(d.inline_value, Some("500"));
///
/// assert!(lex("Note: not a directive").is_none());
/// ```
pub fn lex(line: &str) -> Option<Directive<'_>> {
    let (keyword, rest) = line.split_once(':')?;
    if keyword.is_empty()
        || !keyword
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch == '_' || ch == '-')
    {
        return None;
    }
    let name = DirectiveName::from_keyword(keyword)?;
    let value = rest.trim_start();
    Some(Directive {
        name,
        inline_value: (!value.is_empty()).then_some(value),
    })
}

/// Whether `line` would be read back as a directive.
pub fn is_directive(line: &str) -> bool {
    lex(line).is_some()
}

/// Render `name: value`, falling back to the two-line form when the value
/// would not survive inline lexing (empty, leading whitespace).
pub(crate) fn format_directive(name: DirectiveName, value: &str) -> String {
    if value.is_empty() || value.starts_with(char::is_whitespace) {
        format!("{name}:\n{value}")
    } else {
        format!("{name}: {value}")
    }
}
