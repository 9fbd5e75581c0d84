//! [`Input`] action: types a command at the prompt, one character at a time.
//!
//! Script syntax: `input: ls -la` or `input:` followed by the text on the next
//! line. Text may contain `%{delay N}` pauses and color tokens. Inside typed
//! text `\b` erases the previous character and `\;` types a literal `;`.

use super::color_op;
use crate::action::{Context, LINE_BREAK, SceneAction};
use crate::directive::{DirectiveName, format_directive};
use crate::error::PlaybackError;
use crate::sink::{Control, TerminalOp};
use crate::tokens::{LiteralKind, Part, render, scan};
use anyhow::Result;
use std::time::Duration;

/// Writes the prompt, then schedules each typed character at `index × timeout`
/// from the start of its part, where `timeout` is the base typing timeout
/// divided by the current typing speed.
///
/// The action lasts `(len + 1) × timeout` per typed part plus every delay; a
/// line break is written when it ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub parts: Vec<Part>,
}

impl Input {
    pub const NAME: &'static str = "input";

    /// Create an `Input` from scenario text, splitting out inline tokens.
    pub fn new(text: &str) -> Self {
        Self {
            parts: scan(text, LiteralKind::Typing),
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        Ok(Self::new(value))
    }

    /// Total time the action takes at the given per-character timeout.
    pub fn duration(&self, timeout: Duration) -> Duration {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Typing(text) => timeout * (char_count(text) + 1),
                Part::Delay(ms) => Duration::from_millis(*ms),
                _ => Duration::ZERO,
            })
            .sum()
    }
}

impl SceneAction for Input {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dispatch(&self, ctx: &mut Context<'_>) -> Result<Duration, PlaybackError> {
        if let Some(part) = self
            .parts
            .iter()
            .find(|part| matches!(part, Part::Text(_) | Part::Insert(_)))
        {
            return Err(ctx.malformed(Self::NAME, format!("unexpected part {part:?}")));
        }

        let timeout = ctx.state().typing_timeout(ctx.config().base_typing_timeout);
        let total = self.duration(timeout);

        ctx.emit_prompt();
        let mut cursor = Duration::ZERO;
        for part in &self.parts {
            match part {
                Part::Typing(text) => {
                    type_text(ctx, cursor, timeout, text);
                    cursor += timeout * char_count(text);
                }
                Part::Delay(ms) => cursor += Duration::from_millis(*ms),
                other => {
                    if let Some(op) = color_op(other) {
                        ctx.emit_at(cursor, op);
                    }
                }
            }
        }
        ctx.emit_at(total, TerminalOp::write(LINE_BREAK));

        Ok(total)
    }

    fn to_source(&self) -> String {
        format_directive(DirectiveName::Input, &render(&self.parts))
    }
}

/// Schedule one write per character slot, resolving `\b` and `\;`.
///
/// An escape occupies both of its character slots; its effect fires at the
/// first one.
fn type_text(ctx: &mut Context<'_>, start: Duration, timeout: Duration, text: &str) {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let at = start + timeout * i as u32;
        let op = match (chars[i], chars.get(i + 1)) {
            ('\\', Some('b')) => {
                i += 1;
                TerminalOp::Control(Control::Backspace)
            }
            ('\\', Some(';')) => {
                i += 1;
                TerminalOp::write(";")
            }
            (ch, _) => TerminalOp::Write(ch.to_string()),
        };
        ctx.emit_at(at, op);
        i += 1;
    }
}

fn char_count(text: &str) -> u32 {
    text.chars().count() as u32
}
