//! [`Paste`] action: inserts text at the prompt in one go.
//!
//! Script syntax: `paste: docker run --rm -it alpine` or `paste:` followed by the
//! text on the next line.

use super::color_op;
use crate::action::{Context, LINE_BREAK, SceneAction};
use crate::directive::{DirectiveName, format_directive};
use crate::error::PlaybackError;
use crate::sink::TerminalOp;
use crate::tokens::{LiteralKind, Part, render, scan};
use anyhow::Result;
use std::time::Duration;

/// Writes the prompt, then each chunk of text whole. Every chunk costs the
/// configured paste time regardless of its length; delays cost their value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paste {
    pub parts: Vec<Part>,
}

impl Paste {
    pub const NAME: &'static str = "paste";

    pub fn new(text: &str) -> Self {
        Self {
            parts: scan(text, LiteralKind::Insert),
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        Ok(Self::new(value))
    }
}

impl SceneAction for Paste {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dispatch(&self, ctx: &mut Context<'_>) -> Result<Duration, PlaybackError> {
        if let Some(part) = self
            .parts
            .iter()
            .find(|part| matches!(part, Part::Text(_) | Part::Typing(_)))
        {
            return Err(ctx.malformed(Self::NAME, format!("unexpected part {part:?}")));
        }

        let chunk = ctx.config().paste_part;
        ctx.emit_prompt();
        let mut cursor = Duration::ZERO;
        for part in &self.parts {
            match part {
                Part::Insert(text) => {
                    ctx.emit_at(cursor, TerminalOp::Write(text.clone()));
                    cursor += chunk;
                }
                Part::Delay(ms) => cursor += Duration::from_millis(*ms),
                other => {
                    if let Some(op) = color_op(other) {
                        ctx.emit_at(cursor, op);
                    }
                }
            }
        }
        ctx.emit_at(cursor, TerminalOp::write(LINE_BREAK));

        Ok(cursor)
    }

    fn to_source(&self) -> String {
        format_directive(DirectiveName::Paste, &render(&self.parts))
    }
}
