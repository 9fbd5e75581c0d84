//! [`ScrollLines`] action: scrolls the terminal one line at a time.
//!
//! Script syntax: `scroll_lines: 5` (content moves up) or `scroll_lines: -5`.

use crate::action::{Context, SceneAction};
use crate::directive::{DirectiveName, format_directive};
use crate::error::PlaybackError;
use crate::parser::parse_int;
use crate::sink::TerminalOp;
use anyhow::Result;
use std::time::Duration;

/// Issues `|lines|` single-line scrolls, one per scroll step, and advances
/// after the settle time.
///
/// The advance does not wait for the scroll steps: with the default timings,
/// more than ten lines keep scrolling while the next action already runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollLines {
    pub lines: i32,
}

impl ScrollLines {
    pub const NAME: &'static str = "scroll_lines";

    pub fn parse(value: &str) -> Result<Self> {
        Ok(Self {
            lines: parse_int(value)?,
        })
    }
}

impl SceneAction for ScrollLines {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dispatch(&self, ctx: &mut Context<'_>) -> Result<Duration, PlaybackError> {
        let step = ctx.config().scroll_step;
        let direction = self.lines.signum() as i8;
        for tick in 1..=self.lines.unsigned_abs() {
            ctx.emit_at(step * tick, TerminalOp::Scroll(direction));
        }
        Ok(ctx.config().settle)
    }

    fn to_source(&self) -> String {
        format_directive(DirectiveName::ScrollLines, &self.lines.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::testing::{dispatch, ms};
    use crate::state::PlaybackState;

    #[test]
    fn test_parse() {
        assert_eq!(ScrollLines::parse("3").unwrap().lines, 3);
        assert_eq!(ScrollLines::parse("-12").unwrap().lines, -12);
        assert!(ScrollLines::parse("up").is_err());
        assert_eq!(ScrollLines::parse("100000").unwrap().lines, 100_000);
        assert!(ScrollLines::parse("99999999999").is_err());
    }

    #[test]
    fn test_scroll_down() {
        let out = dispatch(&ScrollLines { lines: 3 }, PlaybackState::default()).unwrap();
        assert_eq!(out.advance, ms(100));
        assert_eq!(
            out.ops,
            vec![
                (ms(10), TerminalOp::Scroll(1)),
                (ms(20), TerminalOp::Scroll(1)),
                (ms(30), TerminalOp::Scroll(1)),
            ]
        );
    }

    #[test]
    fn test_scroll_up() {
        let out = dispatch(&ScrollLines { lines: -2 }, PlaybackState::default()).unwrap();
        assert!(out.ops.iter().all(|(_, op)| *op == TerminalOp::Scroll(-1)));
        assert_eq!(out.ops.len(), 2);
    }

    #[test]
    fn test_steps_may_outlast_advance() {
        let out = dispatch(&ScrollLines { lines: 15 }, PlaybackState::default()).unwrap();
        assert_eq!(out.advance, ms(100));
        assert_eq!(out.ops.last().unwrap().0, ms(150));
    }

    #[test]
    fn test_large_count_schedules_every_step() {
        let out = dispatch(&ScrollLines { lines: -40_000 }, PlaybackState::default()).unwrap();
        assert_eq!(out.ops.len(), 40_000);
        assert_eq!(
            out.ops.last().unwrap(),
            &(ms(400_000), TerminalOp::Scroll(-1))
        );
    }

    #[test]
    fn test_zero_is_a_pause() {
        let out = dispatch(&ScrollLines { lines: 0 }, PlaybackState::default()).unwrap();
        assert!(out.ops.is_empty());
        assert_eq!(out.advance, ms(100));
    }
}
