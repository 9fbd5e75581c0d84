//! [`Output`] action: prints a block of program output.
//!
//! Script syntax:
//!
//! ```text
//! output:
//! total 2
//! -rw-r--r-- 1 me me  0 %{begin:32}file1%{end}
//! ```
//!
//! Every line up to the next directive belongs to the block.

use super::color_op;
use crate::action::{Context, LINE_BREAK, SceneAction};
use crate::error::PlaybackError;
use crate::sink::TerminalOp;
use crate::tokens::{LiteralKind, Part, render_part, scan};
use anyhow::Result;
use std::time::Duration;

/// Prints its parts after the output priming delay. Text is written in one
/// pass; only `%{delay N}` tokens take time.
///
/// A text part is followed by a line break unless it is the last part or the
/// next part is a color or delay token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub parts: Vec<Part>,
}

impl Output {
    pub const NAME: &'static str = "output";

    /// Build an output block from its source lines.
    ///
    /// Lines meet at a token when the previous one ends with a token or the
    /// next one starts with one. Empty text parts are inserted there so the
    /// line break between them is kept.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut parts: Vec<Part> = Vec::new();
        for line in lines {
            let scanned = scan(line, LiteralKind::Text);
            if !parts.is_empty() {
                if parts.last().is_some_and(|last| !last.is_literal()) {
                    parts.push(Part::Text(String::new()));
                }
                if scanned.first().is_some_and(|first| !first.is_literal()) {
                    parts.push(Part::Text(String::new()));
                }
            }
            parts.extend(scanned);
        }
        Self { parts }
    }

    /// Parse a newline-separated block.
    pub fn parse(block: &str) -> Result<Self> {
        Ok(Self::from_lines(block.lines()))
    }

    /// Sum of the block's delay tokens.
    pub fn delays(&self) -> Duration {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Delay(ms) => Duration::from_millis(*ms),
                _ => Duration::ZERO,
            })
            .sum()
    }

    fn breaks_after(&self, index: usize) -> bool {
        self.parts.get(index + 1).is_some_and(Part::is_literal)
    }
}

impl SceneAction for Output {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dispatch(&self, ctx: &mut Context<'_>) -> Result<Duration, PlaybackError> {
        if let Some(part) = self
            .parts
            .iter()
            .find(|part| matches!(part, Part::Typing(_) | Part::Insert(_)))
        {
            return Err(ctx.malformed(Self::NAME, format!("unexpected part {part:?}")));
        }

        let mut cursor = ctx.config().output_priming;
        for (index, part) in self.parts.iter().enumerate() {
            match part {
                Part::Text(text) => {
                    let mut line = text.clone();
                    if self.breaks_after(index) {
                        line.push_str(LINE_BREAK);
                    }
                    if !line.is_empty() {
                        ctx.emit_at(cursor, TerminalOp::Write(line));
                    }
                }
                Part::Delay(ms) => cursor += Duration::from_millis(*ms),
                other => {
                    if let Some(op) = color_op(other) {
                        ctx.emit_at(cursor, op);
                    }
                }
            }
        }

        Ok(cursor)
    }

    fn to_source(&self) -> String {
        let mut out = String::from("output:");
        if self.parts.is_empty() {
            return out;
        }
        out.push('\n');
        for (index, part) in self.parts.iter().enumerate() {
            render_part(part, &mut out);
            if part.is_literal() && self.breaks_after(index) {
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::testing::{dispatch, ms};
    use crate::sink::Control;
    use crate::state::PlaybackState;

    fn text(s: &str) -> Part {
        Part::Text(s.to_string())
    }

    #[test]
    fn test_parse_lines() {
        let output = Output::parse("file1\nfile2").unwrap();
        assert_eq!(output.parts, vec![text("file1"), text("file2")]);
    }

    #[test]
    fn test_parse_keeps_break_after_token() {
        let output = Output::parse("%{begin:31}error%{end}\nnext").unwrap();
        assert_eq!(
            output.parts,
            vec![
                Part::ColorBegin {
                    background: None,
                    text: 31
                },
                text("error"),
                Part::ColorEnd,
                text(""),
                text("next"),
            ]
        );
    }

    #[test]
    fn test_parse_keeps_break_before_token() {
        let output = Output::parse("first\n%{begin:32}PASS%{end} test").unwrap();
        assert_eq!(
            output.parts,
            vec![
                text("first"),
                text(""),
                Part::ColorBegin {
                    background: None,
                    text: 32
                },
                text("PASS"),
                Part::ColorEnd,
                text(" test"),
            ]
        );
    }

    #[test]
    fn test_line_starting_with_color_is_not_joined() {
        let output = Output::parse("first\n%{begin:32}PASS%{end} test").unwrap();
        let out = dispatch(&output, PlaybackState::default()).unwrap();
        let ops: Vec<_> = out.ops.into_iter().map(|(_, op)| op).collect();
        assert_eq!(
            ops,
            vec![
                TerminalOp::write("first\r\n"),
                TerminalOp::Control(Control::BeginColor {
                    background: None,
                    text: 32
                }),
                TerminalOp::write("PASS"),
                TerminalOp::Control(Control::EndColor),
                TerminalOp::write(" test"),
            ]
        );
    }

    #[test]
    fn test_token_on_both_sides_of_a_break() {
        let output = Output::parse("%{begin:31}a%{end}\n%{begin:32}b%{end}").unwrap();
        let out = dispatch(&output, PlaybackState::default()).unwrap();
        let written: String = out
            .ops
            .iter()
            .filter_map(|(_, op)| match op {
                TerminalOp::Write(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(written, "a\r\nb");
    }

    #[test]
    fn test_line_of_only_a_delay() {
        let output = Output::parse("a\n%{delay 300}\nb").unwrap();
        let out = dispatch(&output, PlaybackState::default()).unwrap();
        assert_eq!(out.advance, ms(400));
        assert_eq!(
            out.ops,
            vec![
                (ms(100), TerminalOp::write("a\r\n")),
                (ms(400), TerminalOp::write("\r\n")),
                (ms(400), TerminalOp::write("b")),
            ]
        );
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let output = Output::parse("a\n\nb").unwrap();
        assert_eq!(output.parts, vec![text("a"), text(""), text("b")]);
    }

    #[test]
    fn test_lines_written_after_priming() {
        let out = dispatch(&Output::parse("file1\nfile2").unwrap(), PlaybackState::default())
            .unwrap();
        assert_eq!(out.advance, ms(100));
        assert_eq!(
            out.ops,
            vec![
                (ms(100), TerminalOp::write("file1\r\n")),
                (ms(100), TerminalOp::write("file2")),
            ]
        );
    }

    #[test]
    fn test_delays_shift_later_parts() {
        let output = Output::parse("Building...%{delay 400}\ndone%{delay 50}").unwrap();
        let out = dispatch(&output, PlaybackState::default()).unwrap();
        assert_eq!(out.advance, ms(550));
        assert_eq!(
            out.ops,
            vec![
                (ms(100), TerminalOp::write("Building...")),
                (ms(500), TerminalOp::write("\r\n")),
                (ms(500), TerminalOp::write("done")),
            ]
        );
    }

    #[test]
    fn test_no_break_before_color() {
        let output = Output::parse("status: %{begin:40;32}OK%{end}").unwrap();
        let out = dispatch(&output, PlaybackState::default()).unwrap();
        let ops: Vec<_> = out.ops.into_iter().map(|(_, op)| op).collect();
        assert_eq!(
            ops,
            vec![
                TerminalOp::write("status: "),
                TerminalOp::Control(Control::BeginColor {
                    background: Some(40),
                    text: 32
                }),
                TerminalOp::write("OK"),
                TerminalOp::Control(Control::EndColor),
            ]
        );
    }

    #[test]
    fn test_advance_ignores_text_length() {
        let short = Output::parse("x").unwrap();
        let long = Output::parse(&"y".repeat(10_000)).unwrap();
        let short = dispatch(&short, PlaybackState::default()).unwrap();
        let long = dispatch(&long, PlaybackState::default()).unwrap();
        assert_eq!(short.advance, long.advance);
    }

    #[test]
    fn test_typing_part_is_malformed() {
        let output = Output {
            parts: vec![Part::Typing("x".into())],
        };
        assert!(dispatch(&output, PlaybackState::default()).is_err());
    }

    #[test]
    fn test_to_source() {
        let output = Output::parse("%{begin:31}error%{end}\nnext\n\nlast").unwrap();
        assert_eq!(
            output.to_source(),
            "output:\n%{begin:31}error%{end}\nnext\n\nlast"
        );
        let source = "a\n%{begin:32}b%{end}\n%{delay 5}\n%{begin:33}c";
        let output = Output::parse(source).unwrap();
        assert_eq!(output.to_source(), format!("output:\n{source}"));
        let body = output.to_source().replacen("output:\n", "", 1);
        assert_eq!(Output::parse(&body).unwrap(), output);
        assert_eq!(Output::parse("").unwrap().to_source(), "output:");
    }
}
