//! [`Margin`] action: sets the horizontal or vertical margin around the
//! terminal surface.
//!
//! Script syntax: `margin-x: 40` / `margin-y: 20`

use crate::action::{Context, SceneAction};
use crate::directive::{DirectiveName, format_directive};
use crate::error::PlaybackError;
use crate::parser::parse_int;
use crate::sink::TerminalOp;
use anyhow::Result;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn directive(self) -> DirectiveName {
        match self {
            Axis::X => DirectiveName::MarginX,
            Axis::Y => DirectiveName::MarginY,
        }
    }
}

/// Updates one margin and hands both current margins to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margin {
    pub axis: Axis,
    pub px: i32,
}

impl Margin {
    pub const NAME_X: &'static str = "margin-x";
    pub const NAME_Y: &'static str = "margin-y";

    pub fn parse(axis: Axis, value: &str) -> Result<Self> {
        Ok(Self {
            axis,
            px: parse_int(value)?,
        })
    }
}

impl SceneAction for Margin {
    fn name(&self) -> &'static str {
        match self.axis {
            Axis::X => Self::NAME_X,
            Axis::Y => Self::NAME_Y,
        }
    }

    fn dispatch(&self, ctx: &mut Context<'_>) -> Result<Duration, PlaybackError> {
        let state = ctx.state_mut();
        match self.axis {
            Axis::X => state.margin_x = self.px,
            Axis::Y => state.margin_y = self.px,
        }
        let (x, y) = (state.margin_x, state.margin_y);
        ctx.emit(TerminalOp::SetMargins { x, y });
        Ok(ctx.config().settle)
    }

    fn to_source(&self) -> String {
        format_directive(self.axis.directive(), &self.px.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::testing::{dispatch, ms};
    use crate::state::PlaybackState;

    #[test]
    fn test_parse() {
        assert_eq!(
            Margin::parse(Axis::Y, "24").unwrap(),
            Margin { axis: Axis::Y, px: 24 }
        );
        assert!(Margin::parse(Axis::X, "24px").is_err());
    }

    #[test]
    fn test_dispatch_keeps_other_axis() {
        let state = PlaybackState {
            margin_y: 7,
            ..PlaybackState::default()
        };
        let out = dispatch(&Margin { axis: Axis::X, px: 30 }, state).unwrap();
        assert_eq!(out.advance, ms(100));
        assert_eq!((out.state.margin_x, out.state.margin_y), (30, 7));
        assert_eq!(out.ops, vec![(ms(0), TerminalOp::SetMargins { x: 30, y: 7 })]);
    }

    #[test]
    fn test_to_source() {
        assert_eq!(Margin { axis: Axis::Y, px: -4 }.to_source(), "margin-y: -4");
    }
}
