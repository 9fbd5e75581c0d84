//! [`Cursor`] action: shows or hides the terminal cursor.
//!
//! Script syntax: `cursor: false` / `cursor: true`

use crate::action::{Context, SceneAction};
use crate::directive::{DirectiveName, format_directive};
use crate::error::PlaybackError;
use crate::sink::TerminalOp;
use anyhow::Result;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub visible: bool,
}

impl Cursor {
    pub const NAME: &'static str = "cursor";

    /// `false`, `0` and an empty value hide the cursor; anything else shows it.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim().to_lowercase();
        Ok(Self {
            visible: !matches!(value.as_str(), "false" | "" | "0"),
        })
    }
}

impl SceneAction for Cursor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dispatch(&self, ctx: &mut Context<'_>) -> Result<Duration, PlaybackError> {
        ctx.state_mut().cursor_visible = self.visible;
        ctx.emit(TerminalOp::SetCursorVisible(self.visible));
        Ok(ctx.config().settle)
    }

    fn to_source(&self) -> String {
        format_directive(DirectiveName::Cursor, &self.visible.to_string())
    }
}
