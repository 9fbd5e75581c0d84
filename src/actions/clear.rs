//! [`Clear`] action: clears the terminal.
//!
//! Script syntax: `clear:`

use crate::action::{Context, SceneAction};
use crate::error::PlaybackError;
use crate::sink::TerminalOp;
use std::time::Duration;

/// Clears the screen immediately, then waits the settle time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clear;

impl Clear {
    pub const NAME: &'static str = "clear";
}

impl SceneAction for Clear {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dispatch(&self, ctx: &mut Context<'_>) -> Result<Duration, PlaybackError> {
        ctx.emit(TerminalOp::Clear);
        Ok(ctx.config().settle)
    }

    fn to_source(&self) -> String {
        "clear:".to_string()
    }
}
