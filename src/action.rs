//! The [`SceneAction`] trait, the [`Context`] actions dispatch into, and the
//! closed [`Action`] enum produced by the parser.

use crate::actions::{
    Clear, Cursor, Delay, Input, Margin, Output, Paste, Prompt, ScrollLines, TypingSpeed,
};
use crate::error::PlaybackError;
use crate::sink::{Control, TerminalOp};
use crate::state::{PlaybackConfig, PlaybackState};
use crate::timer::{TimerKind, TimerQueue};
use std::time::Duration;
use tokio::time::Instant;

/// Line break written after input and between output lines.
pub const LINE_BREAK: &str = "\r\n";

/// Dispatch context passed to [`SceneAction::dispatch`].
///
/// Gives the action the presentation state, the timing configuration and a way
/// to schedule terminal operations relative to the moment it was dispatched.
pub struct Context<'a> {
    pub(crate) index: usize,
    pub(crate) now: Instant,
    pub(crate) state: &'a mut PlaybackState,
    pub(crate) config: &'a PlaybackConfig,
    pub(crate) timers: &'a mut TimerQueue,
}

impl Context<'_> {
    pub fn state(&self) -> &PlaybackState {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut PlaybackState {
        self.state
    }

    pub fn config(&self) -> &PlaybackConfig {
        self.config
    }

    /// Schedule `op` to reach the sink `offset` after dispatch.
    pub fn emit_at(&mut self, offset: Duration, op: TerminalOp) {
        self.timers.push(self.now + offset, TimerKind::Emit(op));
    }

    /// Schedule `op` at the dispatch instant.
    pub fn emit(&mut self, op: TerminalOp) {
        self.emit_at(Duration::ZERO, op);
    }

    /// Schedule the colored prompt, if one is enabled.
    pub fn emit_prompt(&mut self) {
        let Some(prompt) = self.state.prompt.clone() else {
            return;
        };
        let color = self.config.prompt_color;
        self.emit(TerminalOp::Control(Control::BeginColor {
            background: None,
            text: color,
        }));
        self.emit(TerminalOp::Write(prompt));
        self.emit(TerminalOp::Control(Control::EndColor));
        self.emit(TerminalOp::write(" "));
    }

    /// Build the fatal error for a corrupt action at the current index.
    pub fn malformed(&self, action: &'static str, reason: impl Into<String>) -> PlaybackError {
        PlaybackError::MalformedAction {
            index: self.index,
            action,
            reason: reason.into(),
        }
    }
}

/// A single scenario action.
///
/// To add one:
///
/// 1. Define the struct with a `pub const NAME: &'static str` and an inherent
///    `parse` in its own file under `src/actions/`.
/// 2. Add a variant to [`Action`], a name to
///    [`DirectiveName`](crate::directive::DirectiveName), and an arm to
///    `parse_action` in [`crate::parser`].
pub trait SceneAction {
    /// The directive keyword this action is written with.
    fn name(&self) -> &'static str;

    /// Apply immediate state changes, schedule the action's terminal operations
    /// relative to `ctx`'s dispatch instant, and return how long the scheduler
    /// waits before dispatching the next action.
    ///
    /// Every operation must be scheduled at an offset no later than the
    /// returned duration, except where an action documents otherwise.
    fn dispatch(&self, ctx: &mut Context<'_>) -> Result<Duration, PlaybackError>;

    /// Render the action back into scenario source.
    fn to_source(&self) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Input(Input),
    Output(Output),
    Paste(Paste),
    Delay(Delay),
    Clear(Clear),
    Prompt(Prompt),
    Cursor(Cursor),
    ScrollLines(ScrollLines),
    Margin(Margin),
    TypingSpeed(TypingSpeed),
}

impl Action {
    pub fn as_scene_action(&self) -> &dyn SceneAction {
        match self {
            Action::Input(a) => a,
            Action::Output(a) => a,
            Action::Paste(a) => a,
            Action::Delay(a) => a,
            Action::Clear(a) => a,
            Action::Prompt(a) => a,
            Action::Cursor(a) => a,
            Action::ScrollLines(a) => a,
            Action::Margin(a) => a,
            Action::TypingSpeed(a) => a,
        }
    }

    pub fn name(&self) -> &'static str {
        self.as_scene_action().name()
    }
}
