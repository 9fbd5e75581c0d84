//! [`Prompt`] action: changes the prompt shown before input.
//!
//! Script syntax: `prompt: user@host $` or `prompt: false` to hide it.

use crate::action::{Context, SceneAction};
use crate::directive::{DirectiveName, format_directive};
use crate::error::PlaybackError;
use anyhow::Result;
use std::time::Duration;

/// Replaces the prompt used by later `input:` and `paste:` actions. Writes
/// nothing itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// `None` disables the prompt.
    pub text: Option<String>,
}

impl Prompt {
    pub const NAME: &'static str = "prompt";

    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let text = if trimmed.is_empty() || trimmed == "false" {
            None
        } else {
            Some(value.to_string())
        };
        Ok(Self { text })
    }
}

impl SceneAction for Prompt {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dispatch(&self, ctx: &mut Context<'_>) -> Result<Duration, PlaybackError> {
        ctx.state_mut().prompt = self.text.clone();
        Ok(ctx.config().settle)
    }

    fn to_source(&self) -> String {
        format_directive(
            DirectiveName::Prompt,
            self.text.as_deref().unwrap_or("false"),
        )
    }
}
