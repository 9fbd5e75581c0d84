//! [`Delay`] action: pauses playback for a fixed number of milliseconds.
//!
//! Script syntax: `delay: 1500`

use crate::action::{Context, SceneAction};
use crate::directive::{DirectiveName, format_directive};
use crate::error::PlaybackError;
use crate::parser::parse_int;
use anyhow::Result;
use std::time::Duration;

/// Pauses before the next action without any visible effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delay {
    pub duration: Duration,
}

impl Delay {
    pub const NAME: &'static str = "delay";

    pub fn from_millis(ms: u64) -> Self {
        Self {
            duration: Duration::from_millis(ms),
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        Ok(Self::from_millis(parse_int(value)?))
    }
}

impl SceneAction for Delay {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dispatch(&self, _ctx: &mut Context<'_>) -> Result<Duration, PlaybackError> {
        Ok(self.duration)
    }

    fn to_source(&self) -> String {
        format_directive(DirectiveName::Delay, &self.duration.as_millis().to_string())
    }
}
