//! [`TypingSpeed`] action: changes how fast later `input:` actions type.
//!
//! Script syntax: `typing_speed: 2` (twice as fast) or `typing_speed: 0.5`.

use crate::action::{Context, SceneAction};
use crate::directive::{DirectiveName, format_directive};
use crate::error::PlaybackError;
use anyhow::Result;
use std::time::Duration;

/// Sets the typing speed multiplier; the per-character timeout is the base
/// timeout divided by it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypingSpeed {
    pub multiplier: f64,
}

impl TypingSpeed {
    pub const NAME: &'static str = "typing_speed";

    /// Never fails: values that are not finite positive numbers fall back to 1.
    pub fn parse(value: &str) -> Result<Self> {
        let multiplier = match value.trim().parse::<f64>() {
            Ok(m) if m.is_finite() && m > 0.0 => m,
            _ => {
                tracing::warn!(value, "invalid typing speed, using 1");
                1.0
            }
        };
        Ok(Self { multiplier })
    }
}

impl SceneAction for TypingSpeed {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dispatch(&self, ctx: &mut Context<'_>) -> Result<Duration, PlaybackError> {
        if !(self.multiplier.is_finite() && self.multiplier > 0.0) {
            return Err(ctx.malformed(
                Self::NAME,
                format!("multiplier must be finite and positive, got {}", self.multiplier),
            ));
        }
        ctx.state_mut().typing_speed = self.multiplier;
        Ok(ctx.config().settle)
    }

    fn to_source(&self) -> String {
        format_directive(DirectiveName::TypingSpeed, &self.multiplier.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::testing::{dispatch, ms};
    use crate::state::PlaybackState;

    #[test]
    fn test_parse() {
        assert_eq!(TypingSpeed::parse("2").unwrap().multiplier, 2.0);
        assert_eq!(TypingSpeed::parse("0.5").unwrap().multiplier, 0.5);
    }

    #[test]
    fn test_parse_falls_back_to_one() {
        for value in ["0", "-2", "abc", "", "inf", "NaN"] {
            assert_eq!(TypingSpeed::parse(value).unwrap().multiplier, 1.0, "{value:?}");
        }
    }

    #[test]
    fn test_dispatch() {
        let out = dispatch(&TypingSpeed { multiplier: 3.0 }, PlaybackState::default()).unwrap();
        assert_eq!(out.advance, ms(100));
        assert_eq!(out.state.typing_speed, 3.0);
    }

    #[test]
    fn test_zero_multiplier_is_malformed() {
        let err = dispatch(&TypingSpeed { multiplier: 0.0 }, PlaybackState::default())
            .err()
            .unwrap();
        assert!(matches!(err, PlaybackError::MalformedAction { .. }));
    }

    #[test]
    fn test_to_source() {
        assert_eq!(TypingSpeed { multiplier: 2.0 }.to_source(), "typing_speed: 2");
        assert_eq!(TypingSpeed { multiplier: 1.5 }.to_source(), "typing_speed: 1.5");
    }
}
