//! Presentation state carried across actions, and the timing configuration.

use std::time::Duration;

/// Prompt shown before typed or pasted input when none is configured.
pub const DEFAULT_PROMPT: &str = "~:";

/// Timing and presentation defaults for a [`Scheduler`](crate::Scheduler).
///
/// The defaults reproduce the reference timings: 100 ms per typed character at
/// speed 1, 100 ms settle after state-only actions, 100 ms output priming,
/// 100 ms per pasted chunk and 10 ms between scroll steps.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    pub base_typing_timeout: Duration,
    pub settle: Duration,
    pub output_priming: Duration,
    pub paste_part: Duration,
    pub scroll_step: Duration,
    /// Initial prompt; `None` starts with the prompt disabled.
    pub prompt: Option<String>,
    /// SGR text color the prompt is drawn in.
    pub prompt_color: u8,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_typing_timeout: Duration::from_millis(100),
            settle: Duration::from_millis(100),
            output_priming: Duration::from_millis(100),
            paste_part: Duration::from_millis(100),
            scroll_step: Duration::from_millis(10),
            prompt: Some(DEFAULT_PROMPT.to_string()),
            prompt_color: 36,
        }
    }
}

impl PlaybackConfig {
    /// Replace the initial prompt.
    pub fn with_prompt(mut self, prompt: Option<impl Into<String>>) -> Self {
        self.prompt = prompt.map(Into::into);
        self
    }
}

/// Presentation state mutated by `prompt:`, `cursor:`, `margin-*:` and
/// `typing_speed:` and read by later actions.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub prompt: Option<String>,
    pub typing_speed: f64,
    pub cursor_visible: bool,
    pub margin_x: i32,
    pub margin_y: i32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}

impl PlaybackState {
    /// Fresh state for a newly loaded scenario.
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            prompt: config.prompt.clone(),
            typing_speed: 1.0,
            cursor_visible: true,
            margin_x: 0,
            margin_y: 0,
        }
    }

    /// Per-character typing delay at the current speed.
    pub fn typing_timeout(&self, base: Duration) -> Duration {
        // Whole nanoseconds, rounded.
        Duration::from_nanos((base.as_nanos() as f64 / self.typing_speed).round() as u64)
    }
}
