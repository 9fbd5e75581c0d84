//! Rendering actions back to scenario text.
//!
//! The output is normalized: one directive per action, values inline where the
//! parser would read them back unchanged.

use crate::action::Action;
use crate::directive::{DirectiveName, format_directive};
use crate::parser::Scenario;

/// Render `actions` as scenario source, one directive per action.
///
/// Parsing the result yields the same actions.
pub fn to_source(actions: &[Action]) -> String {
    let mut out = String::new();
    for action in actions {
        out.push_str(&action.as_scene_action().to_source());
        out.push('\n');
    }
    out
}

/// Render a whole scenario, placing each `audio:` hint before the action it
/// precedes. Diagnostics are not rendered.
pub fn scenario_to_source(scenario: &Scenario) -> String {
    let mut out = String::new();
    let mut cues = scenario.audio.iter().peekable();
    for index in 0..=scenario.actions.len() {
        while let Some(cue) = cues.next_if(|cue| cue.before_action <= index) {
            out.push_str(&format_directive(DirectiveName::Audio, &cue.path));
            out.push('\n');
        }
        if let Some(action) = scenario.actions.get(index) {
            out.push_str(&action.as_scene_action().to_source());
            out.push('\n');
        }
    }
    out
}
