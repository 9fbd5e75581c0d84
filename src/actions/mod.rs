mod clear;
mod cursor;
mod delay;
mod input;
mod margin;
mod output;
mod paste;
mod prompt;
mod scroll_lines;
mod typing_speed;

pub use clear::Clear;
pub use cursor::Cursor;
pub use delay::Delay;
pub use input::Input;
pub use margin::{Axis, Margin};
pub use output::Output;
pub use paste::Paste;
pub use prompt::Prompt;
pub use scroll_lines::ScrollLines;
pub use typing_speed::TypingSpeed;

use crate::sink::{Control, TerminalOp};
use crate::tokens::Part;

/// The sink operation for a color token, `None` for any other part.
pub(crate) fn color_op(part: &Part) -> Option<TerminalOp> {
    match part {
        Part::ColorBegin { background, text } => Some(TerminalOp::Control(Control::BeginColor {
            background: *background,
            text: *text,
        })),
        Part::ColorEnd => Some(TerminalOp::Control(Control::EndColor)),
        _ => None,
    }
}
