//! # Scenetty
//!
//! A scenario player for fake terminal sessions.
//!
//! Scenetty reads a plain-text scenario of directives and replays it as a
//! timed terminal session: a prompt appears, commands are typed character by
//! character, program output is printed, and the screen is cleared or
//! scrolled, all on a schedule you control. It is useful for recording
//! terminal demos and walkthroughs without running the real programs.
//!
//! ## Quick start
//!
//! ```no_run
//! use scenetty::{AnsiSink, Scheduler, parse_str};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let scenario = parse_str(
//!         "input: ls -la\n\
//!          output:\n\
//!          README.md\n\
//!          Cargo.toml\n",
//!     );
//!
//!     let mut scheduler = Scheduler::new(AnsiSink::new(tokio::io::stdout()));
//!     scheduler.on_complete(|report| eprintln!("done in {:?}", report.elapsed));
//!     scheduler.play(scenario.actions).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing scenarios
//!
//! Use [`parse_str`] to parse a scenario from an in-memory string, or
//! [`parse_file`] to read one from a file path. Both return a [`Scenario`]
//! holding the [`Action`]s to pass to [`Scheduler::play`], the `audio:` hints,
//! and any diagnostics for directives that were left out.
//!
//! ## Scenario syntax
//!
//! A directive is `name: value` at the start of a line. When the value is
//! empty it is taken from the next line instead. Lines outside directives are
//! ignored, except in `output:` blocks, which run up to the next directive.
//!
//! | Directive | Description |
//! |-----------|-------------|
//! | `input: text` | Write the prompt, then type `text` one character at a time |
//! | `output:` | Print the following lines as program output |
//! | `paste: text` | Write the prompt, then insert `text` at once |
//! | `delay: 500` | Pause for a number of milliseconds |
//! | `clear:` | Clear the screen |
//! | `prompt: $` | Change the prompt; `prompt: false` hides it |
//! | `cursor: false` | Show or hide the cursor |
//! | `scroll_lines: -3` | Scroll by a number of lines, negative scrolls up |
//! | `margin-x: 12` / `margin-y: 4` | Set the horizontal or vertical margin |
//! | `typing_speed: 2` | Multiply the typing speed of later `input:` actions |
//! | `audio: intro.mp3` | Hint the host to play a sound; not an action |
//!
//! Text values may contain inline tokens:
//!
//! | Token | Description |
//! |-------|-------------|
//! | `%{delay 300}` | Pause for 300 ms |
//! | `%{begin:32}` / `%{begin:40;32}` | Start a text color, optionally with a background |
//! | `%{end}` | Reset colors |
//!
//! In `input:` text, `\b` erases the previous character and `\;` types `;`.
//!
//! ## Custom sinks
//!
//! [`AnsiSink`] renders ANSI escape sequences to any [`tokio::io::AsyncWrite`].
//! Implement [`TerminalSink`] to drive something else, or use
//! [`RecordingSink`] to capture a timestamped log of every operation:
//!
//! ```
//! use scenetty::{RecordingSink, Scheduler, parse_str};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let sink = RecordingSink::new();
//! let mut scheduler = Scheduler::new(sink.clone());
//! scheduler.play(parse_str("prompt: false\ninput: hi\n").actions).await?;
//! assert_eq!(sink.text(), "hi\r\n");
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod actions;
pub mod directive;
pub mod error;
pub mod parser;
pub mod scheduler;
pub mod serialize;
pub mod sink;
pub mod state;
pub mod tokens;
pub(crate) mod timer;

pub use action::{Action, Context, SceneAction};
pub use error::{ParseError, PlaybackError};
pub use parser::{AudioCue, Scenario, parse_file, parse_str};
pub use scheduler::{Phase, PlaybackReport, Scheduler};
pub use serialize::{scenario_to_source, to_source};
pub use sink::{AnsiSink, Control, RecordingSink, TerminalOp, TerminalSink};
pub use state::{PlaybackConfig, PlaybackState};
