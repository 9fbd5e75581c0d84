//! The [`TerminalSink`] boundary and two implementations: [`AnsiSink`], which
//! renders ANSI bytes to any async writer, and [`RecordingSink`], which keeps a
//! timestamped log of every operation.

use anyhow::Result;
use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;

/// Control sequences a scenario can emit besides plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    BeginColor { background: Option<u8>, text: u8 },
    EndColor,
    /// Destructive backspace: erase the character left of the cursor.
    Backspace,
}

/// One primitive terminal operation, as queued by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalOp {
    Write(String),
    Control(Control),
    Clear,
    /// Scroll by one line; positive moves the content up.
    Scroll(i8),
    SetCursorVisible(bool),
    SetMargins { x: i32, y: i32 },
}

impl TerminalOp {
    pub fn write(text: impl Into<String>) -> Self {
        TerminalOp::Write(text.into())
    }

    /// Forward this operation to the matching sink method.
    pub async fn apply(&self, sink: &mut dyn TerminalSink) -> Result<()> {
        match self {
            TerminalOp::Write(text) => sink.write(text).await,
            TerminalOp::Control(control) => sink.write_control(*control).await,
            TerminalOp::Clear => sink.clear().await,
            TerminalOp::Scroll(lines) => sink.scroll_by(*lines).await,
            TerminalOp::SetCursorVisible(visible) => sink.set_cursor_visible(*visible).await,
            TerminalOp::SetMargins { x, y } => sink.set_margins(*x, *y).await,
        }
    }
}

/// The rendering surface a scenario plays into.
#[async_trait(?Send)]
pub trait TerminalSink {
    async fn write(&mut self, text: &str) -> Result<()>;

    async fn write_control(&mut self, control: Control) -> Result<()>;

    async fn clear(&mut self) -> Result<()>;

    async fn scroll_by(&mut self, lines: i8) -> Result<()>;

    async fn set_cursor_visible(&mut self, visible: bool) -> Result<()>;

    /// Margins are a property of the host surface; sinks that cannot show
    /// them may ignore the call.
    async fn set_margins(&mut self, x: i32, y: i32) -> Result<()>;
}

/// Renders operations as ANSI escape sequences to an async writer.
pub struct AnsiSink<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> AnsiSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    async fn emit(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// The ANSI encoding of a control sequence.
pub fn ansi_control(control: Control) -> String {
    match control {
        Control::BeginColor { background, text } => {
            let mut seq = format!("\x1b[0;{text}m");
            if let Some(background) = background {
                seq.push_str(&format!("\x1b[{background}m"));
            }
            seq
        }
        Control::EndColor => "\x1b[0m".to_string(),
        Control::Backspace => "\x08 \x08".to_string(),
    }
}

#[async_trait(?Send)]
impl<W: AsyncWrite + Unpin> TerminalSink for AnsiSink<W> {
    async fn write(&mut self, text: &str) -> Result<()> {
        self.emit(text.as_bytes()).await
    }

    async fn write_control(&mut self, control: Control) -> Result<()> {
        self.emit(ansi_control(control).as_bytes()).await
    }

    async fn clear(&mut self) -> Result<()> {
        self.emit(b"\x1b[2J\x1b[1;1H").await
    }

    async fn scroll_by(&mut self, lines: i8) -> Result<()> {
        match lines {
            0 => Ok(()),
            n if n > 0 => self.emit(format!("\x1b[{n}S").as_bytes()).await,
            n => self.emit(format!("\x1b[{}T", n.unsigned_abs()).as_bytes()).await,
        }
    }

    async fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        let seq: &[u8] = if visible { b"\x1b[?25h" } else { b"\x1b[?25l" };
        self.emit(seq).await
    }

    async fn set_margins(&mut self, x: i32, y: i32) -> Result<()> {
        tracing::debug!(x, y, "margins have no ANSI encoding, ignoring");
        Ok(())
    }
}

/// An operation captured by [`RecordingSink`], with the time it arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub at: Duration,
    pub op: TerminalOp,
}

/// Records every operation with its offset from the sink's creation.
///
/// Clones share the same log, so a test can keep one handle and give the
/// other to the scheduler.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    started: Instant,
    log: Rc<RefCell<Vec<Recorded>>>,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<Recorded> {
        self.log.borrow().clone()
    }

    /// The recorded operations without timestamps.
    pub fn ops(&self) -> Vec<TerminalOp> {
        self.log.borrow().iter().map(|r| r.op.clone()).collect()
    }

    /// Concatenation of all written text, ignoring controls.
    pub fn text(&self) -> String {
        self.log
            .borrow()
            .iter()
            .filter_map(|r| match &r.op {
                TerminalOp::Write(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, op: TerminalOp) -> Result<()> {
        self.log.borrow_mut().push(Recorded {
            at: self.started.elapsed(),
            op,
        });
        Ok(())
    }
}

#[async_trait(?Send)]
impl TerminalSink for RecordingSink {
    async fn write(&mut self, text: &str) -> Result<()> {
        self.record(TerminalOp::write(text))
    }

    async fn write_control(&mut self, control: Control) -> Result<()> {
        self.record(TerminalOp::Control(control))
    }

    async fn clear(&mut self) -> Result<()> {
        self.record(TerminalOp::Clear)
    }

    async fn scroll_by(&mut self, lines: i8) -> Result<()> {
        self.record(TerminalOp::Scroll(lines))
    }

    async fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        self.record(TerminalOp::SetCursorVisible(visible))
    }

    async fn set_margins(&mut self, x: i32, y: i32) -> Result<()> {
        self.record(TerminalOp::SetMargins { x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ansi_colors() {
        assert_eq!(
            ansi_control(Control::BeginColor {
                background: Some(41),
                text: 37
            }),
            "\x1b[0;37m\x1b[41m"
        );
        assert_eq!(
            ansi_control(Control::BeginColor {
                background: None,
                text: 32
            }),
            "\x1b[0;32m"
        );
        assert_eq!(ansi_control(Control::EndColor), "\x1b[0m");
    }

    #[tokio::test]
    async fn test_ansi_sink_output() {
        let mut sink = AnsiSink::new(Vec::<u8>::new());
        for op in [
            TerminalOp::write("hi"),
            TerminalOp::Control(Control::Backspace),
            TerminalOp::Scroll(1),
            TerminalOp::Scroll(-1),
            TerminalOp::SetCursorVisible(false),
            TerminalOp::SetMargins { x: 4, y: 2 },
            TerminalOp::Clear,
        ] {
            op.apply(&mut sink).await.unwrap();
        }
        let bytes = sink.into_inner();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "hi\x08 \x08\x1b[1S\x1b[1T\x1b[?25l\x1b[2J\x1b[1;1H"
        );
    }

    #[tokio::test]
    async fn test_recording_sink_shares_log() {
        let handle = RecordingSink::new();
        let mut sink = handle.clone();
        TerminalOp::write("a").apply(&mut sink).await.unwrap();
        TerminalOp::Clear.apply(&mut sink).await.unwrap();
        TerminalOp::write("b").apply(&mut sink).await.unwrap();
        assert_eq!(handle.ops().len(), 3);
        assert_eq!(handle.text(), "ab");
    }
}
