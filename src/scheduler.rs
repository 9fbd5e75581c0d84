//! Timed playback of a parsed scenario.
//!
//! The [`Scheduler`] walks the action list one action at a time. Dispatching an
//! action queues its terminal operations on a timer queue and returns how long
//! the action lasts; the scheduler then queues the dispatch of the next action
//! at that deadline. The run loop sleeps until the earliest timer, fires it, and
//! repeats until the queue is empty.
//!
//! Everything runs on the calling task. Timers fire in deadline order and, when
//! deadlines are equal, in the order they were queued, so an action's own
//! operations always fire before it hands over to the next action.

use crate::action::{Action, Context};
use crate::error::PlaybackError;
use crate::sink::TerminalSink;
use crate::state::{PlaybackConfig, PlaybackState};
use crate::timer::{TimerKind, TimerQueue};
use anyhow::{Context as _, Result, anyhow};
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Where the scheduler is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing dispatched yet.
    Idle,
    /// The action at this index is the one in flight.
    Running(usize),
    /// Every action has been dispatched and completion was signalled.
    Completed,
}

/// Summary handed to the completion handler and returned from
/// [`Scheduler::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackReport {
    /// Number of actions played.
    pub actions: usize,
    /// Time from the first dispatch to completion.
    pub elapsed: Duration,
    /// Presentation state at completion.
    pub state: PlaybackState,
}

type CompletionHandler = Box<dyn FnMut(&PlaybackReport)>;

/// Plays scenarios into a [`TerminalSink`].
pub struct Scheduler {
    config: PlaybackConfig,
    sink: Box<dyn TerminalSink>,
    actions: Option<Vec<Action>>,
    state: PlaybackState,
    timers: TimerQueue,
    phase: Phase,
    on_complete: Option<CompletionHandler>,
}

impl Scheduler {
    /// Create a scheduler with the default timings.
    pub fn new(sink: impl TerminalSink + 'static) -> Self {
        Self::with_config(PlaybackConfig::default(), sink)
    }

    pub fn with_config(config: PlaybackConfig, sink: impl TerminalSink + 'static) -> Self {
        let state = PlaybackState::new(&config);
        Scheduler {
            config,
            sink: Box::new(sink),
            actions: None,
            state,
            timers: TimerQueue::new(),
            phase: Phase::Idle,
            on_complete: None,
        }
    }

    /// Register a handler called exactly once at the end of every scenario.
    pub fn on_complete(&mut self, handler: impl FnMut(&PlaybackReport) + 'static) {
        self.on_complete = Some(Box::new(handler));
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Load a scenario, replacing the previous one and resetting the
    /// presentation state.
    ///
    /// Both `load` and [`run`](Self::run) borrow the scheduler mutably, so a
    /// scenario cannot be loaded while another one is playing.
    pub fn load(&mut self, actions: Vec<Action>) {
        self.state = PlaybackState::new(&self.config);
        self.timers = TimerQueue::new();
        self.actions = Some(actions);
        self.phase = Phase::Idle;
    }

    /// Load `actions` and play them to completion.
    pub async fn play(&mut self, actions: Vec<Action>) -> Result<PlaybackReport> {
        self.load(actions);
        self.run().await
    }

    /// Play the loaded scenario to completion.
    ///
    /// Returns once completion has been signalled and every queued terminal
    /// operation has reached the sink. Dropping the returned future stops
    /// playback and leaves the scheduler idle, ready for the next
    /// [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Fails if nothing is loaded, if an action is malformed, or if the sink
    /// fails. Playback stops at the first error.
    pub async fn run(&mut self) -> Result<PlaybackReport> {
        let actions = self.actions.take().ok_or(PlaybackError::NoScenario)?;
        let mut run = RunGuard { scheduler: self };
        let result = run.scheduler.run_actions(&actions).await;
        result
    }

    async fn run_actions(&mut self, actions: &[Action]) -> Result<PlaybackReport> {
        let started = Instant::now();
        tracing::info!(actions = actions.len(), "starting scenario playback");

        let mut report = self.advance(actions, 0, started, started)?;
        while let Some(timer) = self.timers.pop() {
            sleep_until(timer.deadline).await;
            match timer.kind {
                TimerKind::Emit(op) => op
                    .apply(self.sink.as_mut())
                    .await
                    .with_context(|| format!("Terminal sink failed on {op:?}"))?,
                TimerKind::Advance(index) => {
                    if let Some(done) = self.advance(actions, index, timer.deadline, started)? {
                        report = Some(done);
                    }
                }
            }
        }

        report.ok_or_else(|| anyhow!("Playback ended before the last action"))
    }

    /// Dispatch the action at `index`, or complete when past the end.
    ///
    /// `now` is the deadline of the timer that triggered the dispatch, so the
    /// schedule does not drift with wake-up latency.
    fn advance(
        &mut self,
        actions: &[Action],
        index: usize,
        now: Instant,
        started: Instant,
    ) -> Result<Option<PlaybackReport>, PlaybackError> {
        let Some(action) = actions.get(index) else {
            return Ok(Some(self.complete(actions.len(), now - started)));
        };

        self.phase = Phase::Running(index);
        let mut ctx = Context {
            index,
            now,
            state: &mut self.state,
            config: &self.config,
            timers: &mut self.timers,
        };
        let duration = action.as_scene_action().dispatch(&mut ctx)?;
        tracing::debug!(
            index,
            action = action.name(),
            duration_ms = duration.as_millis() as u64,
            "dispatched action"
        );
        self.timers.push(now + duration, TimerKind::Advance(index + 1));
        Ok(None)
    }

    fn complete(&mut self, actions: usize, elapsed: Duration) -> PlaybackReport {
        self.phase = Phase::Completed;
        let report = PlaybackReport {
            actions,
            elapsed,
            state: self.state.clone(),
        };
        tracing::info!(
            actions,
            elapsed_ms = elapsed.as_millis() as u64,
            pending = self.timers.len(),
            "scenario playback finished"
        );
        if let Some(handler) = self.on_complete.as_mut() {
            handler(&report);
        }
        report
    }
}

/// Returns an interrupted scheduler to idle. Runs when playback fails and
/// when the `run` future is dropped mid-scenario.
struct RunGuard<'a> {
    scheduler: &'a mut Scheduler,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let scheduler = &mut *self.scheduler;
        if let Phase::Running(index) = scheduler.phase {
            tracing::warn!(
                index,
                pending = scheduler.timers.len(),
                "scenario playback interrupted"
            );
            scheduler.timers = TimerQueue::new();
            scheduler.phase = Phase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Input, TypingSpeed};
    use crate::parser::parse_str;
    use crate::sink::{Control, Recorded, RecordingSink, TerminalOp};
    use std::cell::Cell;
    use std::rc::Rc;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn at(millis: u64, op: TerminalOp) -> Recorded {
        Recorded { at: ms(millis), op }
    }

    fn no_prompt() -> PlaybackConfig {
        PlaybackConfig::default().with_prompt(None::<String>)
    }

    async fn play(config: PlaybackConfig, source: &str) -> (Vec<Recorded>, PlaybackReport) {
        let sink = RecordingSink::new();
        let mut scheduler = Scheduler::with_config(config, sink.clone());
        let report = scheduler.play(parse_str(source).actions).await.unwrap();
        (sink.records(), report)
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_then_output() {
        let (records, report) =
            play(PlaybackConfig::default(), "input:\nls -la\noutput:\nfile1\nfile2\n").await;

        let prompt = vec![
            at(
                0,
                TerminalOp::Control(Control::BeginColor {
                    background: None,
                    text: 36,
                }),
            ),
            at(0, TerminalOp::write("~:")),
            at(0, TerminalOp::Control(Control::EndColor)),
            at(0, TerminalOp::write(" ")),
        ];
        let typed: Vec<_> = "ls -la"
            .chars()
            .enumerate()
            .map(|(i, ch)| at(i as u64 * 100, TerminalOp::Write(ch.to_string())))
            .collect();
        let rest = vec![
            at(700, TerminalOp::write("\r\n")),
            at(800, TerminalOp::write("file1\r\n")),
            at(800, TerminalOp::write("file2")),
        ];
        let expected: Vec<_> = prompt.into_iter().chain(typed).chain(rest).collect();

        assert_eq!(records, expected);
        assert_eq!(report.actions, 2);
        assert_eq!(report.elapsed, ms(800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_advance_formula() {
        // Two typing parts, five characters in total, at speed 2.
        let source = "typing_speed: 2\ninput: abc%{delay 0}de\ndelay: 1\n";
        let (records, report) = play(no_prompt(), source).await;
        // 100 ms settle + (5 + 2) * 50 ms + 1 ms delay.
        assert_eq!(report.elapsed, ms(100 + 350 + 1));
        assert_eq!(records.last().unwrap(), &at(450, TerminalOp::write("\r\n")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_output_advance_formula() {
        let source = "output:\nlong line of text %{delay 300}\n%{delay 200}x\ndelay: 0\n";
        let (_, report) = play(no_prompt(), source).await;
        assert_eq!(report.elapsed, ms(100 + 300 + 200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_actions_settle() {
        let source = "prompt: $\ncursor: false\nmargin-x: 12\nclear:\n";
        let (records, report) = play(PlaybackConfig::default(), source).await;
        assert_eq!(report.elapsed, ms(400));
        assert_eq!(
            records,
            vec![
                at(100, TerminalOp::SetCursorVisible(false)),
                at(200, TerminalOp::SetMargins { x: 12, y: 0 }),
                at(300, TerminalOp::Clear),
            ]
        );
        assert_eq!(report.state.prompt.as_deref(), Some("$"));
        assert!(!report.state.cursor_visible);
        assert_eq!(report.state.margin_x, 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompt_change_applies_to_later_input() {
        let (records, _) = play(PlaybackConfig::default(), "prompt: false\ninput: x\n").await;
        assert_eq!(
            records,
            vec![
                at(100, TerminalOp::write("x")),
                at(300, TerminalOp::write("\r\n")),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_overruns_into_next_action() {
        let (records, report) = play(no_prompt(), "scroll_lines: 12\nclear:\n").await;
        assert_eq!(report.elapsed, ms(200));

        // The clear is dispatched at 100 ms while the last two scroll steps are
        // still pending.
        let clear = records
            .iter()
            .position(|r| r.op == TerminalOp::Clear)
            .unwrap();
        assert_eq!(records[clear].at, ms(100));
        let scrolls_after_clear = records[clear..]
            .iter()
            .filter(|r| r.op == TerminalOp::Scroll(1))
            .count();
        assert_eq!(scrolls_after_clear, 2);
        assert_eq!(records.last().unwrap(), &at(120, TerminalOp::Scroll(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_fires_once() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let mut scheduler = Scheduler::new(RecordingSink::new());
        scheduler.on_complete(move |_| counter.set(counter.get() + 1));

        let actions = parse_str("input: ab\nscroll_lines: 30\noutput:\na%{delay 5}b\n").actions;
        scheduler.play(actions).await.unwrap();
        assert_eq!(fired.get(), 1);
        assert_eq!(scheduler.phase(), Phase::Completed);

        scheduler.play(Vec::new()).await.unwrap();
        assert_eq!(fired.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_scenario_completes_immediately() {
        let (records, report) = play(PlaybackConfig::default(), "").await;
        assert!(records.is_empty());
        assert_eq!(report.actions, 0);
        assert_eq!(report.elapsed, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_resets_state() {
        let mut scheduler = Scheduler::new(RecordingSink::new());
        scheduler
            .play(parse_str("typing_speed: 4\ncursor: false\n").actions)
            .await
            .unwrap();
        assert_eq!(scheduler.state().typing_speed, 4.0);

        scheduler.load(Vec::new());
        assert_eq!(scheduler.state(), &PlaybackState::default());
        assert_eq!(scheduler.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_output_line_starting_with_color() {
        let (records, _) = play(no_prompt(), "output:\nfirst\n%{begin:32}PASS%{end} test\n").await;
        let text: String = records
            .iter()
            .filter_map(|r| match &r.op {
                TerminalOp::Write(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(text, "first\r\nPASS test");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_run_can_be_reloaded() {
        let sink = RecordingSink::new();
        let mut scheduler = Scheduler::with_config(no_prompt(), sink.clone());
        scheduler.load(parse_str("delay: 1000\ninput: late\n").actions);

        let cancelled = tokio::time::timeout(ms(10), scheduler.run()).await;
        assert!(cancelled.is_err());
        assert_eq!(scheduler.phase(), Phase::Idle);

        let report = scheduler
            .play(parse_str("input: ok\n").actions)
            .await
            .unwrap();
        assert_eq!(report.actions, 1);
        assert_eq!(scheduler.phase(), Phase::Completed);
        assert_eq!(sink.text(), "ok\r\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_consumes_the_scenario() {
        let mut scheduler = Scheduler::new(RecordingSink::new());
        scheduler.play(parse_str("delay: 5\n").actions).await.unwrap();
        let err = scheduler.run().await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<PlaybackError>(),
            Some(&PlaybackError::NoScenario)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_without_scenario() {
        let mut scheduler = Scheduler::new(RecordingSink::new());
        let err = scheduler.run().await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<PlaybackError>(),
            Some(&PlaybackError::NoScenario)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_action_halts() {
        let sink = RecordingSink::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let mut scheduler = Scheduler::with_config(no_prompt(), sink.clone());
        scheduler.on_complete(move |_| flag.set(true));

        let actions = vec![
            Action::Input(Input::new("a")),
            Action::TypingSpeed(TypingSpeed { multiplier: f64::NAN }),
            Action::Input(Input::new("b")),
        ];
        let err = scheduler.play(actions).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlaybackError>(),
            Some(PlaybackError::MalformedAction { index: 1, .. })
        ));
        assert_eq!(sink.text(), "a\r\n");
        assert!(!fired.get());
        assert_eq!(scheduler.phase(), Phase::Idle);
    }
}
