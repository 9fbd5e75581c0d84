//! Deadline-ordered timer queue driving playback.
//!
//! Timers fire in deadline order; timers sharing a deadline fire in the order
//! they were registered.

use crate::sink::TerminalOp;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerKind {
    /// Apply a terminal operation.
    Emit(TerminalOp),
    /// Dispatch the action at this index.
    Advance(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    pub deadline: Instant,
    seq: u64,
    pub kind: TimerKind,
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap and the earliest timer must pop first.
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Timer>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, deadline: Instant, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Timer {
            deadline,
            seq,
            kind,
        });
    }

    pub fn pop(&mut self) -> Option<Timer> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
