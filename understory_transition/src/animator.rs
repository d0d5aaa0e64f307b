// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-task animation stage machine.
//!
//! Every selected task walks `Initial → Animating → Animated`:
//!
//! - `Initial`: the element renders once in its pre-animation style.
//! - `Animating`: entered on the following frame, which applies the
//!   animation-triggering class and arms the timeout.
//! - `Animated`: reached after the expected number of matching completion
//!   signals, or when the timeout expires.
//!
//! Render tasks and tasks waiting for zero signals skip `Animating` and settle
//! on their first frame.

use crate::signal::Signal;
use crate::task::{SelectedTask, Stage};

/// What a frame did to a task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FrameStep {
    Unchanged,
    Started,
    Settled,
    TimedOut,
}

/// Result of delivering a completion signal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SignalOutcome {
    /// The signal matched and was counted; more are expected.
    Counted,
    /// The signal matched and completed the task.
    Completed,
    /// The signal did not match the task's filter, or the task does not wait
    /// for signals.
    Ignored,
    /// The task is no longer active.
    Stale,
}

impl<C> SelectedTask<C> {
    pub(crate) fn on_frame(&mut self, now: u64, timeout: u64) -> FrameStep {
        match self.stage {
            Stage::Initial => {
                if self.op.awaiting().is_some_and(|a| a.events > 0) {
                    self.stage = Stage::Animating;
                    self.deadline = Some(now.saturating_add(timeout));
                    FrameStep::Started
                } else {
                    self.settle();
                    FrameStep::Settled
                }
            }
            Stage::Animating => match self.deadline {
                Some(deadline) if now >= deadline => {
                    self.settle();
                    FrameStep::TimedOut
                }
                _ => FrameStep::Unchanged,
            },
            Stage::Animated => FrameStep::Unchanged,
        }
    }

    pub(crate) fn on_signal(&mut self, signal: &Signal<'_>) -> SignalOutcome {
        if self.stage == Stage::Animated {
            return SignalOutcome::Ignored;
        }
        let Some(awaiting) = self.op.awaiting() else {
            return SignalOutcome::Ignored;
        };
        if !awaiting.target.matches(&signal.source) {
            return SignalOutcome::Ignored;
        }
        self.received += 1;
        if self.received >= awaiting.events {
            self.settle();
            SignalOutcome::Completed
        } else {
            SignalOutcome::Counted
        }
    }

    fn settle(&mut self) {
        self.stage = Stage::Animated;
        self.deadline = None;
        self.observers.fire();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{SignalSource, TargetFilter};
    use crate::task::{Await, ElementKey, Observers, Settle, TaskId, TaskOp, TransactionId};

    fn selected(op: TaskOp) -> SelectedTask<u32> {
        SelectedTask {
            transaction: TransactionId(1),
            id: TaskId(1),
            op,
            child: Some(1),
            observers: Observers::default(),
            key: ElementKey::from_task(TaskId(1)),
            completed: false,
            stage: Stage::Initial,
            received: 0,
            deadline: None,
        }
    }

    fn mount(events: u32, target: TargetFilter) -> TaskOp {
        TaskOp::Mount(Await { events, target })
    }

    #[test]
    fn render_task_settles_on_first_frame() {
        let mut task = selected(TaskOp::Render(Settle::Static));
        assert_eq!(task.on_frame(0, 100), FrameStep::Settled);
        assert_eq!(task.stage, Stage::Animated);
        assert_eq!(task.on_frame(1, 100), FrameStep::Unchanged);
    }

    #[test]
    fn zero_event_mount_skips_animating() {
        let mut task = selected(mount(0, TargetFilter::Any));
        assert_eq!(task.on_frame(0, 100), FrameStep::Settled);
        assert!(task.deadline.is_none());
    }

    #[test]
    fn awaiting_mount_arms_deadline() {
        let mut task = selected(mount(1, TargetFilter::Any));
        assert_eq!(task.on_frame(10, 100), FrameStep::Started);
        assert_eq!(task.stage, Stage::Animating);
        assert_eq!(task.deadline, Some(110));
        assert_eq!(task.on_frame(109, 100), FrameStep::Unchanged);
        assert_eq!(task.on_frame(110, 100), FrameStep::TimedOut);
        assert_eq!(task.stage, Stage::Animated);
    }

    #[test]
    fn signals_count_up_to_expected() {
        let mut task = selected(mount(2, TargetFilter::Any));
        task.on_frame(0, 100);
        let signal = Signal::animation_end(SignalSource::root());
        assert_eq!(task.on_signal(&signal), SignalOutcome::Counted);
        assert_eq!(task.on_signal(&signal), SignalOutcome::Completed);
        assert_eq!(task.on_signal(&signal), SignalOutcome::Ignored);
    }

    #[test]
    fn filtered_signals_are_ignored() {
        let mut task = selected(mount(1, TargetFilter::Root));
        task.on_frame(0, 100);
        let from_child = Signal::transition_end(SignalSource::descendant(None, &[]));
        assert_eq!(task.on_signal(&from_child), SignalOutcome::Ignored);
        assert_eq!(task.received, 0);
    }

    #[test]
    fn render_task_ignores_signals() {
        let mut task = selected(TaskOp::Render(Settle::Entered));
        let signal = Signal::animation_end(SignalSource::root());
        assert_eq!(task.on_signal(&signal), SignalOutcome::Ignored);
    }
}
