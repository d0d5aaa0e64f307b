// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-facing driver tying the reducer, the per-task animators, and the
//! host's render loop together.
//!
//! ## Host loop
//!
//! 1) On every render of the owning component, call [`Transition::update`]
//!    with the desired child, then render [`Transition::render`].
//! 2) Once per animation frame (after the previous render was painted), call
//!    [`Transition::frame`]. Re-render when it returns `true`.
//! 3) Forward completion signals of each rendered element to
//!    [`Transition::signal`], and re-render on [`SignalOutcome::Completed`].

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::animator::{FrameStep, SignalOutcome};
use crate::child::{Decorate, Presentation, TransitionChild};
use crate::config::TransitionConfig;
use crate::signal::Signal;
use crate::state::{Diff, TransitionState, TransitionWarning};
use crate::task::{ElementKey, Lifecycle, Observers, SelectedTask, Stage, TaskId};

/// One element of the active task group, decorated for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered<C> {
    /// Reconciliation key.
    pub key: ElementKey,
    /// The task rendering this element; completion signals are addressed to it.
    pub task: TaskId,
    /// Lifecycle context for descendants.
    pub lifecycle: Lifecycle,
    /// The decorated child, or `None` for an empty placeholder.
    pub child: Option<C>,
}

/// A transition scheduler instance.
///
/// ```
/// use understory_transition::{
///     Diff, Signal, SignalOutcome, SignalSource, Transition, TransitionChild,
///     TransitionConfig,
/// };
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Panel(&'static str);
///
/// impl TransitionChild for Panel {
///     type Kind = ();
///     fn kind(&self) {}
///     fn key(&self) -> Option<&str> {
///         Some(self.0)
///     }
/// }
///
/// let mut transition = Transition::new(TransitionConfig::default().with_initial(true));
/// assert_eq!(transition.update(Some(Panel("a"))), Diff::Mount);
///
/// // The mount task renders once in its initial stage, then starts animating.
/// let task = transition.tasks()[0].id;
/// assert!(transition.frame(0));
/// let end = Signal::animation_end(SignalSource::root());
/// assert_eq!(transition.signal(task, &end), SignalOutcome::Completed);
///
/// // Advance until the entered render group settles.
/// while transition.frame(16) {}
/// assert!(transition.is_idle());
/// ```
#[derive(Debug)]
pub struct Transition<C> {
    state: TransitionState<C>,
    config: TransitionConfig,
    observers: Observers,
}

impl<C> Transition<C> {
    /// Creates a scheduler with nothing rendered.
    #[must_use]
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            state: TransitionState::new(),
            config,
            observers: Observers::default(),
        }
    }

    /// Sets the observers attached to tasks created from now on.
    #[must_use]
    pub fn with_observers(mut self, observers: Observers) -> Self {
        self.observers = observers;
        self
    }

    /// Replaces the observers attached to tasks created from now on.
    ///
    /// Pending callbacks of existing tasks are refreshed on the next in-place
    /// update.
    pub fn set_observers(&mut self, observers: Observers) {
        self.observers = observers;
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Replaces the configuration. Tasks already queued keep their settings.
    pub fn set_config(&mut self, config: TransitionConfig) {
        self.config = config;
    }

    /// Returns the underlying state.
    #[must_use]
    pub fn state(&self) -> &TransitionState<C> {
        &self.state
    }

    /// The active task group.
    #[must_use]
    pub fn tasks(&self) -> &[SelectedTask<C>] {
        self.state.tasks()
    }

    /// Returns `true` when nothing is animating or queued.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// The most recent inconsistency, if any.
    #[must_use]
    pub fn last_warning(&self) -> Option<&TransitionWarning> {
        self.state.last_warning()
    }

    /// The lifecycle context of an active task.
    #[must_use]
    pub fn lifecycle(&self, task: TaskId) -> Option<Lifecycle> {
        self.state.task(task).map(SelectedTask::lifecycle)
    }

    /// Advances the active group by one frame.
    ///
    /// Call once per animation frame, after the previous render was painted.
    /// Settles render and zero-signal tasks (firing their observers),
    /// starts awaiting tasks that rendered their initial stage, expires
    /// timeouts, and promotes the next group when the active one is complete.
    ///
    /// Returns `true` when the host should re-render.
    pub fn frame(&mut self, now: u64) -> bool {
        let timeout = self.config.timeout();
        let mut changed = false;
        let mut settled: SmallVec<[(TaskId, bool); 2]> = SmallVec::new();
        for task in self.state.tasks_mut() {
            match task.on_frame(now, timeout) {
                FrameStep::Unchanged => {}
                FrameStep::Started => changed = true,
                FrameStep::Settled => settled.push((task.id, false)),
                FrameStep::TimedOut => settled.push((task.id, true)),
            }
        }
        for (task, timed_out) in settled {
            changed = true;
            self.state.complete(task);
            if !timed_out {
                continue;
            }
            if self.config.timeout_ms.is_some() {
                tracing::debug!(task = task.get(), timeout_ms = timeout, "task timed out");
            } else {
                self.state.warn(TransitionWarning::TimedOut {
                    task,
                    timeout_ms: timeout,
                });
            }
        }
        self.state.consume_queue() || changed
    }

    /// Delivers a completion signal to an active task.
    ///
    /// Signals for tasks that are no longer active are dropped silently and
    /// reported as [`SignalOutcome::Stale`].
    pub fn signal(&mut self, task: TaskId, signal: &Signal<'_>) -> SignalOutcome {
        let Some(selected) = self.state.task_mut(task) else {
            return SignalOutcome::Stale;
        };
        let outcome = selected.on_signal(signal);
        if outcome == SignalOutcome::Completed {
            self.state.complete(task);
        }
        outcome
    }
}

impl<C: TransitionChild> Transition<C> {
    /// Processes the desired child for this render.
    ///
    /// When the active group has fully settled, the first newly queued group
    /// is promoted right away so it renders without an empty frame.
    pub fn update(&mut self, children: Option<C>) -> Diff {
        let diff = self
            .state
            .children_changed(children, &self.config, &self.observers);
        if self.state.tasks().iter().all(|t| t.stage == Stage::Animated) {
            self.state.consume_queue();
        }
        diff
    }
}

impl<C: Decorate> Transition<C> {
    /// Decorates the children of the active group for rendering.
    #[must_use]
    pub fn render(&self) -> Vec<Rendered<C>> {
        self.state
            .tasks()
            .iter()
            .map(|task| {
                let lifecycle = task.lifecycle();
                let presentation = Presentation {
                    key: task.key,
                    lifecycle,
                    stage: task.stage,
                    class: self.config.classes.class_for(task.op.action(), task.stage),
                };
                Rendered {
                    key: task.key,
                    task: task.id,
                    lifecycle,
                    child: task.child.as_ref().map(|c| c.decorate(&presentation)),
                }
            })
            .collect()
    }
}
