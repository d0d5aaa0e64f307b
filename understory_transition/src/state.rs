// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition state and its reducer.
//!
//! [`TransitionState`] owns the queue of task groups and the active group. It
//! is only mutated through three operations:
//!
//! - [`TransitionState::children_changed`] classifies a new desired child
//!   against the previous one and enqueues task groups.
//! - [`TransitionState::complete`] marks an active task as completed.
//! - [`TransitionState::consume_queue`] promotes the next group once the
//!   active one is fully completed.
//!
//! None of them panics or returns an error. Inconsistencies are reported as
//! [`TransitionWarning`]s, logged, and degrade gracefully.

use alloc::collections::VecDeque;
use core::fmt;

use smallvec::SmallVec;

use crate::builder::TaskBuilder;
use crate::child::TransitionChild;
use crate::config::{ExchangeMode, TransitionConfig};
use crate::task::{
    ElementKey, KeyRule, Observers, QueuedTask, SelectedTask, Stage, TaskGroup, TaskId, TaskOp,
    TransactionId,
};

/// How a child change was classified.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Diff {
    /// Absent before and after; nothing happened.
    Unchanged,
    /// A child appeared; mount tasks were enqueued.
    Mount,
    /// The child disappeared; unmount tasks were enqueued.
    Unmount,
    /// The child was replaced; exchange tasks were enqueued for this mode.
    Exchange(ExchangeMode),
    /// Same identity; alive tasks were updated in place.
    Updated {
        /// `true` if an active task was mutated and the host should re-render.
        rerender: bool,
    },
    /// Same identity, but no alive task represents it. Only the stored child
    /// was updated.
    Detached,
}

/// Inconsistency detected by the scheduler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionWarning {
    /// An in-place update found no alive task representing the child.
    NoAliveTask {
        /// Transaction that was expected to hold the child.
        transaction: Option<TransactionId>,
    },
    /// The previous child could not be located in the tail group while
    /// building unmount or exchange tasks.
    MissingTailTask {
        /// Transaction being built.
        transaction: TransactionId,
    },
    /// A carried key pointed outside the previous group; an id-derived key
    /// was used instead.
    MissingCarriedKey {
        /// The task whose key could not be carried.
        task: TaskId,
        /// The position it tried to carry.
        index: usize,
    },
    /// An awaiting task never received its completion signals and was
    /// force-completed after the default timeout.
    TimedOut {
        /// The task that timed out.
        task: TaskId,
        /// The timeout that expired.
        timeout_ms: u64,
    },
}

impl fmt::Display for TransitionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAliveTask { transaction } => write!(
                f,
                "no alive task represents the updated child (transaction {:?})",
                transaction.map(TransactionId::get)
            ),
            Self::MissingTailTask { transaction } => write!(
                f,
                "previous child not found in the tail group while building transaction {}",
                transaction.get()
            ),
            Self::MissingCarriedKey { task, index } => write!(
                f,
                "task {} carries key at position {index}, which the previous group does not have",
                task.get()
            ),
            Self::TimedOut { task, timeout_ms } => write!(
                f,
                "task {} received no completion signal within {timeout_ms} ms; \
                 set an explicit timeout matching the animation duration",
                task.get()
            ),
        }
    }
}

impl core::error::Error for TransitionWarning {}

/// Per-instance transition state.
#[derive(Clone, Debug)]
pub struct TransitionState<C> {
    transaction_counter: u64,
    task_counter: u64,
    children: Option<C>,
    rendered: bool,
    current: Option<TransactionId>,
    queue: VecDeque<TaskGroup<QueuedTask<C>>>,
    tasks: TaskGroup<SelectedTask<C>>,
    last_warning: Option<TransitionWarning>,
}

impl<C> Default for TransitionState<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TransitionState<C> {
    /// Creates an empty state: nothing rendered yet, no tasks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transaction_counter: 0,
            task_counter: 0,
            children: None,
            rendered: false,
            current: None,
            queue: VecDeque::new(),
            tasks: SmallVec::new(),
            last_warning: None,
        }
    }

    /// The last seen desired child.
    #[must_use]
    pub fn children(&self) -> Option<&C> {
        self.children.as_ref()
    }

    /// Whether a child change has been processed at least once.
    #[must_use]
    pub fn has_rendered(&self) -> bool {
        self.rendered
    }

    /// The active task group.
    #[must_use]
    pub fn tasks(&self) -> &[SelectedTask<C>] {
        &self.tasks
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut [SelectedTask<C>] {
        &mut self.tasks
    }

    /// Task groups waiting behind the active one, in execution order.
    #[must_use]
    pub fn queue(&self) -> &VecDeque<TaskGroup<QueuedTask<C>>> {
        &self.queue
    }

    /// Number of task groups waiting behind the active one.
    #[must_use]
    pub fn queued_groups(&self) -> usize {
        self.queue.len()
    }

    /// The most recently opened transaction.
    #[must_use]
    pub fn current_transaction(&self) -> Option<TransactionId> {
        self.current
    }

    /// Number of task ids handed out so far.
    #[must_use]
    pub fn task_counter(&self) -> u64 {
        self.task_counter
    }

    /// The most recent inconsistency, if any.
    #[must_use]
    pub fn last_warning(&self) -> Option<&TransitionWarning> {
        self.last_warning.as_ref()
    }

    /// Returns `true` when every task of the active group is completed.
    #[must_use]
    pub fn active_complete(&self) -> bool {
        self.tasks.iter().all(|t| t.completed)
    }

    /// Returns `true` when the active group is completed and nothing is queued.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.active_complete()
    }

    /// Looks up an active task.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&SelectedTask<C>> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub(crate) fn task_mut(&mut self, id: TaskId) -> Option<&mut SelectedTask<C>> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn warn(&mut self, warning: TransitionWarning) {
        tracing::warn!(%warning, "transition bookkeeping inconsistency");
        self.last_warning = Some(warning);
    }

    /// Marks an active task as completed.
    ///
    /// Returns `false` for tasks that are not part of the active group, e.g.
    /// stale notifications from a group that already advanced. Those are
    /// dropped silently.
    pub fn complete(&mut self, id: TaskId) -> bool {
        match self.task_mut(id) {
            Some(task) if !task.completed => {
                task.completed = true;
                tracing::trace!(task = id.get(), "task completed");
                true
            }
            _ => false,
        }
    }

    /// Promotes the next queued group to active.
    ///
    /// Does nothing and returns `false` if the active group still has
    /// incomplete tasks or the queue is empty. Otherwise exactly one group is
    /// popped: keys are resolved against the keys of the group it replaces,
    /// render tasks start completed, and mount/unmount tasks start pending.
    pub fn consume_queue(&mut self) -> bool {
        if !self.active_complete() {
            return false;
        }
        let Some(group) = self.queue.pop_front() else {
            return false;
        };
        let previous: SmallVec<[ElementKey; 2]> = self.tasks.iter().map(|t| t.key).collect();
        let mut selected = TaskGroup::with_capacity(group.len());
        for task in group {
            let key = match task.key.resolve(&previous, task.id) {
                Some(key) => key,
                None => {
                    if let KeyRule::Carry(index) = task.key {
                        self.warn(TransitionWarning::MissingCarriedKey {
                            task: task.id,
                            index,
                        });
                    }
                    ElementKey::from_task(task.id)
                }
            };
            let completed = matches!(task.op, TaskOp::Render(_));
            selected.push(SelectedTask {
                transaction: task.transaction,
                id: task.id,
                op: task.op,
                child: task.child,
                observers: task.observers,
                key,
                completed,
                stage: Stage::Initial,
                received: 0,
                deadline: None,
            });
        }
        tracing::trace!(
            tasks = selected.len(),
            remaining = self.queue.len(),
            "task group selected"
        );
        self.tasks = selected;
        true
    }
}

impl<C: TransitionChild> TransitionState<C> {
    /// Processes a new desired child.
    ///
    /// Compares `children` with the previous child by identity and enqueues
    /// the matching task groups. Never panics; inconsistencies are logged and
    /// recorded in [`last_warning`](Self::last_warning).
    pub fn children_changed(
        &mut self,
        children: Option<C>,
        config: &TransitionConfig,
        observers: &Observers,
    ) -> Diff {
        let first = !self.rendered;
        self.rendered = true;
        let previous = core::mem::replace(&mut self.children, children.clone());
        match (previous, children) {
            (None, None) => Diff::Unchanged,
            (Some(old), Some(new)) if old.same_identity(&new) => {
                self.update_in_place(&new, observers)
            }
            (None, Some(new)) => {
                let animate = config.initial || !first;
                self.enqueue(config, observers, |builder| builder.mount(new, animate));
                Diff::Mount
            }
            (Some(old), None) => {
                let position = self.tail_position(&old);
                self.enqueue(config, observers, |builder| builder.unmount(old, position));
                Diff::Unmount
            }
            (Some(old), Some(new)) => {
                let mode = config.mode;
                let position = self.tail_position(&old);
                self.enqueue(config, observers, |builder| {
                    builder.exchange(mode, old, position, new);
                });
                Diff::Exchange(mode)
            }
        }
    }

    /// Pushes an update for an unchanged identity into every alive task of
    /// the current transaction that renders it.
    fn update_in_place(&mut self, new: &C, observers: &Observers) -> Diff {
        let current = self.current;
        let represents = |transaction: TransactionId, op: &TaskOp, child: Option<&C>| {
            Some(transaction) == current
                && !matches!(op, TaskOp::Unmount(_))
                && child.is_some_and(|c| c.same_identity(new))
        };

        let mut rerender = false;
        for task in self.tasks.iter_mut() {
            if represents(task.transaction, &task.op, task.child.as_ref()) {
                task.child = Some(new.clone());
                task.observers.refresh(observers);
                rerender = true;
            }
        }
        let mut queued = false;
        for task in self.queue.iter_mut().flatten() {
            if represents(task.transaction, &task.op, task.child.as_ref()) {
                task.child = Some(new.clone());
                task.observers.refresh(observers);
                queued = true;
            }
        }

        if rerender || queued {
            Diff::Updated { rerender }
        } else {
            self.warn(TransitionWarning::NoAliveTask {
                transaction: current,
            });
            Diff::Detached
        }
    }

    /// Position of `old` in the group that will precede the next enqueued one.
    fn tail_position(&mut self, old: &C) -> usize {
        let alive = |op: &TaskOp, child: Option<&C>| {
            !matches!(op, TaskOp::Unmount(_)) && child.is_some_and(|c| c.same_identity(old))
        };
        let found = match self.queue.back() {
            Some(group) => group.iter().position(|t| alive(&t.op, t.child.as_ref())),
            None => self.tasks.iter().position(|t| alive(&t.op, t.child.as_ref())),
        };
        found.unwrap_or_else(|| {
            self.warn(TransitionWarning::MissingTailTask {
                transaction: TransactionId(self.transaction_counter + 1),
            });
            0
        })
    }

    /// Runs `build` against a builder opening a new transaction and appends
    /// the resulting groups to the queue.
    fn enqueue(
        &mut self,
        config: &TransitionConfig,
        observers: &Observers,
        build: impl FnOnce(&mut TaskBuilder<'_, C>),
    ) {
        let mut builder =
            TaskBuilder::new(self.transaction_counter, self.task_counter, config, observers);
        build(&mut builder);
        let batch = builder.finish();
        self.transaction_counter = batch.transaction_counter;
        self.task_counter = batch.task_counter;
        self.current = Some(batch.transaction);
        tracing::trace!(
            transaction = batch.transaction.get(),
            groups = batch.groups.len(),
            "transaction enqueued"
        );
        self.queue.extend(batch.groups);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Action;

    #[derive(Clone, Debug, PartialEq)]
    struct El {
        key: &'static str,
        value: u32,
    }

    impl TransitionChild for El {
        type Kind = ();
        fn kind(&self) {}
        fn key(&self) -> Option<&str> {
            Some(self.key)
        }
    }

    fn el(key: &'static str) -> Option<El> {
        Some(El { key, value: 0 })
    }

    fn complete_active(state: &mut TransitionState<El>) {
        let ids: SmallVec<[TaskId; 2]> = state.tasks().iter().map(|t| t.id).collect();
        for id in ids {
            state.complete(id);
        }
    }

    fn group_actions(group: &[QueuedTask<El>]) -> SmallVec<[Action; 2]> {
        group.iter().map(|t| t.op.action()).collect()
    }

    #[test]
    fn absent_to_absent_is_unchanged() {
        let mut state = TransitionState::<El>::new();
        let diff = state.children_changed(None, &TransitionConfig::default(), &Observers::default());
        assert_eq!(diff, Diff::Unchanged);
        assert_eq!(state.queued_groups(), 0);
        assert!(state.has_rendered());
    }

    #[test]
    fn first_mount_without_initial_is_plain_render() {
        let mut state = TransitionState::new();
        let diff = state.children_changed(el("a"), &TransitionConfig::default(), &Observers::default());
        assert_eq!(diff, Diff::Mount);
        assert_eq!(state.queued_groups(), 1);
        assert_eq!(group_actions(&state.queue()[0]).as_slice(), &[Action::Render]);
    }

    #[test]
    fn later_mount_animates_even_without_initial() {
        let config = TransitionConfig::default();
        let mut state = TransitionState::new();
        state.children_changed(None, &config, &Observers::default());
        state.children_changed(el("a"), &config, &Observers::default());
        assert_eq!(state.queued_groups(), 2);
        assert_eq!(group_actions(&state.queue()[0]).as_slice(), &[Action::Mount]);
        assert_eq!(group_actions(&state.queue()[1]).as_slice(), &[Action::Render]);
    }

    #[test]
    fn consume_is_noop_while_active_incomplete() {
        let config = TransitionConfig::default().with_initial(true);
        let mut state = TransitionState::new();
        state.children_changed(el("a"), &config, &Observers::default());
        assert!(state.consume_queue());
        assert_eq!(state.tasks()[0].op.action(), Action::Mount);
        assert!(!state.tasks()[0].completed);

        let queued = state.queued_groups();
        let active = state.tasks()[0].id;
        assert!(!state.consume_queue());
        assert!(!state.consume_queue());
        assert_eq!(state.queued_groups(), queued);
        assert_eq!(state.tasks()[0].id, active);
    }

    #[test]
    fn consume_advances_exactly_one_group() {
        let config = TransitionConfig::default().with_mode(ExchangeMode::OutIn);
        let mut state = TransitionState::new();
        state.children_changed(el("a"), &config, &Observers::default());
        state.consume_queue();
        state.children_changed(el("b"), &config, &Observers::default());
        assert_eq!(state.queued_groups(), 4);

        let mut seen = 0;
        while state.consume_queue() {
            seen += 1;
            assert_eq!(state.queued_groups(), 4 - seen);
            complete_active(&mut state);
        }
        assert_eq!(seen, 4);
        assert!(state.is_idle());
    }

    #[test]
    fn render_tasks_start_completed() {
        let mut state = TransitionState::new();
        state.children_changed(el("a"), &TransitionConfig::default(), &Observers::default());
        state.consume_queue();
        assert!(state.tasks()[0].completed);
        assert_eq!(state.tasks()[0].stage, Stage::Initial);
    }

    #[test]
    fn cross_exchange_shares_transaction_and_carries_key() {
        let config = TransitionConfig::default();
        let mut state = TransitionState::new();
        state.children_changed(el("a"), &config, &Observers::default());
        state.consume_queue();
        let key_a = state.tasks()[0].key;

        let diff = state.children_changed(el("b"), &config, &Observers::default());
        assert_eq!(diff, Diff::Exchange(ExchangeMode::Cross));
        assert!(state.consume_queue());
        let tasks = state.tasks();
        assert_eq!(tasks[0].op.action(), Action::Unmount);
        assert_eq!(tasks[1].op.action(), Action::Mount);
        assert_eq!(tasks[0].transaction, tasks[1].transaction);
        assert_eq!(tasks[0].key, key_a);
        assert_ne!(tasks[1].key, key_a);
        let key_b = tasks[1].key;

        complete_active(&mut state);
        assert!(state.consume_queue());
        assert_eq!(state.tasks()[0].key, key_b);
        assert_eq!(state.tasks()[0].child.as_ref().map(|c| c.key), Some("b"));
        assert!(state.tasks()[1].child.is_none());
    }

    #[test]
    fn same_identity_updates_queued_task() {
        let config = TransitionConfig::default().with_initial(true);
        let mut state = TransitionState::new();
        state.children_changed(el("a"), &config, &Observers::default());
        let diff = state.children_changed(
            Some(El { key: "a", value: 7 }),
            &config,
            &Observers::default(),
        );
        assert_eq!(diff, Diff::Updated { rerender: false });
        assert_eq!(state.queued_groups(), 2);
        state.consume_queue();
        assert_eq!(state.tasks()[0].child.as_ref().map(|c| c.value), Some(7));
    }

    #[test]
    fn same_identity_updates_active_task_and_requests_render() {
        let config = TransitionConfig::default().with_initial(true);
        let mut state = TransitionState::new();
        state.children_changed(el("a"), &config, &Observers::default());
        state.consume_queue();
        let diff = state.children_changed(
            Some(El { key: "a", value: 3 }),
            &config,
            &Observers::default(),
        );
        assert_eq!(diff, Diff::Updated { rerender: true });
        assert_eq!(state.tasks()[0].child.as_ref().map(|c| c.value), Some(3));
        assert_eq!(
            state.queue()[0][0].child.as_ref().map(|c| c.value),
            Some(3)
        );
    }

    #[test]
    fn update_without_alive_task_degrades_with_warning() {
        let mut state = TransitionState::new();
        state.children = el("a");
        state.rendered = true;
        let diff = state.children_changed(
            Some(El { key: "a", value: 1 }),
            &TransitionConfig::default(),
            &Observers::default(),
        );
        assert_eq!(diff, Diff::Detached);
        assert_eq!(state.children().map(|c| c.value), Some(1));
        assert!(matches!(
            state.last_warning(),
            Some(TransitionWarning::NoAliveTask { .. })
        ));
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut state = TransitionState::<El>::new();
        assert!(!state.complete(TaskId(42)));
        state.children_changed(el("a"), &TransitionConfig::default(), &Observers::default());
        state.consume_queue();
        let id = state.tasks()[0].id;
        assert!(!state.complete(id));
        assert!(state.last_warning().is_none());
    }

    #[test]
    fn unmount_leaves_placeholder() {
        let config = TransitionConfig::default();
        let mut state = TransitionState::new();
        state.children_changed(el("a"), &config, &Observers::default());
        state.consume_queue();
        let key_a = state.tasks()[0].key;
        assert_eq!(
            state.children_changed(None, &config, &Observers::default()),
            Diff::Unmount
        );
        state.consume_queue();
        assert_eq!(state.tasks()[0].op.action(), Action::Unmount);
        assert_eq!(state.tasks()[0].key, key_a);
        complete_active(&mut state);
        state.consume_queue();
        assert!(state.tasks()[0].child.is_none());
        assert_eq!(state.tasks()[0].op, TaskOp::Render(crate::task::Settle::Exited));
    }
}
