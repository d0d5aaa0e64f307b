// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction of the task groups for one child change.
//!
//! A [`TaskBuilder`] is created from the state's counters at the start of a
//! reducer call, threaded through the mount/unmount/exchange constructors,
//! and consumed by [`TaskBuilder::finish`], which hands the advanced counters
//! back to the state. Counters never live outside a single reducer call.

use alloc::vec::Vec;

use smallvec::smallvec;

use crate::config::{ExchangeMode, TransitionConfig};
use crate::task::{
    Await, KeyRule, Observers, QueuedTask, Settle, TaskGroup, TaskId, TaskOp, TransactionId,
};

/// Task groups and advanced counters produced by one reducer call.
#[derive(Debug)]
pub(crate) struct Batch<C> {
    pub(crate) transaction: TransactionId,
    pub(crate) transaction_counter: u64,
    pub(crate) task_counter: u64,
    pub(crate) groups: Vec<TaskGroup<QueuedTask<C>>>,
}

#[derive(Debug)]
pub(crate) struct TaskBuilder<'a, C> {
    transaction: TransactionId,
    transaction_counter: u64,
    task_counter: u64,
    config: &'a TransitionConfig,
    observers: &'a Observers,
    groups: Vec<TaskGroup<QueuedTask<C>>>,
}

impl<'a, C> TaskBuilder<'a, C> {
    /// Opens a new transaction on top of the given counters.
    pub(crate) fn new(
        transaction_counter: u64,
        task_counter: u64,
        config: &'a TransitionConfig,
        observers: &'a Observers,
    ) -> Self {
        let transaction_counter = transaction_counter + 1;
        Self {
            transaction: TransactionId(transaction_counter),
            transaction_counter,
            task_counter,
            config,
            observers,
            groups: Vec::new(),
        }
    }

    fn task(&mut self, op: TaskOp, child: Option<C>, key: KeyRule) -> QueuedTask<C> {
        self.task_counter += 1;
        let observers = match &op {
            TaskOp::Render(settle) => self.observers.for_settle(*settle),
            _ => Observers::default(),
        };
        QueuedTask {
            transaction: self.transaction,
            id: TaskId(self.task_counter),
            op,
            child,
            observers,
            key,
        }
    }

    fn enter(&self) -> Await {
        Await {
            events: self.config.enter,
            target: self.config.target.clone(),
        }
    }

    fn exit(&self) -> Await {
        Await {
            events: self.config.exit,
            target: self.config.target.clone(),
        }
    }

    /// Mount tasks for a new child.
    ///
    /// Without animation this is a single render group; otherwise a mount
    /// group followed by an entered render group.
    pub(crate) fn mount(&mut self, child: C, animate: bool)
    where
        C: Clone,
    {
        if !animate {
            let render = self.task(
                TaskOp::Render(Settle::Static),
                Some(child),
                KeyRule::Fresh,
            );
            self.groups.push(smallvec![render]);
            return;
        }
        let mount = self.task(
            TaskOp::Mount(self.enter()),
            Some(child.clone()),
            KeyRule::Fresh,
        );
        let entered = self.task(
            TaskOp::Render(Settle::Entered),
            Some(child),
            KeyRule::Carry(0),
        );
        self.groups.push(smallvec![mount]);
        self.groups.push(smallvec![entered]);
    }

    /// Unmount tasks for the child at `position` of the tail group.
    pub(crate) fn unmount(&mut self, child: C, position: usize) {
        let unmount = self.task(
            TaskOp::Unmount(self.exit()),
            Some(child),
            KeyRule::Carry(position),
        );
        let exited = self.task(TaskOp::Render(Settle::Exited), None, KeyRule::Fresh);
        self.groups.push(smallvec![unmount]);
        self.groups.push(smallvec![exited]);
    }

    /// Exchange tasks replacing `old` (at `position` of the tail group) with `new`.
    pub(crate) fn exchange(&mut self, mode: ExchangeMode, old: C, position: usize, new: C)
    where
        C: Clone,
    {
        match mode {
            ExchangeMode::Cross => {
                let unmount = self.task(
                    TaskOp::Unmount(self.exit()),
                    Some(old),
                    KeyRule::Carry(position),
                );
                let mount = self.task(
                    TaskOp::Mount(self.enter()),
                    Some(new.clone()),
                    KeyRule::Fresh,
                );
                let entered = self.task(
                    TaskOp::Render(Settle::Entered),
                    Some(new),
                    KeyRule::Carry(1),
                );
                let exited = self.task(TaskOp::Render(Settle::Exited), None, KeyRule::Fresh);
                self.groups.push(smallvec![unmount, mount]);
                self.groups.push(smallvec![entered, exited]);
            }
            ExchangeMode::OutIn => {
                self.unmount(old, position);
                self.mount(new, true);
            }
            ExchangeMode::InOut => {
                let keep = self.task(
                    TaskOp::Render(Settle::Static),
                    Some(old.clone()),
                    KeyRule::Carry(position),
                );
                let mount = self.task(
                    TaskOp::Mount(self.enter()),
                    Some(new.clone()),
                    KeyRule::Fresh,
                );
                let unmount = self.task(
                    TaskOp::Unmount(self.exit()),
                    Some(old),
                    KeyRule::Carry(0),
                );
                let entered = self.task(
                    TaskOp::Render(Settle::Entered),
                    Some(new.clone()),
                    KeyRule::Carry(1),
                );
                let settled = self.task(
                    TaskOp::Render(Settle::Static),
                    Some(new),
                    KeyRule::Carry(1),
                );
                let exited = self.task(TaskOp::Render(Settle::Exited), None, KeyRule::Fresh);
                self.groups.push(smallvec![keep, mount]);
                self.groups.push(smallvec![unmount, entered]);
                self.groups.push(smallvec![settled, exited]);
            }
        }
    }

    /// Closes the transaction: `on_end` rides on the first task of its last group.
    pub(crate) fn finish(mut self) -> Batch<C> {
        if let Some(task) = self.groups.last_mut().and_then(|g| g.first_mut()) {
            task.observers.on_end.clone_from(&self.observers.on_end);
        }
        Batch {
            transaction: self.transaction,
            transaction_counter: self.transaction_counter,
            task_counter: self.task_counter,
            groups: self.groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Action;
    use alloc::vec;

    fn actions(batch: &Batch<u32>) -> Vec<Vec<(Action, Option<u32>)>> {
        batch
            .groups
            .iter()
            .map(|g| g.iter().map(|t| (t.op.action(), t.child)).collect())
            .collect()
    }

    #[test]
    fn unanimated_mount_is_single_render() {
        let config = TransitionConfig::default();
        let observers = Observers::default();
        let mut builder = TaskBuilder::new(0, 0, &config, &observers);
        builder.mount(1_u32, false);
        let batch = builder.finish();
        assert_eq!(actions(&batch), [[(Action::Render, Some(1))]]);
        assert_eq!(batch.transaction, TransactionId(1));
        assert_eq!(batch.task_counter, 1);
    }

    #[test]
    fn cross_groups_unmount_and_mount_together() {
        let config = TransitionConfig::default();
        let observers = Observers::default();
        let mut builder = TaskBuilder::new(4, 10, &config, &observers);
        builder.exchange(ExchangeMode::Cross, 1_u32, 0, 2);
        let batch = builder.finish();
        assert_eq!(
            actions(&batch),
            [
                vec![(Action::Unmount, Some(1)), (Action::Mount, Some(2))],
                vec![(Action::Render, Some(2)), (Action::Render, None)],
            ]
        );
        assert!(batch.groups.iter().flatten().all(|t| t.transaction == TransactionId(5)));
        assert_eq!(batch.task_counter, 14);
    }

    #[test]
    fn out_in_unmounts_before_mounting() {
        let config = TransitionConfig::default();
        let observers = Observers::default();
        let mut builder = TaskBuilder::new(0, 0, &config, &observers);
        builder.exchange(ExchangeMode::OutIn, 1_u32, 0, 2);
        let batch = builder.finish();
        assert_eq!(
            actions(&batch),
            [
                [(Action::Unmount, Some(1))],
                [(Action::Render, None)],
                [(Action::Mount, Some(2))],
                [(Action::Render, Some(2))],
            ]
        );
    }

    #[test]
    fn in_out_mounts_before_unmounting() {
        let config = TransitionConfig::default();
        let observers = Observers::default();
        let mut builder = TaskBuilder::new(0, 0, &config, &observers);
        builder.exchange(ExchangeMode::InOut, 1_u32, 0, 2);
        let batch = builder.finish();
        assert_eq!(
            actions(&batch),
            [
                [(Action::Render, Some(1)), (Action::Mount, Some(2))],
                [(Action::Unmount, Some(1)), (Action::Render, Some(2))],
                [(Action::Render, Some(2)), (Action::Render, None)],
            ]
        );
    }

    #[test]
    fn on_end_rides_on_last_group() {
        let config = TransitionConfig::default();
        let observers = Observers::default().with_on_end(|| {});
        let mut builder = TaskBuilder::new(0, 0, &config, &observers);
        builder.mount(1_u32, true);
        let batch = builder.finish();
        assert!(batch.groups[0][0].observers.on_end.is_none());
        assert!(batch.groups[1][0].observers.on_end.is_some());
    }

    #[test]
    fn await_counts_come_from_config() {
        let config = TransitionConfig::default().with_enter(3).with_exit(0);
        let observers = Observers::default();
        let mut builder = TaskBuilder::new(0, 0, &config, &observers);
        builder.exchange(ExchangeMode::Cross, 1_u32, 0, 2);
        let batch = builder.finish();
        let first = &batch.groups[0];
        assert_eq!(first[0].op.awaiting().map(|a| a.events), Some(0));
        assert_eq!(first[1].op.awaiting().map(|a| a.events), Some(3));
    }
}
