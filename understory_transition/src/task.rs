// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Task model: identifiers, task variants, observers, and lifecycle.
//!
//! A task is one mount, unmount, or render operation on a single child. Tasks
//! sit in the queue as [`QueuedTask`]s, grouped into task groups that run in
//! parallel, and are promoted to [`SelectedTask`]s when their group becomes
//! the active one.

use alloc::rc::Rc;
use core::fmt;

use smallvec::SmallVec;

use crate::signal::TargetFilter;

/// A set of tasks that run in parallel.
pub type TaskGroup<T> = SmallVec<[T; 2]>;

/// Identifier of a task. Monotonic per scheduler instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub(crate) u64);

impl TaskId {
    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Identifier of a transaction: the tasks produced by one child change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(pub(crate) u64);

impl TransactionId {
    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Key of a rendered element, stable for as long as the element lives.
///
/// Hosts use it as the reconciliation key of the wrapper they render for a
/// task, so an element keeps its node while it moves from a mount task to
/// the render tasks that follow it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementKey(u64);

impl ElementKey {
    /// The key minted for an element first selected by `task`.
    #[must_use]
    pub const fn from_task(task: TaskId) -> Self {
        Self(task.0)
    }

    /// Returns the raw key.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// What a non-render task waits for before it completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Await {
    /// Number of matching completion signals to wait for.
    pub events: u32,
    /// Which signals count.
    pub target: TargetFilter,
}

/// Terminal state a render task stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Settle {
    /// The child finished entering; fires `on_entered`.
    Entered,
    /// The child finished exiting and is replaced by a placeholder; fires `on_exited`.
    Exited,
    /// Plain render with no lifecycle meaning.
    Static,
}

/// The operation a task performs.
///
/// Render tasks never wait for anything; mount and unmount tasks always carry
/// an [`Await`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskOp {
    /// Animate the child in.
    Mount(Await),
    /// Animate the child out.
    Unmount(Await),
    /// Render the child as-is.
    Render(Settle),
}

impl TaskOp {
    /// The action tag of this operation.
    #[must_use]
    pub fn action(&self) -> Action {
        match self {
            Self::Mount(_) => Action::Mount,
            Self::Unmount(_) => Action::Unmount,
            Self::Render(_) => Action::Render,
        }
    }

    /// What this operation waits for, if anything.
    #[must_use]
    pub fn awaiting(&self) -> Option<&Await> {
        match self {
            Self::Mount(a) | Self::Unmount(a) => Some(a),
            Self::Render(_) => None,
        }
    }
}

/// Action tag of a task.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// See [`TaskOp::Mount`].
    Mount,
    /// See [`TaskOp::Unmount`].
    Unmount,
    /// See [`TaskOp::Render`].
    Render,
}

/// How a queued task's element key is resolved when it gets selected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyRule {
    /// Reuse the key at this position of the previously selected group.
    Carry(usize),
    /// Mint a new key from the task id.
    Fresh,
}

impl KeyRule {
    /// Resolves the key against the previous group's keys.
    ///
    /// Returns `None` for a [`KeyRule::Carry`] that points past the end of
    /// `previous`; the caller decides on the fallback.
    #[must_use]
    pub fn resolve(self, previous: &[ElementKey], task: TaskId) -> Option<ElementKey> {
        match self {
            Self::Carry(index) => previous.get(index).copied(),
            Self::Fresh => Some(ElementKey::from_task(task)),
        }
    }
}

/// Callback invoked by [`Observers`].
pub type Callback = Rc<dyn Fn()>;

/// Lifecycle callbacks attached to a task.
///
/// Each callback fires at most once: firing takes it out of its slot.
#[derive(Clone, Default)]
pub struct Observers {
    /// Called when a child finished entering.
    pub on_entered: Option<Callback>,
    /// Called when a child finished exiting.
    pub on_exited: Option<Callback>,
    /// Called when a transaction finished.
    pub on_end: Option<Callback>,
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("on_entered", &self.on_entered.is_some())
            .field("on_exited", &self.on_exited.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}

impl Observers {
    /// Sets `on_entered`.
    #[must_use]
    pub fn with_on_entered(mut self, f: impl Fn() + 'static) -> Self {
        self.on_entered = Some(Rc::new(f));
        self
    }

    /// Sets `on_exited`.
    #[must_use]
    pub fn with_on_exited(mut self, f: impl Fn() + 'static) -> Self {
        self.on_exited = Some(Rc::new(f));
        self
    }

    /// Sets `on_end`.
    #[must_use]
    pub fn with_on_end(mut self, f: impl Fn() + 'static) -> Self {
        self.on_end = Some(Rc::new(f));
        self
    }

    /// Returns `true` when no callback is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.on_entered.is_none() && self.on_exited.is_none() && self.on_end.is_none()
    }

    /// The subset of `self` relevant to a task standing for `settle`.
    pub(crate) fn for_settle(&self, settle: Settle) -> Self {
        Self {
            on_entered: match settle {
                Settle::Entered => self.on_entered.clone(),
                _ => None,
            },
            on_exited: match settle {
                Settle::Exited => self.on_exited.clone(),
                _ => None,
            },
            on_end: None,
        }
    }

    /// Replaces the callbacks that are still pending with the ones in `from`.
    ///
    /// Slots that already fired stay empty.
    pub(crate) fn refresh(&mut self, from: &Self) {
        if self.on_entered.is_some() {
            self.on_entered.clone_from(&from.on_entered);
        }
        if self.on_exited.is_some() {
            self.on_exited.clone_from(&from.on_exited);
        }
        if self.on_end.is_some() {
            self.on_end.clone_from(&from.on_end);
        }
    }

    /// Fires and clears every pending callback, `on_end` last.
    pub(crate) fn fire(&mut self) {
        for slot in [&mut self.on_entered, &mut self.on_exited, &mut self.on_end] {
            if let Some(f) = slot.take() {
                f();
            }
        }
    }
}

/// A task waiting in the queue.
#[derive(Clone, Debug)]
pub struct QueuedTask<C> {
    /// Transaction this task belongs to.
    pub transaction: TransactionId,
    /// Task id.
    pub id: TaskId,
    /// Operation.
    pub op: TaskOp,
    /// The child this task renders; `None` renders an empty placeholder.
    pub child: Option<C>,
    /// Callbacks fired when the task settles.
    pub observers: Observers,
    /// Key resolution rule applied at selection.
    pub key: KeyRule,
}

/// Animation stage of a selected task.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Just selected; the element renders in its pre-animation style.
    #[default]
    Initial,
    /// The animation is running; waiting for completion signals.
    Animating,
    /// Terminal.
    Animated,
}

/// A task of the active group.
#[derive(Clone, Debug)]
pub struct SelectedTask<C> {
    /// Transaction this task belongs to.
    pub transaction: TransactionId,
    /// Task id.
    pub id: TaskId,
    /// Operation.
    pub op: TaskOp,
    /// The child this task renders; `None` renders an empty placeholder.
    pub child: Option<C>,
    /// Callbacks fired when the task settles.
    pub observers: Observers,
    /// Resolved element key.
    pub key: ElementKey,
    /// Whether the task no longer holds back the queue.
    pub completed: bool,
    /// Animation stage.
    pub stage: Stage,
    /// Matching completion signals received so far.
    pub received: u32,
    /// Time (host milliseconds) after which the task is force-completed.
    pub deadline: Option<u64>,
}

impl<C> SelectedTask<C> {
    /// The lifecycle context of this task, as seen by presentation code.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        let settled = self.stage == Stage::Animated;
        match &self.op {
            TaskOp::Mount(_) if settled => Lifecycle::new(Motion::Mount, Phase::Entered),
            TaskOp::Mount(_) => Lifecycle::new(Motion::Mount, Phase::Entering),
            TaskOp::Unmount(_) if settled => Lifecycle::new(Motion::Unmount, Phase::Exited),
            TaskOp::Unmount(_) => Lifecycle::new(Motion::Unmount, Phase::Exiting),
            TaskOp::Render(_) if self.child.is_some() => {
                Lifecycle::new(Motion::Mount, Phase::Entered)
            }
            TaskOp::Render(_) => Lifecycle::new(Motion::Unmount, Phase::Exited),
        }
    }
}

/// Direction of a lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Motion {
    /// The child is (or has been) entering.
    Mount,
    /// The child is (or has been) exiting.
    Unmount,
}

/// Phase of a lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Mount animation in progress.
    Entering,
    /// Mounted and settled.
    Entered,
    /// Unmount animation in progress.
    Exiting,
    /// Unmounted.
    Exited,
}

/// Lifecycle context handed to presentation code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Lifecycle {
    /// Mount or unmount.
    pub action: Motion,
    /// Where in that motion the task is.
    pub phase: Phase,
}

impl Lifecycle {
    /// Creates a lifecycle context.
    #[must_use]
    pub const fn new(action: Motion, phase: Phase) -> Self {
        Self { action, phase }
    }
}
