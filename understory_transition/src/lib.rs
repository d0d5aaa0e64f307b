// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_transition --heading-base-level=0

//! Understory Transition: declarative enter/exit/exchange transitions for a
//! single child slot.
//!
//! The host hands the scheduler the child it wants rendered, on every render.
//! The scheduler turns changes of that child into a queue of **task groups**
//! and releases them one group at a time, so an element never starts entering
//! while the DOM state it depends on is still animating out.
//!
//! - A **task** mounts, unmounts, or renders one child ([`TaskOp`]).
//! - A **task group** runs its tasks in parallel; the next group is only
//!   selected once every task of the active group is completed.
//! - A **transaction** is the set of groups produced by one child change.
//!
//! ## Identity
//!
//! Children are compared by `(kind, key)` through [`TransitionChild`], never by
//! deep equality:
//!
//! | previous | next | result |
//! |---|---|---|
//! | absent | absent | nothing |
//! | absent | present | mount tasks |
//! | present | absent | unmount tasks |
//! | present | other identity | exchange tasks per [`ExchangeMode`] |
//! | present | same identity | in-place update of the alive tasks |
//!
//! ## Exchange modes
//!
//! - [`ExchangeMode::Cross`]: unmount old and mount new in one group, then a
//!   render group settling both.
//! - [`ExchangeMode::OutIn`]: the old child exits completely before the new
//!   one starts entering.
//! - [`ExchangeMode::InOut`]: the new child enters next to the still visible old
//!   child, then the old child exits.
//!
//! ## Keys
//!
//! Every task resolves an [`ElementKey`] when it is selected. Tasks that keep
//! rendering an existing element carry that element's key from the previous
//! group, so the host's reconciler keeps the same node across groups. Fresh
//! elements get a key derived from their task id, which is never reused.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_transition::{
//!     Diff, ExchangeMode, Signal, SignalSource, Transition, TransitionChild,
//!     TransitionConfig,
//! };
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct View {
//!     kind: &'static str,
//!     key: Option<&'static str>,
//! }
//!
//! impl TransitionChild for View {
//!     type Kind = &'static str;
//!     fn kind(&self) -> &'static str {
//!         self.kind
//!     }
//!     fn key(&self) -> Option<&str> {
//!         self.key
//!     }
//! }
//!
//! let config = TransitionConfig::default().with_mode(ExchangeMode::OutIn);
//! let mut transition = Transition::new(config);
//!
//! // The first child renders without animation unless `initial` is set.
//! let home = View { kind: "page", key: Some("home") };
//! assert_eq!(transition.update(Some(home)), Diff::Mount);
//! while transition.frame(0) {}
//!
//! // Replacing it queues an out-in exchange.
//! let about = View { kind: "page", key: Some("about") };
//! assert_eq!(transition.update(Some(about)), Diff::Exchange(ExchangeMode::OutIn));
//!
//! // Only the outgoing page is rendered while it exits.
//! assert_eq!(transition.tasks().len(), 1);
//! let exiting = transition.tasks()[0].id;
//! transition.frame(16);
//! transition.signal(exiting, &Signal::transition_end(SignalSource::root()));
//! ```
//!
//! ## Host integration
//!
//! [`Transition`] is the host-facing driver; [`TransitionState`] is the bare
//! reducer for hosts that want to drive the stages themselves. Render output
//! is decorated through [`Decorate`], and descendants can read the
//! [`Lifecycle`] of the task that renders them.
//!
//! Bookkeeping inconsistencies never panic. They are logged with `tracing`
//! and reported as [`TransitionWarning`].
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to dependencies.
//! - `serde`: `Serialize`/`Deserialize` for the configuration types.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod animator;
mod builder;
mod child;
mod config;
mod signal;
mod state;
mod task;
mod transition;

pub use animator::SignalOutcome;
pub use child::{Decorate, Presentation, TransitionChild};
pub use config::{DEFAULT_TIMEOUT_MS, ExchangeMode, StageClasses, TransitionConfig};
pub use signal::{Signal, SignalKind, SignalSource, TargetFilter};
pub use state::{Diff, TransitionState, TransitionWarning};
pub use task::{
    Action, Await, Callback, ElementKey, KeyRule, Lifecycle, Motion, Observers, Phase,
    QueuedTask, SelectedTask, Settle, Stage, TaskGroup, TaskId, TaskOp, TransactionId,
};
pub use transition::{Rendered, Transition};
