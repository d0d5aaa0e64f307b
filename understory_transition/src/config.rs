// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition configuration.

use alloc::string::String;

use crate::signal::TargetFilter;
use crate::task::{Action, Stage};

/// Timeout applied to awaiting tasks when none is configured, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// How an outgoing child and its replacement are sequenced.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExchangeMode {
    /// The old child exits while the new child enters, in the same task group.
    #[default]
    Cross,
    /// The old child exits completely before the new child starts entering.
    OutIn,
    /// The new child enters while the old child stays visible; the old child
    /// exits afterwards.
    InOut,
}

/// Host-provided class names applied to a task's element per stage.
///
/// `from` is applied while a task is [`Stage::Initial`], `active` while it is
/// [`Stage::Animating`], and `done` once it is [`Stage::Animated`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StageClasses {
    /// Class applied to an entering element before its animation starts.
    pub enter_from: Option<String>,
    /// Class applied to an entering element while it animates.
    pub enter_active: Option<String>,
    /// Class applied to an entered element.
    pub enter_done: Option<String>,
    /// Class applied to an exiting element before its animation starts.
    pub exit_from: Option<String>,
    /// Class applied to an exiting element while it animates.
    pub exit_active: Option<String>,
    /// Class applied to an exited element.
    pub exit_done: Option<String>,
}

impl StageClasses {
    /// Derives the six class names from a common prefix, e.g. `fade` yields
    /// `fade-enter-from`, `fade-enter-active`, and so on.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        let class = |suffix: &str| Some(alloc::format!("{prefix}-{suffix}"));
        Self {
            enter_from: class("enter-from"),
            enter_active: class("enter-active"),
            enter_done: class("enter-done"),
            exit_from: class("exit-from"),
            exit_active: class("exit-active"),
            exit_done: class("exit-done"),
        }
    }

    /// Returns the class for an action in a stage.
    ///
    /// Render tasks of present children use the `enter_done` class, so an
    /// element keeps its settled look once its mount task is gone.
    #[must_use]
    pub fn class_for(&self, action: Action, stage: Stage) -> Option<&str> {
        let class = match (action, stage) {
            (Action::Mount, Stage::Initial) => &self.enter_from,
            (Action::Mount, Stage::Animating) => &self.enter_active,
            (Action::Mount | Action::Render, Stage::Animated) => &self.enter_done,
            (Action::Unmount, Stage::Initial) => &self.exit_from,
            (Action::Unmount, Stage::Animating) => &self.exit_active,
            (Action::Unmount, Stage::Animated) => &self.exit_done,
            (Action::Render, _) => return None,
        };
        class.as_deref()
    }
}

/// Configuration of a [`Transition`](crate::Transition).
///
/// ```
/// use understory_transition::{ExchangeMode, TransitionConfig};
///
/// let config = TransitionConfig::default()
///     .with_mode(ExchangeMode::OutIn)
///     .with_initial(true)
///     .with_timeout_ms(300);
/// assert_eq!(config.timeout(), 300);
/// assert_eq!(TransitionConfig::default().timeout(), 2000);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransitionConfig {
    /// Exchange policy when one present child replaces another.
    pub mode: ExchangeMode,
    /// Whether the very first mount animates.
    pub initial: bool,
    /// Completion signals a mount task waits for.
    pub enter: u32,
    /// Completion signals an unmount task waits for.
    pub exit: u32,
    /// Explicit timeout in milliseconds; `None` uses [`DEFAULT_TIMEOUT_MS`]
    /// and warns when it expires.
    pub timeout_ms: Option<u64>,
    /// Which completion signals count.
    pub target: TargetFilter,
    /// Per-stage class names.
    pub classes: StageClasses,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            mode: ExchangeMode::Cross,
            initial: false,
            enter: 1,
            exit: 1,
            timeout_ms: None,
            target: TargetFilter::Any,
            classes: StageClasses::default(),
        }
    }
}

impl TransitionConfig {
    /// Sets the exchange mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ExchangeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets whether the first mount animates.
    #[must_use]
    pub fn with_initial(mut self, initial: bool) -> Self {
        self.initial = initial;
        self
    }

    /// Sets the number of completion signals a mount waits for.
    #[must_use]
    pub fn with_enter(mut self, enter: u32) -> Self {
        self.enter = enter;
        self
    }

    /// Sets the number of completion signals an unmount waits for.
    #[must_use]
    pub fn with_exit(mut self, exit: u32) -> Self {
        self.exit = exit;
        self
    }

    /// Sets an explicit timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Sets the completion signal filter.
    #[must_use]
    pub fn with_target(mut self, target: TargetFilter) -> Self {
        self.target = target;
        self
    }

    /// Sets the per-stage class names.
    #[must_use]
    pub fn with_classes(mut self, classes: StageClasses) -> Self {
        self.classes = classes;
        self
    }

    /// The effective timeout in milliseconds.
    #[must_use]
    pub fn timeout(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }
}
