// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Completion signals: the host-side "animation finished" notifications a
//! task waits for, and the filter that decides which of them count.
//!
//! ## Minimal example
//!
//! ```
//! use understory_transition::{SignalSource, TargetFilter};
//!
//! let filter = TargetFilter::Class("fade".into());
//! let source = SignalSource::descendant(None, &["fade", "visible"]);
//! assert!(filter.matches(&source));
//! assert!(!TargetFilter::Root.matches(&source));
//! ```

use alloc::string::String;

/// Kind of completion signal delivered by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// A keyframe animation finished (`animationend`).
    AnimationEnd,
    /// A property transition finished (`transitionend`).
    TransitionEnd,
}

/// The element a completion signal originated from.
///
/// Signals bubble, so a task's element observes completions from its own
/// animations as well as from any descendant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SignalSource<'a> {
    /// `true` when the signal originated from the task's own root element.
    pub root: bool,
    /// The originating element's id, if any.
    pub id: Option<&'a str>,
    /// The originating element's class list.
    pub classes: &'a [&'a str],
}

impl<'a> SignalSource<'a> {
    /// A signal raised by the task's own root element.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            root: true,
            id: None,
            classes: &[],
        }
    }

    /// A signal raised by a descendant of the task's root element.
    #[must_use]
    pub const fn descendant(id: Option<&'a str>, classes: &'a [&'a str]) -> Self {
        Self {
            root: false,
            id,
            classes,
        }
    }
}

/// A completion signal as seen by a task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Signal<'a> {
    /// What finished.
    pub kind: SignalKind,
    /// Where it finished.
    pub source: SignalSource<'a>,
}

impl<'a> Signal<'a> {
    /// An `animationend` signal from `source`.
    #[must_use]
    pub const fn animation_end(source: SignalSource<'a>) -> Self {
        Self {
            kind: SignalKind::AnimationEnd,
            source,
        }
    }

    /// A `transitionend` signal from `source`.
    #[must_use]
    pub const fn transition_end(source: SignalSource<'a>) -> Self {
        Self {
            kind: SignalKind::TransitionEnd,
            source,
        }
    }
}

/// Decides which completion signals count towards a task's expected total.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetFilter {
    /// Every signal counts.
    #[default]
    Any,
    /// Only signals raised by the task's own root element count.
    Root,
    /// Only signals from the element with this id count.
    Id(String),
    /// Only signals from elements carrying this class count.
    Class(String),
}

impl TargetFilter {
    /// Returns `true` if a signal from `source` should be counted.
    #[must_use]
    pub fn matches(&self, source: &SignalSource<'_>) -> bool {
        match self {
            Self::Any => true,
            Self::Root => source.root,
            Self::Id(id) => source.id == Some(id.as_str()),
            Self::Class(class) => source.classes.contains(&class.as_str()),
        }
    }
}
