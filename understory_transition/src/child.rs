// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traits a host's renderable unit implements to be transitioned.

use crate::task::{ElementKey, Lifecycle, Stage};

/// A renderable unit the scheduler can transition.
///
/// Identity is the `(kind, key)` pair: two children with the same kind and key
/// are the same element receiving new props, anything else is a replacement.
pub trait TransitionChild: Clone {
    /// The element type, e.g. a component id or tag name.
    type Kind: PartialEq;

    /// Returns the element type.
    fn kind(&self) -> Self::Kind;

    /// Returns the user-assigned key, if any.
    fn key(&self) -> Option<&str>;

    /// Returns `true` if `self` and `other` denote the same element.
    fn same_identity(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.key() == other.key()
    }
}

/// Presentation attributes computed for one task's element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Presentation<'a> {
    /// Reconciliation key of the element.
    pub key: ElementKey,
    /// Lifecycle context.
    pub lifecycle: Lifecycle,
    /// Animation stage.
    pub stage: Stage,
    /// Class to merge into the element, if the stage has one configured.
    pub class: Option<&'a str>,
}

/// A renderable unit that accepts computed presentation attributes.
///
/// Implementations merge the class into their own class list and typically
/// attach completion-signal listeners that forward to
/// [`Transition::signal`](crate::Transition::signal).
pub trait Decorate: Sized {
    /// Returns a copy of `self` carrying `presentation`.
    fn decorate(&self, presentation: &Presentation<'_>) -> Self;
}
