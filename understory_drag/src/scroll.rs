// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll gestures: drag content to pan a scroll container.
//!
//! The scroll offset moves against the pointer; dragging content to the
//! right decreases `scrollLeft`. Values are not clamped, the host's native
//! scroll clamping applies.

use kurbo::{Point, Vec2};

use crate::element::DragElement;
use crate::error::DragSetupError;

/// Configuration of a scroll gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrollOptions {
    /// Whether the horizontal axis scrolls.
    pub horizontal: bool,
    /// Whether the vertical axis scrolls.
    pub vertical: bool,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            horizontal: true,
            vertical: true,
        }
    }
}

/// A scroll change; absent axes are left untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScrollChange {
    /// New `scrollLeft`.
    pub left: Option<f64>,
    /// New `scrollTop`.
    pub top: Option<f64>,
}

impl ScrollChange {
    /// Returns `true` if no axis changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.top.is_none()
    }
}

/// Gesture state captured at pointer-down.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragScrollState {
    /// Whether the horizontal axis scrolls.
    pub horizontal: bool,
    /// Whether the vertical axis scrolls.
    pub vertical: bool,
    /// Pointer position at pointer-down.
    pub origin: Point,
    /// Scroll offset at pointer-down.
    pub initial: Vec2,
}

impl DragScrollState {
    /// Captures the scroll offset of `element` for a gesture starting at
    /// `pointer`.
    pub fn new<E: DragElement + ?Sized>(
        element: &E,
        pointer: Point,
        options: &ScrollOptions,
    ) -> Result<Self, DragSetupError> {
        Ok(Self {
            horizontal: options.horizontal,
            vertical: options.vertical,
            origin: pointer,
            initial: element.scroll_offset(),
        })
    }

    /// Computes the change for `pointer`.
    #[must_use]
    pub fn compute<E: DragElement + ?Sized>(&self, element: &E, pointer: Point) -> ScrollChange {
        compute_scroll(self, element, pointer)
    }

    /// Writes `change` to `element`.
    pub fn apply<E: DragElement + ?Sized>(&self, element: &mut E, change: &ScrollChange) {
        apply_scroll(element, change);
    }
}

/// New `scrollLeft`, or `None` if the axis is disabled.
#[must_use]
pub fn compute_scroll_horizontal(state: &DragScrollState, pointer: Point) -> Option<f64> {
    state
        .horizontal
        .then_some(state.initial.x - (pointer.x - state.origin.x))
}

/// New `scrollTop`, or `None` if the axis is disabled.
#[must_use]
pub fn compute_scroll_vertical(state: &DragScrollState, pointer: Point) -> Option<f64> {
    state
        .vertical
        .then_some(state.initial.y - (pointer.y - state.origin.y))
}

/// Change for `pointer`, omitting axes already at the computed offset.
#[must_use]
pub fn compute_scroll<E: DragElement + ?Sized>(
    state: &DragScrollState,
    element: &E,
    pointer: Point,
) -> ScrollChange {
    let live = element.scroll_offset();
    ScrollChange {
        left: compute_scroll_horizontal(state, pointer).filter(|x| *x != live.x),
        top: compute_scroll_vertical(state, pointer).filter(|y| *y != live.y),
    }
}

/// Writes `change` as scroll offsets.
pub fn apply_scroll<E: DragElement + ?Sized>(element: &mut E, change: &ScrollChange) {
    if !change.is_empty() {
        element.set_scroll_offset(change.left, change.top);
    }
}
