// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resize gestures: grow or shrink an element along signed directions.
//!
//! A handle on the right edge resizes with [`Direction::Forward`]; a handle on
//! the left edge uses [`Direction::Backward`], so dragging left grows the
//! element.

use kurbo::{Point, Size};

use crate::element::DragElement;
use crate::error::DragSetupError;
use crate::limits::Limits;

/// Signed multiplier applied to the pointer delta of one axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// `+1`: the dimension grows with the pointer.
    Forward,
    /// `-1`: the dimension grows against the pointer.
    Backward,
    /// `0`: the axis does not resize.
    #[default]
    None,
}

impl Direction {
    /// The multiplier.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
            Self::None => 0.0,
        }
    }
}

/// Configuration of a resize gesture.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResizeOptions {
    /// Horizontal direction.
    pub horizontal: Direction,
    /// Vertical direction.
    pub vertical: Direction,
    /// Minimum width; `None` means 0.
    pub min_width: Option<f64>,
    /// Maximum width.
    pub max_width: Option<f64>,
    /// Minimum height; `None` means 0.
    pub min_height: Option<f64>,
    /// Maximum height.
    pub max_height: Option<f64>,
}

impl ResizeOptions {
    /// Sets the horizontal direction.
    #[must_use]
    pub fn with_horizontal(mut self, direction: Direction) -> Self {
        self.horizontal = direction;
        self
    }

    /// Sets the vertical direction.
    #[must_use]
    pub fn with_vertical(mut self, direction: Direction) -> Self {
        self.vertical = direction;
        self
    }

    /// Sets the width limits.
    #[must_use]
    pub fn with_width_limits(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_width = min;
        self.max_width = max;
        self
    }

    /// Sets the height limits.
    #[must_use]
    pub fn with_height_limits(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_height = min;
        self.max_height = max;
        self
    }
}

/// A size change; absent axes are left untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ResizeChange {
    /// New width in pixels.
    pub width: Option<f64>,
    /// New height in pixels.
    pub height: Option<f64>,
}

impl ResizeChange {
    /// Returns `true` if no axis changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

/// Gesture state captured at pointer-down.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragResizeState {
    /// Horizontal direction.
    pub horizontal: Direction,
    /// Vertical direction.
    pub vertical: Direction,
    /// Pointer position at pointer-down.
    pub origin: Point,
    /// Element size at pointer-down.
    pub initial: Size,
    /// Width limits; the minimum is always set.
    pub width: Limits,
    /// Height limits; the minimum is always set.
    pub height: Limits,
}

impl DragResizeState {
    /// Captures the initial size of `element` for a gesture starting at
    /// `pointer`.
    pub fn new<E: DragElement + ?Sized>(
        element: &E,
        pointer: Point,
        options: &ResizeOptions,
    ) -> Result<Self, DragSetupError> {
        Ok(Self {
            horizontal: options.horizontal,
            vertical: options.vertical,
            origin: pointer,
            initial: element.offset_size(),
            width: Limits::new(Some(options.min_width.unwrap_or(0.0)), options.max_width)?,
            height: Limits::new(Some(options.min_height.unwrap_or(0.0)), options.max_height)?,
        })
    }

    /// Computes the change for `pointer`, omitting axes that do not resize or
    /// already have the computed size.
    #[must_use]
    pub fn compute<E: DragElement + ?Sized>(&self, element: &E, pointer: Point) -> ResizeChange {
        compute_resize(self, element, pointer)
    }

    /// Writes `change` to `element`.
    pub fn apply<E: DragElement + ?Sized>(&self, element: &mut E, change: &ResizeChange) {
        apply_resize(element, change);
    }
}

/// New width for `pointer`, or `None` for [`Direction::None`].
#[must_use]
pub fn compute_resize_horizontal(state: &DragResizeState, pointer: Point) -> Option<f64> {
    (state.horizontal != Direction::None).then(|| {
        let delta = (pointer.x - state.origin.x) * state.horizontal.sign();
        state.width.clamp(state.initial.width + delta)
    })
}

/// New height for `pointer`, or `None` for [`Direction::None`].
#[must_use]
pub fn compute_resize_vertical(state: &DragResizeState, pointer: Point) -> Option<f64> {
    (state.vertical != Direction::None).then(|| {
        let delta = (pointer.y - state.origin.y) * state.vertical.sign();
        state.height.clamp(state.initial.height + delta)
    })
}

/// Change for `pointer`; an axis is included only if it resizes and its
/// value differs from the element's live size.
#[must_use]
pub fn compute_resize<E: DragElement + ?Sized>(
    state: &DragResizeState,
    element: &E,
    pointer: Point,
) -> ResizeChange {
    let live = element.offset_size();
    ResizeChange {
        width: compute_resize_horizontal(state, pointer).filter(|w| *w != live.width),
        height: compute_resize_vertical(state, pointer).filter(|h| *h != live.height),
    }
}

/// Writes `change` as `width`/`height` styles.
pub fn apply_resize<E: DragElement + ?Sized>(element: &mut E, change: &ResizeChange) {
    if !change.is_empty() {
        element.set_size(change.width, change.height);
    }
}
