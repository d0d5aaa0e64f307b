// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Move gestures: translate an element by the pointer delta.
//!
//! ## Strategies
//!
//! - [`MoveStrategy::Absolute`] reads the layout offset and writes `left`/`top`.
//! - [`MoveStrategy::Transform`] reads the translation of the CSS transform
//!   and writes a recomposed matrix that keeps any scale, rotation or skew.
//! - [`MoveStrategy::Svg`] reads and writes the SVG translate transform, and
//!   scales pointer deltas by the move ratio (`viewBox` units per client
//!   pixel).
//!
//! ## Bounds
//!
//! With [`MoveOptions::bound`] set, the element's client rect is kept inside
//! the bound rect. Limits are derived once at gesture start in the strategy's
//! coordinate space:
//!
//! ```text
//! min_left = initial_left + (bound.x0 - rect.x0) * ratio
//! max_left = initial_left + (bound.x1 - rect.x1) * ratio
//! ```
//!
//! An element larger than its bound gets `max = min`, pinning its leading edge.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use understory_drag::{DragElement, DragMoveState, MoveOptions, MoveStrategy};
//!
//! struct Card { at: Point }
//!
//! impl DragElement for Card {
//!     fn offset_position(&self) -> Point { self.at }
//!     fn offset_size(&self) -> Size { Size::new(20.0, 20.0) }
//!     fn client_rect(&self) -> Rect { Rect::from_origin_size(self.at, (20.0, 20.0)) }
//!     fn set_position(&mut self, left: Option<f64>, top: Option<f64>) {
//!         self.at = Point::new(left.unwrap_or(self.at.x), top.unwrap_or(self.at.y));
//!     }
//!     fn set_size(&mut self, _: Option<f64>, _: Option<f64>) {}
//! }
//!
//! let mut card = Card { at: Point::new(10.0, 10.0) };
//! let options = MoveOptions::default()
//!     .with_strategy(MoveStrategy::Absolute)
//!     .with_bound(Rect::new(0.0, 0.0, 100.0, 100.0));
//! let state = DragMoveState::new(&card, Point::new(15.0, 15.0), &options).unwrap();
//!
//! // Dragging far right stops at the bound's right edge.
//! let change = state.compute(&card, Point::new(500.0, 15.0));
//! assert_eq!(change.left, Some(80.0));
//! assert_eq!(change.top, None);
//! state.apply(&mut card, &change);
//! assert_eq!(card.at, Point::new(80.0, 10.0));
//! ```

use kurbo::{Affine, Point, Rect, Vec2};

use crate::element::DragElement;
use crate::error::DragSetupError;
use crate::limits::Limits;

/// How an element is repositioned.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveStrategy {
    /// Layout offset in, `left`/`top` out.
    Absolute,
    /// CSS transform translation.
    #[default]
    Transform,
    /// SVG translate transform, scaled by the move ratio.
    Svg,
}

impl MoveStrategy {
    /// Picks the strategy for `element`: SVG graphics elements always use
    /// [`MoveStrategy::Svg`], everything else uses `default`.
    #[must_use]
    pub fn detect<E: DragElement + ?Sized>(element: &E, default: Self) -> Self {
        if element.svg_translate().is_some() {
            Self::Svg
        } else {
            default
        }
    }

    /// Reads the element's live left/top in this strategy's coordinate space.
    #[must_use]
    pub fn read<E: DragElement + ?Sized>(self, element: &E) -> Point {
        match self {
            Self::Absolute => element.offset_position(),
            Self::Transform => element.transform().translation().to_point(),
            Self::Svg => element.svg_translate().unwrap_or(Vec2::ZERO).to_point(),
        }
    }
}

/// Configuration of a move gesture.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MoveOptions {
    /// Strategy for non-SVG elements.
    pub strategy: MoveStrategy,
    /// Whether the horizontal axis follows the pointer.
    pub horizontal: bool,
    /// Whether the vertical axis follows the pointer.
    pub vertical: bool,
    /// Client rect the element must stay inside.
    pub bound: Option<Rect>,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            strategy: MoveStrategy::Transform,
            horizontal: true,
            vertical: true,
            bound: None,
        }
    }
}

impl MoveOptions {
    /// Sets the strategy for non-SVG elements.
    #[must_use]
    pub fn with_strategy(mut self, strategy: MoveStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enables or disables the horizontal axis.
    #[must_use]
    pub fn with_horizontal(mut self, enabled: bool) -> Self {
        self.horizontal = enabled;
        self
    }

    /// Enables or disables the vertical axis.
    #[must_use]
    pub fn with_vertical(mut self, enabled: bool) -> Self {
        self.vertical = enabled;
        self
    }

    /// Keeps the element inside `bound` (client space).
    #[must_use]
    pub fn with_bound(mut self, bound: Rect) -> Self {
        self.bound = Some(bound);
        self
    }
}

/// A position change; absent axes are left untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MoveChange {
    /// New left, in the strategy's coordinate space.
    pub left: Option<f64>,
    /// New top, in the strategy's coordinate space.
    pub top: Option<f64>,
}

impl MoveChange {
    /// Returns `true` if no axis changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.top.is_none()
    }
}

/// Gesture state captured at pointer-down.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragMoveState {
    /// Resolved strategy.
    pub strategy: MoveStrategy,
    /// Whether the horizontal axis is enabled.
    pub horizontal: bool,
    /// Whether the vertical axis is enabled.
    pub vertical: bool,
    /// Pointer position at pointer-down.
    pub origin: Point,
    /// Element left/top at pointer-down.
    pub initial: Point,
    /// Limits for left.
    pub left: Limits,
    /// Limits for top.
    pub top: Limits,
    /// Strategy units per client pixel.
    pub move_ratio: f64,
}

impl DragMoveState {
    /// Captures the initial geometry of `element` for a gesture starting at
    /// `pointer`.
    pub fn new<E: DragElement + ?Sized>(
        element: &E,
        pointer: Point,
        options: &MoveOptions,
    ) -> Result<Self, DragSetupError> {
        let strategy = MoveStrategy::detect(element, options.strategy);
        let move_ratio = match strategy {
            MoveStrategy::Svg => {
                if element.svg_translate().is_none() {
                    return Err(DragSetupError::UnsupportedStrategy(strategy));
                }
                let ratio = element.svg_scale().unwrap_or(1.0);
                if !(ratio.is_finite() && ratio > 0.0) {
                    return Err(DragSetupError::InvalidMoveRatio(ratio));
                }
                ratio
            }
            MoveStrategy::Absolute | MoveStrategy::Transform => 1.0,
        };
        let initial = strategy.read(element);
        let (left, top) = match options.bound {
            Some(bound) => {
                let rect = element.client_rect();
                (
                    bound_limits(initial.x, bound.x0 - rect.x0, bound.x1 - rect.x1, move_ratio),
                    bound_limits(initial.y, bound.y0 - rect.y0, bound.y1 - rect.y1, move_ratio),
                )
            }
            None => (Limits::UNBOUNDED, Limits::UNBOUNDED),
        };
        Ok(Self {
            strategy,
            horizontal: options.horizontal,
            vertical: options.vertical,
            origin: pointer,
            initial,
            left,
            top,
            move_ratio,
        })
    }

    /// Computes the change for `pointer`, omitting axes that are disabled or
    /// already at the computed value.
    #[must_use]
    pub fn compute<E: DragElement + ?Sized>(&self, element: &E, pointer: Point) -> MoveChange {
        compute_move(self, element, pointer)
    }

    /// Writes `change` to `element`.
    pub fn apply<E: DragElement + ?Sized>(&self, element: &mut E, change: &MoveChange) {
        apply_move(element, self, change);
    }
}

fn bound_limits(initial: f64, lead: f64, trail: f64, ratio: f64) -> Limits {
    let min = initial + lead * ratio;
    let max = (initial + trail * ratio).max(min);
    Limits {
        min: Some(min),
        max: Some(max),
    }
}

/// New left for `pointer`, or `None` if the horizontal axis is disabled.
#[must_use]
pub fn compute_move_horizontal(state: &DragMoveState, pointer: Point) -> Option<f64> {
    state.horizontal.then(|| {
        let delta = (pointer.x - state.origin.x) * state.move_ratio;
        state.left.clamp(state.initial.x + delta)
    })
}

/// New top for `pointer`, or `None` if the vertical axis is disabled.
#[must_use]
pub fn compute_move_vertical(state: &DragMoveState, pointer: Point) -> Option<f64> {
    state.vertical.then(|| {
        let delta = (pointer.y - state.origin.y) * state.move_ratio;
        state.top.clamp(state.initial.y + delta)
    })
}

/// Change for `pointer`; an axis is included only if it is enabled and its
/// value differs from the element's live value.
#[must_use]
pub fn compute_move<E: DragElement + ?Sized>(
    state: &DragMoveState,
    element: &E,
    pointer: Point,
) -> MoveChange {
    let live = state.strategy.read(element);
    MoveChange {
        left: compute_move_horizontal(state, pointer).filter(|left| *left != live.x),
        top: compute_move_vertical(state, pointer).filter(|top| *top != live.y),
    }
}

/// Writes `change` using the state's strategy.
pub fn apply_move<E: DragElement + ?Sized>(
    element: &mut E,
    state: &DragMoveState,
    change: &MoveChange,
) {
    if change.is_empty() {
        return;
    }
    match state.strategy {
        MoveStrategy::Absolute => element.set_position(change.left, change.top),
        MoveStrategy::Transform => {
            let [a, b, c, d, e, f] = element.transform().as_coeffs();
            element.set_transform(Affine::new([
                a,
                b,
                c,
                d,
                change.left.unwrap_or(e),
                change.top.unwrap_or(f),
            ]));
        }
        MoveStrategy::Svg => {
            let current = element.svg_translate().unwrap_or(Vec2::ZERO);
            element.set_svg_translate(Vec2::new(
                change.left.unwrap_or(current.x),
                change.top.unwrap_or(current.y),
            ));
        }
    }
}
