// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drag --heading-base-level=0

//! Understory Drag: pointer drag kinematics for move, resize, and scroll
//! gestures.
//!
//! This crate turns pointer movement into element geometry changes. It never
//! talks to a real event system or DOM: the host exposes its element through
//! [`DragElement`] and its listener registry through [`ListenerHost`], and
//! forwards pointer events to a running [`DragGesture`].
//!
//! - [`moving`]: translate an element, with three [`MoveStrategy`]s and
//!   optional bounds.
//! - [`resize`]: grow or shrink along signed [`Direction`]s with min/max
//!   clamping.
//! - [`scroll`]: pan a scroll container against the pointer.
//!
//! Every gesture captures its initial geometry once at pointer-down. Each
//! move event then maps the pointer delta to a change object that only
//! contains the axes that actually changed, so callers can tell "nothing
//! changed" apart from "changed back to the origin".
//!
//! ## Gesture lifetime
//!
//! ```rust
//! use kurbo::{Affine, Point, Rect, Size};
//! use understory_drag::{
//!     DragCallbacks, DragElement, ListenerHost, ListenerKind, ListenerOptions, MoveGesture,
//!     MoveOptions, PointerInput,
//! };
//!
//! struct Chip {
//!     transform: Affine,
//! }
//!
//! impl DragElement for Chip {
//!     fn offset_position(&self) -> Point { Point::ZERO }
//!     fn offset_size(&self) -> Size { Size::new(40.0, 20.0) }
//!     fn client_rect(&self) -> Rect {
//!         Rect::from_origin_size(self.transform.translation().to_point(), (40.0, 20.0))
//!     }
//!     fn transform(&self) -> Affine { self.transform }
//!     fn set_transform(&mut self, transform: Affine) { self.transform = transform; }
//!     fn set_position(&mut self, _: Option<f64>, _: Option<f64>) {}
//!     fn set_size(&mut self, _: Option<f64>, _: Option<f64>) {}
//! }
//!
//! #[derive(Default)]
//! struct Root { listeners: usize }
//!
//! impl ListenerHost for Root {
//!     type Handle = ();
//!     fn add_listener(&mut self, _: ListenerKind, _: ListenerOptions) { self.listeners += 1; }
//!     fn remove_listener(&mut self, _: ()) { self.listeners -= 1; }
//! }
//!
//! let mut chip = Chip { transform: Affine::translate((50.0, 0.0)) };
//! let mut root = Root::default();
//!
//! let mut gesture = MoveGesture::start(
//!     &chip,
//!     &mut root,
//!     &PointerInput::touch(100.0, 100.0),
//!     &MoveOptions::default(),
//!     DragCallbacks::default(),
//! )
//! .unwrap();
//!
//! let change = gesture.pointer_move(&mut chip, &PointerInput::touch(130.0, 100.0));
//! assert_eq!(change.and_then(|c| c.left), Some(80.0));
//!
//! gesture.pointer_up(&mut chip, &mut root, &PointerInput::touch_end(130.0, 100.0));
//! assert_eq!(chip.transform.translation().x, 80.0);
//! assert_eq!(root.listeners, 0);
//! ```
//!
//! ## Kinematics without a gesture
//!
//! The states and `compute_*` functions are usable on their own, e.g. to
//! preview a resize:
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use understory_drag::{
//!     compute_resize_horizontal, Direction, DragElement, DragResizeState, ResizeOptions,
//! };
//!
//! struct Column(Size);
//!
//! impl DragElement for Column {
//!     fn offset_position(&self) -> Point { Point::ZERO }
//!     fn offset_size(&self) -> Size { self.0 }
//!     fn client_rect(&self) -> Rect { self.0.to_rect() }
//!     fn set_position(&mut self, _: Option<f64>, _: Option<f64>) {}
//!     fn set_size(&mut self, _: Option<f64>, _: Option<f64>) {}
//! }
//!
//! // A handle on the left edge: dragging left grows the column.
//! let options = ResizeOptions::default()
//!     .with_horizontal(Direction::Backward)
//!     .with_width_limits(None, Some(210.0));
//! let state = DragResizeState::new(&Column(Size::new(200.0, 80.0)), Point::new(500.0, 0.0), &options)
//!     .unwrap();
//! assert_eq!(compute_resize_horizontal(&state, Point::new(495.0, 0.0)), Some(205.0));
//! assert_eq!(compute_resize_horizontal(&state, Point::new(480.0, 0.0)), Some(210.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to Kurbo and `tracing`.
//! - `libm`: Kurbo's `no_std` float math.
//! - `serde`: `Serialize`/`Deserialize` for the option types.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod element;
mod error;
mod gesture;
mod limits;
mod listeners;
pub mod moving;
mod pointer;
pub mod resize;
pub mod scroll;

pub use element::DragElement;
pub use error::DragSetupError;
pub use gesture::{
    ChangeFn, DragCallbacks, DragGesture, DragKind, MoveGesture, ResizeGesture, ScrollGesture,
    StartFn,
};
pub use limits::Limits;
pub use listeners::{
    Attachment, ListenerHost, ListenerKind, ListenerOptions, PointerSource, attach,
};
pub use moving::{
    DragMoveState, MoveChange, MoveOptions, MoveStrategy, apply_move, compute_move,
    compute_move_horizontal, compute_move_vertical,
};
pub use pointer::{DragPointerEvent, PointerInput, PointerTrack};
pub use resize::{
    Direction, DragResizeState, ResizeChange, ResizeOptions, apply_resize, compute_resize,
    compute_resize_horizontal, compute_resize_vertical,
};
pub use scroll::{
    DragScrollState, ScrollChange, ScrollOptions, apply_scroll, compute_scroll,
    compute_scroll_horizontal, compute_scroll_vertical,
};
