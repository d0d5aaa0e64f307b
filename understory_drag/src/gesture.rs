// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture driver: owns one gesture's state from pointer-down to pointer-up.
//!
//! ## Usage
//!
//! 1) On pointer-down, call [`DragGesture::start`]. It captures the initial
//!    geometry, attaches the move/end listeners, and calls `on_start`.
//! 2) Forward every move event to [`DragGesture::pointer_move`]. Non-empty
//!    changes are applied to the element and reported to `on_progress`.
//! 3) Forward the end event to [`DragGesture::pointer_up`] (or call
//!    [`DragGesture::cancel`]). The final change is applied, `on_end` receives
//!    the full target geometry, and the listeners are detached.
//!
//! Dropping a gesture without finishing it leaves its listeners attached.

use alloc::boxed::Box;
use core::fmt;

use kurbo::Point;

use crate::element::DragElement;
use crate::error::DragSetupError;
use crate::listeners::{Attachment, ListenerHost, PointerSource, attach};
use crate::moving::{
    DragMoveState, MoveChange, MoveOptions, apply_move, compute_move, compute_move_horizontal,
    compute_move_vertical,
};
use crate::pointer::{DragPointerEvent, PointerInput, PointerTrack};
use crate::resize::{
    DragResizeState, ResizeChange, ResizeOptions, apply_resize, compute_resize,
    compute_resize_horizontal, compute_resize_vertical,
};
use crate::scroll::{
    DragScrollState, ScrollChange, ScrollOptions, apply_scroll, compute_scroll,
    compute_scroll_horizontal, compute_scroll_vertical,
};

/// A kind of drag gesture: move, resize, or scroll.
pub trait DragKind: Sized {
    /// Configuration captured at start.
    type Options;
    /// Change produced per pointer position.
    type Change: Copy + Default + PartialEq + fmt::Debug;

    /// Captures the gesture state at pointer-down.
    fn begin<E: DragElement + ?Sized>(
        element: &E,
        pointer: Point,
        options: &Self::Options,
    ) -> Result<Self, DragSetupError>;

    /// The change to write for `pointer`, omitting axes already in place.
    fn compute<E: DragElement + ?Sized>(&self, element: &E, pointer: Point) -> Self::Change;

    /// The full geometry for `pointer` on every enabled axis.
    fn target(&self, pointer: Point) -> Self::Change;

    /// Writes `change` to `element`.
    fn apply<E: DragElement + ?Sized>(&self, element: &mut E, change: &Self::Change);
}

impl DragKind for DragMoveState {
    type Options = MoveOptions;
    type Change = MoveChange;

    fn begin<E: DragElement + ?Sized>(
        element: &E,
        pointer: Point,
        options: &MoveOptions,
    ) -> Result<Self, DragSetupError> {
        Self::new(element, pointer, options)
    }

    fn compute<E: DragElement + ?Sized>(&self, element: &E, pointer: Point) -> MoveChange {
        compute_move(self, element, pointer)
    }

    fn target(&self, pointer: Point) -> MoveChange {
        MoveChange {
            left: compute_move_horizontal(self, pointer),
            top: compute_move_vertical(self, pointer),
        }
    }

    fn apply<E: DragElement + ?Sized>(&self, element: &mut E, change: &MoveChange) {
        apply_move(element, self, change);
    }
}

impl DragKind for DragResizeState {
    type Options = ResizeOptions;
    type Change = ResizeChange;

    fn begin<E: DragElement + ?Sized>(
        element: &E,
        pointer: Point,
        options: &ResizeOptions,
    ) -> Result<Self, DragSetupError> {
        Self::new(element, pointer, options)
    }

    fn compute<E: DragElement + ?Sized>(&self, element: &E, pointer: Point) -> ResizeChange {
        compute_resize(self, element, pointer)
    }

    fn target(&self, pointer: Point) -> ResizeChange {
        ResizeChange {
            width: compute_resize_horizontal(self, pointer),
            height: compute_resize_vertical(self, pointer),
        }
    }

    fn apply<E: DragElement + ?Sized>(&self, element: &mut E, change: &ResizeChange) {
        apply_resize(element, change);
    }
}

impl DragKind for DragScrollState {
    type Options = ScrollOptions;
    type Change = ScrollChange;

    fn begin<E: DragElement + ?Sized>(
        element: &E,
        pointer: Point,
        options: &ScrollOptions,
    ) -> Result<Self, DragSetupError> {
        Self::new(element, pointer, options)
    }

    fn compute<E: DragElement + ?Sized>(&self, element: &E, pointer: Point) -> ScrollChange {
        compute_scroll(self, element, pointer)
    }

    fn target(&self, pointer: Point) -> ScrollChange {
        ScrollChange {
            left: compute_scroll_horizontal(self, pointer),
            top: compute_scroll_vertical(self, pointer),
        }
    }

    fn apply<E: DragElement + ?Sized>(&self, element: &mut E, change: &ScrollChange) {
        apply_scroll(element, change);
    }
}

/// Called with the pointer-down position.
pub type StartFn = Box<dyn FnMut(DragPointerEvent)>;

/// Called with a change object.
pub type ChangeFn<C> = Box<dyn FnMut(&C)>;

/// Callbacks invoked over a gesture's lifetime.
pub struct DragCallbacks<C> {
    on_start: Option<StartFn>,
    on_progress: Option<ChangeFn<C>>,
    on_end: Option<ChangeFn<C>>,
}

impl<C> Default for DragCallbacks<C> {
    fn default() -> Self {
        Self {
            on_start: None,
            on_progress: None,
            on_end: None,
        }
    }
}

impl<C> fmt::Debug for DragCallbacks<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragCallbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}

impl<C> DragCallbacks<C> {
    /// Called once the gesture is set up, with the pointer-down position.
    #[must_use]
    pub fn with_on_start(mut self, f: impl FnMut(DragPointerEvent) + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    /// Called with every non-empty change applied during the gesture.
    #[must_use]
    pub fn with_on_progress(mut self, f: impl FnMut(&C) + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Called once with the final target geometry.
    #[must_use]
    pub fn with_on_end(mut self, f: impl FnMut(&C) + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }
}

/// One running drag gesture.
#[derive(Debug)]
pub struct DragGesture<S: DragKind, T> {
    state: S,
    track: PointerTrack,
    attachment: Attachment<T>,
    callbacks: DragCallbacks<S::Change>,
}

/// A running move gesture.
pub type MoveGesture<T> = DragGesture<DragMoveState, T>;
/// A running resize gesture.
pub type ResizeGesture<T> = DragGesture<DragResizeState, T>;
/// A running scroll gesture.
pub type ScrollGesture<T> = DragGesture<DragScrollState, T>;

impl<S: DragKind, T> DragGesture<S, T> {
    /// Starts a gesture from a pointer-down `input`.
    ///
    /// Fails without attaching anything if the input has no position or the
    /// element does not support the requested configuration.
    pub fn start<E, H>(
        element: &E,
        host: &mut H,
        input: &PointerInput,
        options: &S::Options,
        mut callbacks: DragCallbacks<S::Change>,
    ) -> Result<Self, DragSetupError>
    where
        E: DragElement + ?Sized,
        H: ListenerHost<Handle = T> + ?Sized,
    {
        let pointer = DragPointerEvent::from_input(input).ok_or(DragSetupError::NoPointer)?;
        let state = S::begin(element, pointer.client, options)?;
        let attachment = attach(host, PointerSource::of(input));
        let mut track = PointerTrack::default();
        track.start(pointer.client);
        tracing::debug!(x = pointer.client.x, y = pointer.client.y, "drag gesture started");
        if let Some(on_start) = callbacks.on_start.as_mut() {
            on_start(pointer);
        }
        Ok(Self {
            state,
            track,
            attachment,
            callbacks,
        })
    }

    /// The gesture state captured at start.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Pointer positions seen so far.
    #[must_use]
    pub fn track(&self) -> &PointerTrack {
        &self.track
    }

    /// Handles a move event.
    ///
    /// Returns the applied change, or `None` if the input had no position or
    /// nothing changed.
    pub fn pointer_move<E: DragElement + ?Sized>(
        &mut self,
        element: &mut E,
        input: &PointerInput,
    ) -> Option<S::Change> {
        let pointer = DragPointerEvent::from_input(input)?;
        self.track.update(pointer.client);
        let change = self.state.compute(element, pointer.client);
        if change == S::Change::default() {
            return None;
        }
        self.state.apply(element, &change);
        tracing::trace!(?change, "drag progress");
        if let Some(on_progress) = self.callbacks.on_progress.as_mut() {
            on_progress(&change);
        }
        Some(change)
    }

    /// Handles the end event and finishes the gesture.
    ///
    /// Inputs without a position fall back to the last tracked position.
    /// Returns the final target geometry passed to `on_end`.
    pub fn pointer_up<E, H>(self, element: &mut E, host: &mut H, input: &PointerInput) -> S::Change
    where
        E: DragElement + ?Sized,
        H: ListenerHost<Handle = T> + ?Sized,
    {
        let pointer = DragPointerEvent::from_input(input)
            .map(|event| event.client)
            .or(self.track.last_pos);
        self.finish(element, host, pointer)
    }

    /// Finishes the gesture at the last tracked position.
    pub fn cancel<E, H>(self, element: &mut E, host: &mut H) -> S::Change
    where
        E: DragElement + ?Sized,
        H: ListenerHost<Handle = T> + ?Sized,
    {
        let pointer = self.track.last_pos;
        self.finish(element, host, pointer)
    }

    fn finish<E, H>(mut self, element: &mut E, host: &mut H, pointer: Option<Point>) -> S::Change
    where
        E: DragElement + ?Sized,
        H: ListenerHost<Handle = T> + ?Sized,
    {
        let target = match pointer {
            Some(pointer) => {
                let change = self.state.compute(element, pointer);
                self.state.apply(element, &change);
                self.state.target(pointer)
            }
            None => S::Change::default(),
        };
        self.attachment.detach(host);
        self.track.end();
        tracing::debug!(?target, "drag gesture ended");
        if let Some(on_end) = self.callbacks.on_end.as_mut() {
            on_end(&target);
        }
        target
    }
}
