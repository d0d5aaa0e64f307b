// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener attachment for the lifetime of a gesture.
//!
//! A gesture listens for move and end events on the host root with
//! `capture: true`, so it sees them before descendant handlers. `touchmove`
//! is registered non-passive so the host can prevent native scrolling while
//! a touch drag is active; every other listener is passive.
//!
//! ```
//! use understory_drag::{attach, ListenerHost, ListenerKind, ListenerOptions, PointerSource};
//!
//! #[derive(Default)]
//! struct Root {
//!     next: u32,
//!     live: Vec<(u32, ListenerKind, ListenerOptions)>,
//! }
//!
//! impl ListenerHost for Root {
//!     type Handle = u32;
//!     fn add_listener(&mut self, kind: ListenerKind, options: ListenerOptions) -> u32 {
//!         self.next += 1;
//!         self.live.push((self.next, kind, options));
//!         self.next
//!     }
//!     fn remove_listener(&mut self, handle: u32) {
//!         self.live.retain(|(h, ..)| *h != handle);
//!     }
//! }
//!
//! let mut root = Root::default();
//! let mut attachment = attach(&mut root, PointerSource::Touch);
//! assert_eq!(root.live.len(), 3);
//! assert!(root.live.iter().all(|(_, _, o)| o.capture));
//!
//! attachment.detach(&mut root);
//! attachment.detach(&mut root);
//! assert!(root.live.is_empty());
//! ```

use alloc::vec::Vec;

use crate::pointer::PointerInput;

/// Events a gesture listens for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// `mousemove`.
    MouseMove,
    /// `mouseup`.
    MouseUp,
    /// `touchmove`.
    TouchMove,
    /// `touchend`.
    TouchEnd,
    /// `touchcancel`.
    TouchCancel,
}

impl ListenerKind {
    /// Registration options for this kind.
    #[must_use]
    pub fn options(self) -> ListenerOptions {
        ListenerOptions {
            capture: true,
            passive: self != Self::TouchMove,
        }
    }

    /// Returns `true` for events that finish a gesture.
    #[must_use]
    pub fn ends_gesture(self) -> bool {
        matches!(self, Self::MouseUp | Self::TouchEnd | Self::TouchCancel)
    }
}

/// Listener registration options.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListenerOptions {
    /// Listen in the capture phase.
    pub capture: bool,
    /// The listener never prevents the default action.
    pub passive: bool,
}

/// The input family a gesture was started with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerSource {
    /// Mouse or pointer events.
    Mouse,
    /// Touch events.
    Touch,
}

impl PointerSource {
    /// The source of `input`.
    #[must_use]
    pub fn of(input: &PointerInput) -> Self {
        if input.is_touch() {
            Self::Touch
        } else {
            Self::Mouse
        }
    }

    /// The listeners a gesture of this source needs.
    #[must_use]
    pub fn kinds(self) -> &'static [ListenerKind] {
        match self {
            Self::Mouse => &[ListenerKind::MouseMove, ListenerKind::MouseUp],
            Self::Touch => &[
                ListenerKind::TouchMove,
                ListenerKind::TouchEnd,
                ListenerKind::TouchCancel,
            ],
        }
    }
}

/// Registers and removes event listeners on the host root.
pub trait ListenerHost {
    /// Identifies one registration.
    type Handle;

    /// Registers a listener.
    fn add_listener(&mut self, kind: ListenerKind, options: ListenerOptions) -> Self::Handle;

    /// Removes a listener registered by [`add_listener`](Self::add_listener).
    fn remove_listener(&mut self, handle: Self::Handle);
}

/// Listeners added by [`attach`].
#[derive(Debug)]
pub struct Attachment<T> {
    handles: Vec<T>,
}

impl<T> Attachment<T> {
    /// Returns `true` until [`detach`](Self::detach) was called.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        !self.handles.is_empty()
    }

    /// Removes exactly the listeners this attachment added.
    ///
    /// Calling it again is a no-op. Returns the number of listeners removed.
    pub fn detach<H: ListenerHost<Handle = T> + ?Sized>(&mut self, host: &mut H) -> usize {
        let removed = self.handles.len();
        for handle in self.handles.drain(..) {
            host.remove_listener(handle);
        }
        if removed > 0 {
            tracing::trace!(removed, "drag listeners detached");
        }
        removed
    }
}

/// Registers the move and end listeners for a gesture from `source`.
pub fn attach<H: ListenerHost + ?Sized>(host: &mut H, source: PointerSource) -> Attachment<H::Handle> {
    let handles: Vec<_> = source
        .kinds()
        .iter()
        .map(|&kind| host.add_listener(kind, kind.options()))
        .collect();
    tracing::trace!(?source, added = handles.len(), "drag listeners attached");
    Attachment { handles }
}
