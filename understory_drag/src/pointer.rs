// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer normalization and position tracking.
//!
//! Mouse, pointer and touch events are reduced to a single client-space
//! [`DragPointerEvent`]. Touch events use the first active touch; on
//! `touchend`/`touchcancel` the active list is empty and the first changed
//! touch is used instead.
//!
//! [`PointerTrack`] remembers where a gesture started and where the pointer
//! was last seen, so an end event without any position can still finish the
//! gesture.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_drag::{DragPointerEvent, PointerInput};
//!
//! // A touchend: no active touches, one changed touch.
//! let input = PointerInput::Touch {
//!     touches: vec![],
//!     changed: vec![Point::new(130.0, 100.0)],
//! };
//! let event = DragPointerEvent::from_input(&input).unwrap();
//! assert_eq!(event.client, Point::new(130.0, 100.0));
//! ```

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

/// Raw pointer input as delivered by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
    /// A mouse or pointer event.
    Mouse {
        /// Client-space position.
        client: Point,
    },
    /// A touch event.
    Touch {
        /// Client-space positions of the touches still on the surface.
        touches: Vec<Point>,
        /// Client-space positions of the touches that changed in this event.
        changed: Vec<Point>,
    },
}

impl PointerInput {
    /// Builds a mouse input.
    #[must_use]
    pub fn mouse(x: f64, y: f64) -> Self {
        Self::Mouse {
            client: Point::new(x, y),
        }
    }

    /// Builds a single-touch input where the touch is both active and changed.
    #[must_use]
    pub fn touch(x: f64, y: f64) -> Self {
        let point = Point::new(x, y);
        Self::Touch {
            touches: alloc::vec![point],
            changed: alloc::vec![point],
        }
    }

    /// Builds a touch-end input: the lifted touch only appears as changed.
    #[must_use]
    pub fn touch_end(x: f64, y: f64) -> Self {
        Self::Touch {
            touches: Vec::new(),
            changed: alloc::vec![Point::new(x, y)],
        }
    }

    /// Returns `true` for touch input.
    #[must_use]
    pub fn is_touch(&self) -> bool {
        matches!(self, Self::Touch { .. })
    }
}

/// Normalized pointer position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragPointerEvent {
    /// Client-space position.
    pub client: Point,
}

impl DragPointerEvent {
    /// Normalizes host input.
    ///
    /// Returns `None` for touch input that lists no touches at all.
    #[must_use]
    pub fn from_input(input: &PointerInput) -> Option<Self> {
        let client = match input {
            PointerInput::Mouse { client } => *client,
            PointerInput::Touch { touches, changed } => {
                *touches.first().or_else(|| changed.first())?
            }
        };
        Some(Self { client })
    }
}

/// Tracks the start and last pointer positions of one gesture.
#[derive(Debug, Clone, Default, Copy)]
pub struct PointerTrack {
    /// Position where the gesture started.
    pub start_pos: Option<Point>,
    /// Last recorded pointer position.
    pub last_pos: Option<Point>,
}

impl PointerTrack {
    /// Starts tracking a gesture at `pos`.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Records a new position and returns the movement since the last one.
    ///
    /// Returns `None` when no gesture is being tracked.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let delta = self.last_pos.map(|last| pos - last);
        self.last_pos = Some(pos);
        delta
    }

    /// Offset of `current_pos` from the gesture start.
    #[must_use]
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// Stops tracking.
    pub fn end(&mut self) {
        self.start_pos = None;
        self.last_pos = None;
    }

    /// Returns `true` while a gesture is tracked.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.start_pos.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn mouse_input_uses_client_point() {
        let event = DragPointerEvent::from_input(&PointerInput::mouse(3.0, 4.0));
        assert_eq!(event.map(|e| e.client), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn touch_prefers_first_active_touch() {
        let input = PointerInput::Touch {
            touches: vec![Point::new(1.0, 1.0), Point::new(9.0, 9.0)],
            changed: vec![Point::new(5.0, 5.0)],
        };
        let event = DragPointerEvent::from_input(&input);
        assert_eq!(event.map(|e| e.client), Some(Point::new(1.0, 1.0)));
    }

    #[test]
    fn touch_end_falls_back_to_changed_touch() {
        let input = PointerInput::Touch {
            touches: vec![],
            changed: vec![Point::new(7.0, 8.0), Point::new(0.0, 0.0)],
        };
        let event = DragPointerEvent::from_input(&input);
        assert_eq!(event.map(|e| e.client), Some(Point::new(7.0, 8.0)));
    }

    #[test]
    fn empty_touch_has_no_position() {
        let input = PointerInput::Touch {
            touches: vec![],
            changed: vec![],
        };
        assert!(DragPointerEvent::from_input(&input).is_none());
    }

    #[test]
    fn new_track_is_idle() {
        let track = PointerTrack::default();
        assert!(!track.is_tracking());
        assert!(track.last_pos.is_none());
    }

    #[test]
    fn update_returns_incremental_deltas() {
        let mut track = PointerTrack::default();
        track.start(Point::new(0.0, 0.0));
        assert_eq!(track.update(Point::new(5.0, 3.0)), Some(Vec2::new(5.0, 3.0)));
        assert_eq!(track.update(Point::new(8.0, 7.0)), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(
            track.total_offset(Point::new(8.0, 7.0)),
            Some(Vec2::new(8.0, 7.0))
        );
    }

    #[test]
    fn update_without_gesture_is_ignored() {
        let mut track = PointerTrack::default();
        assert_eq!(track.update(Point::new(15.0, 25.0)), None);
        assert!(track.last_pos.is_none());
    }

    #[test]
    fn update_without_last_position_records_it() {
        let mut track = PointerTrack {
            start_pos: Some(Point::new(10.0, 20.0)),
            last_pos: None,
        };
        assert_eq!(track.update(Point::new(15.0, 25.0)), None);
        assert_eq!(track.last_pos, Some(Point::new(15.0, 25.0)));
    }

    #[test]
    fn restart_replaces_previous_gesture() {
        let mut track = PointerTrack::default();
        track.start(Point::new(0.0, 0.0));
        track.update(Point::new(10.0, 10.0));
        track.start(Point::new(50.0, 60.0));
        assert_eq!(track.last_pos, Some(Point::new(50.0, 60.0)));
        assert_eq!(
            track.total_offset(Point::new(55.0, 65.0)),
            Some(Vec2::new(5.0, 5.0))
        );
    }

    #[test]
    fn end_resets() {
        let mut track = PointerTrack::default();
        track.start(Point::new(10.0, 20.0));
        track.end();
        assert!(!track.is_tracking());
        assert_eq!(track.total_offset(Point::ZERO), None);
    }
}
