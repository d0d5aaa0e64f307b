// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element a gesture reads geometry from and writes styles to.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Geometry and style access for a dragged element.
///
/// Reads happen once at gesture start (initial geometry) and on every move
/// (live values, to suppress no-op changes). Writes only touch the axes
/// passed as `Some`.
pub trait DragElement {
    /// Layout position relative to the offset parent (`offsetLeft`/`offsetTop`).
    fn offset_position(&self) -> Point;

    /// Layout size (`offsetWidth`/`offsetHeight`).
    fn offset_size(&self) -> Size;

    /// Client-space bounding rectangle.
    fn client_rect(&self) -> Rect;

    /// Current CSS transform matrix.
    fn transform(&self) -> Affine {
        Affine::IDENTITY
    }

    /// Translation of the element's SVG transform, or `None` if the element
    /// is not an SVG graphics element.
    fn svg_translate(&self) -> Option<Vec2> {
        None
    }

    /// SVG user units per client pixel (`viewBox` width over client width).
    fn svg_scale(&self) -> Option<f64> {
        None
    }

    /// Current scroll offset (`scrollLeft`/`scrollTop`).
    fn scroll_offset(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Writes `left`/`top` styles.
    fn set_position(&mut self, left: Option<f64>, top: Option<f64>);

    /// Writes the CSS transform matrix.
    fn set_transform(&mut self, _transform: Affine) {}

    /// Writes the SVG translate transform.
    fn set_svg_translate(&mut self, _translate: Vec2) {}

    /// Writes `width`/`height` styles in pixels.
    fn set_size(&mut self, width: Option<f64>, height: Option<f64>);

    /// Writes `scrollLeft`/`scrollTop`.
    fn set_scroll_offset(&mut self, _left: Option<f64>, _top: Option<f64>) {}
}
