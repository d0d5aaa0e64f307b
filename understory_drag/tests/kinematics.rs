// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_drag` crate.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Affine, Point, Rect, Size, Vec2};
use proptest::prelude::*;
use understory_drag::{
    Direction, DragCallbacks, DragElement, DragMoveState, DragPointerEvent, DragResizeState,
    ListenerHost, ListenerKind, ListenerOptions, MoveChange, MoveGesture, MoveOptions,
    MoveStrategy, PointerInput, ResizeGesture, ResizeOptions, compute_move_horizontal,
    compute_move_vertical, compute_resize_horizontal,
};

/// An element with every coordinate system a gesture can write to.
#[derive(Clone, Debug, Default)]
struct Element {
    offset: Point,
    size: Size,
    transform: Affine,
    svg: Option<Vec2>,
    svg_scale: Option<f64>,
    writes: u32,
}

impl Element {
    fn at(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            offset: Point::new(x, y),
            size: Size::new(width, height),
            ..Self::default()
        }
    }
}

impl DragElement for Element {
    fn offset_position(&self) -> Point {
        self.offset
    }
    fn offset_size(&self) -> Size {
        self.size
    }
    fn client_rect(&self) -> Rect {
        let origin = self.offset + self.transform.translation() + self.svg.unwrap_or_default();
        Rect::from_origin_size(origin, self.size)
    }
    fn transform(&self) -> Affine {
        self.transform
    }
    fn svg_translate(&self) -> Option<Vec2> {
        self.svg
    }
    fn svg_scale(&self) -> Option<f64> {
        self.svg_scale
    }
    fn set_position(&mut self, left: Option<f64>, top: Option<f64>) {
        self.writes += 1;
        self.offset = Point::new(left.unwrap_or(self.offset.x), top.unwrap_or(self.offset.y));
    }
    fn set_transform(&mut self, transform: Affine) {
        self.writes += 1;
        self.transform = transform;
    }
    fn set_svg_translate(&mut self, translate: Vec2) {
        self.writes += 1;
        self.svg = Some(translate);
    }
    fn set_size(&mut self, width: Option<f64>, height: Option<f64>) {
        self.writes += 1;
        self.size = Size::new(
            width.unwrap_or(self.size.width),
            height.unwrap_or(self.size.height),
        );
    }
}

#[derive(Debug, Default)]
struct Root {
    next: u32,
    live: Vec<(u32, ListenerKind, ListenerOptions)>,
}

impl ListenerHost for Root {
    type Handle = u32;
    fn add_listener(&mut self, kind: ListenerKind, options: ListenerOptions) -> u32 {
        self.next += 1;
        self.live.push((self.next, kind, options));
        self.next
    }
    fn remove_listener(&mut self, handle: u32) {
        self.live.retain(|(h, ..)| *h != handle);
    }
}

#[test]
fn touch_move_delta_with_transform_strategy() {
    let mut element = Element {
        transform: Affine::translate((50.0, 0.0)),
        ..Element::default()
    };
    let mut root = Root::default();
    let mut gesture = MoveGesture::start(
        &element,
        &mut root,
        &PointerInput::touch(100.0, 100.0),
        &MoveOptions::default().with_strategy(MoveStrategy::Transform),
        DragCallbacks::default(),
    )
    .unwrap();

    let touch_move = root
        .live
        .iter()
        .find(|(_, kind, _)| *kind == ListenerKind::TouchMove)
        .map(|(_, _, options)| *options);
    assert_eq!(
        touch_move,
        Some(ListenerOptions {
            capture: true,
            passive: false
        })
    );

    let change = gesture.pointer_move(&mut element, &PointerInput::touch(130.0, 100.0));
    assert_eq!(
        change,
        Some(MoveChange {
            left: Some(80.0),
            top: None
        })
    );
    assert_eq!(element.transform.translation(), Vec2::new(80.0, 0.0));
}

#[test]
fn touch_end_without_touches_uses_changed_touch() {
    let mut element = Element::at(0.0, 0.0, 10.0, 10.0);
    let mut root = Root::default();
    let ended = Rc::new(RefCell::new(None));
    let sink = ended.clone();
    let gesture = MoveGesture::start(
        &element,
        &mut root,
        &PointerInput::touch(0.0, 0.0),
        &MoveOptions::default().with_strategy(MoveStrategy::Absolute),
        DragCallbacks::default().with_on_end(move |c: &MoveChange| *sink.borrow_mut() = Some(*c)),
    )
    .unwrap();

    let target = gesture.pointer_up(&mut element, &mut root, &PointerInput::touch_end(12.0, 7.0));
    assert_eq!(target.left, Some(12.0));
    assert_eq!(target.top, Some(7.0));
    assert_eq!(*ended.borrow(), Some(target));
    assert_eq!(element.offset, Point::new(12.0, 7.0));
    assert!(root.live.is_empty());
}

#[test]
fn resize_backward_direction() {
    let mut element = Element::at(500.0, 0.0, 200.0, 50.0);
    let mut root = Root::default();
    let options = ResizeOptions::default().with_horizontal(Direction::Backward);
    let mut gesture = ResizeGesture::start(
        &element,
        &mut root,
        &PointerInput::mouse(500.0, 10.0),
        &options,
        DragCallbacks::default(),
    )
    .unwrap();
    let change = gesture.pointer_move(&mut element, &PointerInput::mouse(480.0, 10.0));
    assert_eq!(change.and_then(|c| c.width), Some(220.0));
    assert_eq!(element.size.width, 220.0);

    let capped = ResizeOptions::default()
        .with_horizontal(Direction::Backward)
        .with_width_limits(None, Some(210.0));
    let state =
        DragResizeState::new(&Element::at(500.0, 0.0, 200.0, 50.0), Point::new(500.0, 0.0), &capped)
            .unwrap();
    assert_eq!(compute_resize_horizontal(&state, Point::new(480.0, 0.0)), Some(210.0));
}

#[test]
fn start_reports_pointer_down_position() {
    let started = Rc::new(RefCell::new(Vec::new()));
    let sink = started.clone();
    let mut root = Root::default();
    let mut element = Element::at(0.0, 0.0, 10.0, 10.0);
    let gesture = MoveGesture::start(
        &element,
        &mut root,
        &PointerInput::mouse(3.0, 4.0),
        &MoveOptions::default(),
        DragCallbacks::default().with_on_start(move |e: DragPointerEvent| {
            sink.borrow_mut().push(e.client);
        }),
    )
    .unwrap();
    assert_eq!(started.borrow().as_slice(), &[Point::new(3.0, 4.0)]);
    gesture.cancel(&mut element, &mut root);
    assert!(root.live.is_empty());
}

#[test]
fn no_op_moves_write_nothing() {
    let mut element = Element::at(10.0, 10.0, 10.0, 10.0);
    let mut root = Root::default();
    let options = MoveOptions::default()
        .with_strategy(MoveStrategy::Absolute)
        .with_bound(Rect::new(0.0, 0.0, 20.0, 20.0));
    let mut gesture = MoveGesture::start(
        &element,
        &mut root,
        &PointerInput::mouse(0.0, 0.0),
        &options,
        DragCallbacks::default(),
    )
    .unwrap();
    // Already at the bound's far corner: pushing further changes nothing.
    assert!(gesture.pointer_move(&mut element, &PointerInput::mouse(50.0, 50.0)).is_none());
    assert_eq!(element.writes, 0);
}

#[test]
fn svg_elements_move_in_view_box_units() {
    let mut element = Element {
        svg: Some(Vec2::new(4.0, 4.0)),
        svg_scale: Some(0.5),
        size: Size::new(10.0, 10.0),
        ..Element::default()
    };
    let mut root = Root::default();
    let mut gesture = MoveGesture::start(
        &element,
        &mut root,
        &PointerInput::mouse(0.0, 0.0),
        &MoveOptions::default().with_strategy(MoveStrategy::Absolute),
        DragCallbacks::default(),
    )
    .unwrap();
    assert_eq!(gesture.state().strategy, MoveStrategy::Svg);
    gesture.pointer_move(&mut element, &PointerInput::mouse(10.0, -4.0));
    assert_eq!(element.svg, Some(Vec2::new(9.0, 2.0)));
    assert_eq!(element.offset, Point::ZERO);
}

fn delta() -> impl Strategy<Value = f64> {
    -2000.0..2000.0_f64
}

proptest! {
    #[test]
    fn bounded_moves_stay_inside_bound(
        x in 0.0..80.0_f64,
        y in 0.0..80.0_f64,
        dx in delta(),
        dy in delta(),
    ) {
        let element = Element::at(x, y, 20.0, 20.0);
        let bound = Rect::new(0.0, 0.0, 100.0, 100.0);
        let options = MoveOptions::default()
            .with_strategy(MoveStrategy::Absolute)
            .with_bound(bound);
        let origin = Point::new(50.0, 50.0);
        let state = DragMoveState::new(&element, origin, &options).unwrap();
        let pointer = origin + Vec2::new(dx, dy);
        let left = compute_move_horizontal(&state, pointer).unwrap();
        let top = compute_move_vertical(&state, pointer).unwrap();
        prop_assert!(state.left.contains(left));
        prop_assert!(state.top.contains(top));
        let eps = 1e-9;
        prop_assert!(left >= bound.x0 - eps && left + 20.0 <= bound.x1 + eps);
        prop_assert!(top >= bound.y0 - eps && top + 20.0 <= bound.y1 + eps);
    }

    #[test]
    fn unbounded_moves_follow_pointer(
        dx in delta(),
        initial in -500.0..500.0_f64,
    ) {
        let element = Element::at(initial, 0.0, 5.0, 5.0);
        let options = MoveOptions::default().with_strategy(MoveStrategy::Absolute);
        let state = DragMoveState::new(&element, Point::ZERO, &options).unwrap();
        let left = compute_move_horizontal(&state, Point::new(dx, 0.0)).unwrap();
        prop_assert_eq!(left, initial + dx);
    }

    #[test]
    fn resize_stays_within_limits(
        dx in delta(),
        min in 0.0..150.0_f64,
        span in 0.0..300.0_f64,
        backward in any::<bool>(),
    ) {
        let max = min + span;
        let direction = if backward { Direction::Backward } else { Direction::Forward };
        let options = ResizeOptions::default()
            .with_horizontal(direction)
            .with_width_limits(Some(min), Some(max));
        let element = Element::at(0.0, 0.0, 120.0, 40.0);
        let state = DragResizeState::new(&element, Point::ZERO, &options).unwrap();
        let width = compute_resize_horizontal(&state, Point::new(dx, 0.0)).unwrap();
        prop_assert!(width >= min && width <= max);
        let raw = 120.0 + dx * direction.sign();
        if raw >= min && raw <= max {
            prop_assert_eq!(width, raw);
        }
    }
}
