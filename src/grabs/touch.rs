use smithay::utils::{Logical, Point};

use crate::{
    geometry::{constrain_resize, keep_size_within_limits, MIN_GESTURE_EXTENT},
    input::{TouchAction, TouchEvent},
    toolkit::{WindowSpec, WindowToolkit},
};

const PINCH_POINTS: usize = 3;

/// Bounding box of every touch point in a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TouchBox {
    top: i32,
    left: i32,
    width: i32,
    height: i32,
}

impl TouchBox {
    fn around(event: &TouchEvent) -> Self {
        let Some(first) = event.points.first() else {
            return TouchBox::default();
        };

        let (mut left, mut top) = (first.position.x, first.position.y);
        let (mut right, mut bottom) = (left, top);
        for point in &event.points[1..] {
            left = left.min(point.position.x);
            top = top.min(point.position.y);
            right = right.max(point.position.x);
            bottom = bottom.max(point.position.y);
        }

        TouchBox {
            top,
            left,
            width: right - left,
            height: bottom - top,
        }
    }
}

/// Three-finger pinch to move and resize the active window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchGesture {
    pinching: bool,
    last: TouchBox,
}

impl TouchGesture {
    pub fn is_pinching(&self) -> bool {
        self.pinching
    }

    /// Returns whether the frame was consumed by a pinch.
    pub fn handle_event<T: WindowToolkit>(&mut self, toolkit: &mut T, event: &TouchEvent) -> bool {
        if event.points.is_empty() {
            return false;
        }

        if event.points.iter().any(|point| point.action == TouchAction::Up) {
            self.end(toolkit);
            return false;
        }

        let current = TouchBox::around(event);
        let is_drag = event
            .points
            .iter()
            .all(|point| point.action == TouchAction::Change);

        let mut consumed = false;
        if !is_drag {
            let centroid = centroid(event);
            if let Some(window) = toolkit.window_at(centroid) {
                toolkit.select_active_window(window);
            }
        } else if event.points.len() == PINCH_POINTS {
            self.pinch_step(toolkit, current);
            consumed = true;
        }

        if !consumed {
            self.end(toolkit);
        }

        self.last = current;
        consumed
    }

    fn pinch_step<T: WindowToolkit>(&mut self, toolkit: &mut T, current: TouchBox) {
        let Some(info) = toolkit
            .active_window()
            .and_then(|window| toolkit.info_for(window))
        else {
            return;
        };

        let width = (info.size.w + current.width - self.last.width).max(MIN_GESTURE_EXTENT);
        let height = (info.size.h + current.height - self.last.height).max(MIN_GESTURE_EXTENT);
        let delta = Point::from((current.left - self.last.left, current.top - self.last.top));

        let clamped = keep_size_within_limits(&info.limits(), delta, width, height);
        toolkit.modify_window(
            info.id,
            &WindowSpec {
                top_left: Some(info.top_left + clamped.delta),
                size: Some(clamped.size),
                ..WindowSpec::default()
            },
        );

        if !self.pinching {
            tracing::debug!(window = %info.id, "pinch gesture started");
        }
        self.pinching = true;
    }

    fn end<T: WindowToolkit>(&mut self, toolkit: &mut T) {
        if !self.pinching {
            return;
        }
        self.pinching = false;

        let Some(info) = toolkit
            .active_window()
            .and_then(|window| toolkit.info_for(window))
        else {
            return;
        };

        tracing::debug!(window = %info.id, "pinch gesture ended");
        toolkit.modify_window(
            info.id,
            &WindowSpec {
                top_left: Some(info.top_left),
                size: Some(constrain_resize(&info.limits(), info.size)),
                ..WindowSpec::default()
            },
        );
    }
}

fn centroid(event: &TouchEvent) -> Point<i32, Logical> {
    let count = event.points.len() as i64;
    let (sum_x, sum_y) = event.points.iter().fold((0i64, 0i64), |(x, y), point| {
        (x + point.position.x as i64, y + point.position.y as i64)
    });
    Point::from(((sum_x / count) as i32, (sum_y / count) as i32))
}

#[cfg(test)]
mod tests {
    use smithay::utils::{Rectangle, Size};

    use super::*;
    use crate::{
        headless::HeadlessToolkit,
        input::TouchPoint,
        toolkit::WindowId,
    };

    fn toolkit_with_window() -> (HeadlessToolkit, WindowId) {
        let mut toolkit = HeadlessToolkit::new(Rectangle::new((0, 0).into(), (1200, 800).into()));
        let app = toolkit.register_app("viewer");
        let window = toolkit.create_window(
            &app,
            &WindowSpec {
                top_left: Some((200, 150).into()),
                size: Some((400, 300).into()),
                max_size: Some((1000, 700).into()),
                ..WindowSpec::default()
            },
        );
        (toolkit, window)
    }

    fn frame(action: TouchAction, points: &[(i32, i32)]) -> TouchEvent {
        TouchEvent::new(
            points
                .iter()
                .enumerate()
                .map(|(id, &(x, y))| TouchPoint {
                    id: id as i32,
                    action,
                    position: Point::from((x, y)),
                })
                .collect(),
        )
    }

    #[test]
    fn touch_down_focuses_window_under_centroid() {
        let (mut toolkit, window) = toolkit_with_window();
        assert_eq!(toolkit.active_window(), None);

        let mut gesture = TouchGesture::default();
        let consumed = gesture.handle_event(&mut toolkit, &frame(TouchAction::Down, &[(300, 300)]));
        assert!(!consumed);
        assert_eq!(toolkit.active_window(), Some(window));
    }

    #[test]
    fn pinch_applies_bounding_box_delta() {
        let (mut toolkit, window) = toolkit_with_window();
        toolkit.select_active_window(window);
        let mut gesture = TouchGesture::default();

        let start = [(300, 250), (400, 250), (350, 350)];
        assert!(!gesture.handle_event(&mut toolkit, &frame(TouchAction::Down, &start)));

        let spread = [(290, 245), (410, 245), (350, 355)];
        assert!(gesture.handle_event(&mut toolkit, &frame(TouchAction::Change, &spread)));
        assert!(gesture.is_pinching());

        let info = toolkit.info_for(window).unwrap();
        assert_eq!(info.size, Size::from((420, 310)));
        assert_eq!(info.top_left, Point::from((190, 145)));
    }

    #[test]
    fn pinch_is_consumed_without_active_window() {
        let (mut toolkit, _window) = toolkit_with_window();
        let mut gesture = TouchGesture::default();
        let points = [(10, 10), (20, 10), (15, 20)];
        gesture.handle_event(&mut toolkit, &frame(TouchAction::Change, &points));
        assert!(gesture.handle_event(&mut toolkit, &frame(TouchAction::Change, &points)));
        assert!(!gesture.is_pinching());
    }

    #[test]
    fn lifting_a_finger_ends_pinch() {
        let (mut toolkit, window) = toolkit_with_window();
        toolkit.select_active_window(window);
        let mut gesture = TouchGesture::default();

        let start = [(300, 250), (400, 250), (350, 350)];
        gesture.handle_event(&mut toolkit, &frame(TouchAction::Down, &start));
        let spread = [(0, 0), (1100, 0), (550, 900)];
        gesture.handle_event(&mut toolkit, &frame(TouchAction::Change, &spread));
        assert!(gesture.is_pinching());

        assert!(!gesture.handle_event(&mut toolkit, &frame(TouchAction::Up, &spread)));
        assert!(!gesture.is_pinching());
        let info = toolkit.info_for(window).unwrap();
        assert!(info.size.w <= 1000 && info.size.h <= 700);
    }

    #[test]
    fn two_finger_frame_ends_pinch() {
        let (mut toolkit, window) = toolkit_with_window();
        toolkit.select_active_window(window);
        let mut gesture = TouchGesture::default();

        let points = [(300, 250), (400, 250), (350, 350)];
        gesture.handle_event(&mut toolkit, &frame(TouchAction::Change, &points));
        assert!(gesture.is_pinching());

        let two = [(300, 250), (400, 250)];
        assert!(!gesture.handle_event(&mut toolkit, &frame(TouchAction::Change, &two)));
        assert!(!gesture.is_pinching());
    }
}
