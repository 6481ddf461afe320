mod common;

use common::{open, shell};
use magpie::{
    grabs::ResizeEdge,
    input::{
        LifecycleEvent, Modifiers, PointerAction, PointerButtons, PointerEvent, ShellEvent,
        TouchAction, TouchEvent, TouchPoint,
    },
    toolkit::WindowToolkit,
};
use smithay::utils::{Point, Size};

fn touch_frame(action: TouchAction, points: &[(i32, i32)]) -> ShellEvent {
    ShellEvent::Touch(TouchEvent::new(
        points
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| TouchPoint {
                id: id as i32,
                action,
                position: Point::from((x, y)),
            })
            .collect(),
    ))
}

fn pointer(action: PointerAction, position: (i32, i32), motion: (i32, i32)) -> PointerEvent {
    PointerEvent {
        action,
        position: position.into(),
        motion: motion.into(),
        buttons: PointerButtons::PRIMARY,
        modifiers: Modifiers::empty(),
    }
}

#[test]
fn three_finger_pinch_resizes_the_active_window() {
    let mut shell = shell(2);
    let (_, editor) = open(&mut shell, "editor");
    let before = shell.toolkit.info_for(editor).unwrap();

    assert!(!shell.handle_event(&touch_frame(
        TouchAction::Down,
        &[(300, 200), (400, 200), (350, 300)]
    )));
    assert!(shell.handle_event(&touch_frame(
        TouchAction::Change,
        &[(300, 200), (420, 200), (350, 310)]
    )));

    let after = shell.toolkit.info_for(editor).unwrap();
    assert_eq!(after.size, Size::from((before.size.w + 20, before.size.h + 10)));
    assert_eq!(after.top_left, before.top_left);

    assert!(!shell.handle_event(&touch_frame(
        TouchAction::Up,
        &[(300, 200), (420, 200), (350, 310)]
    )));
    assert_eq!(shell.toolkit.info_for(editor).unwrap().size, after.size);
}

#[test]
fn left_edge_swipe_opens_the_launcher_once() {
    let mut shell = shell(2);

    assert!(shell.handle_event(&touch_frame(TouchAction::Down, &[(2, 300)])));
    assert!(shell.handle_event(&touch_frame(TouchAction::Change, &[(60, 300)])));
    assert!(shell.handle_event(&touch_frame(TouchAction::Up, &[(120, 300)])));
    assert_eq!(shell.launcher.shown, 1);

    assert!(!shell.handle_event(&touch_frame(TouchAction::Down, &[(300, 300)])));
    assert_eq!(shell.launcher.shown, 1);
}

#[test]
fn client_requested_move_follows_the_pointer_until_release() {
    let mut shell = shell(2);
    let (_, editor) = open(&mut shell, "editor");
    let start = shell.toolkit.info_for(editor).unwrap().top_left;

    let press = pointer(PointerAction::ButtonDown, (400, 300), (0, 0));
    shell.handle_event(&ShellEvent::Lifecycle(LifecycleEvent::RequestMove {
        window: editor,
        trigger: press,
    }));
    assert!(shell.policy.pointer_gesture().is_active());

    let drag = pointer(PointerAction::Motion, (430, 320), (30, 20));
    assert!(shell.handle_event(&ShellEvent::Pointer(drag)));
    assert_eq!(
        shell.toolkit.info_for(editor).unwrap().top_left,
        start + Point::from((30, 20))
    );

    let mut release = pointer(PointerAction::ButtonUp, (430, 320), (0, 0));
    release.buttons = PointerButtons::empty();
    shell.handle_event(&ShellEvent::Pointer(release));
    assert!(!shell.policy.pointer_gesture().is_active());
}

#[test]
fn client_requested_resize_grows_from_the_dragged_corner() {
    let mut shell = shell(2);
    let (_, editor) = open(&mut shell, "editor");
    let before = shell.toolkit.info_for(editor).unwrap();

    let press = pointer(PointerAction::ButtonDown, (900, 620), (0, 0));
    shell.handle_event(&ShellEvent::Lifecycle(LifecycleEvent::RequestResize {
        window: editor,
        trigger: press,
        edges: ResizeEdge::BOTTOM | ResizeEdge::RIGHT,
    }));

    shell.handle_event(&ShellEvent::Pointer(pointer(
        PointerAction::Motion,
        (940, 630),
        (40, 10),
    )));
    shell.handle_event(&ShellEvent::Pointer(pointer(
        PointerAction::Motion,
        (950, 650),
        (10, 20),
    )));

    let after = shell.toolkit.info_for(editor).unwrap();
    assert_eq!(after.top_left, before.top_left);
    assert_eq!(after.size, Size::from((before.size.w + 50, before.size.h + 30)));
}
