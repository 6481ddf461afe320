use bitflags::bitflags;
use smithay::{
    backend::input::{ButtonState, KeyState, MouseButton},
    input::keyboard::{Keysym, ModifiersState},
    utils::{Logical, Point},
};

use crate::{
    grabs::ResizeEdge,
    toolkit::{AppId, WindowId, WindowSpec},
};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const ALT = 1;
        const CTRL = 1 << 1;
        const SHIFT = 1 << 2;
        const LOGO = 1 << 3;
    }
}

impl From<&ModifiersState> for Modifiers {
    fn from(state: &ModifiersState) -> Self {
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::ALT, state.alt);
        modifiers.set(Modifiers::CTRL, state.ctrl);
        modifiers.set(Modifiers::SHIFT, state.shift);
        modifiers.set(Modifiers::LOGO, state.logo);
        modifiers
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        const PRIMARY = 1;
        const SECONDARY = 1 << 1;
        const TERTIARY = 1 << 2;
    }
}

impl PointerButtons {
    /// The first held button in primary, secondary, tertiary order.
    pub fn first_held(self) -> Option<PointerButtons> {
        [
            PointerButtons::PRIMARY,
            PointerButtons::SECONDARY,
            PointerButtons::TERTIARY,
        ]
        .into_iter()
        .find(|button| self.contains(*button))
    }
}

impl From<MouseButton> for PointerButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => PointerButtons::PRIMARY,
            MouseButton::Right => PointerButtons::SECONDARY,
            MouseButton::Middle => PointerButtons::TERTIARY,
            _ => PointerButtons::empty(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Repeat,
    Up,
}

impl From<KeyState> for KeyAction {
    fn from(state: KeyState) -> Self {
        match state {
            KeyState::Pressed => KeyAction::Down,
            KeyState::Released => KeyAction::Up,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub keysym: Keysym,
    pub action: KeyAction,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(keysym: Keysym, action: KeyAction, modifiers: Modifiers) -> Self {
        Self {
            keysym,
            action,
            modifiers,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerAction {
    ButtonDown,
    ButtonUp,
    Motion,
}

impl From<ButtonState> for PointerAction {
    fn from(state: ButtonState) -> Self {
        match state {
            ButtonState::Pressed => PointerAction::ButtonDown,
            ButtonState::Released => PointerAction::ButtonUp,
        }
    }
}

/// One pointer event: absolute position, relative motion since the previous
/// event, and the buttons held after the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub position: Point<i32, Logical>,
    pub motion: Point<i32, Logical>,
    pub buttons: PointerButtons,
    pub modifiers: Modifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchAction {
    Down,
    Change,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchPoint {
    pub id: i32,
    pub action: TouchAction,
    pub position: Point<i32, Logical>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TouchEvent {
    pub points: Vec<TouchPoint>,
    pub modifiers: Modifiers,
}

impl TouchEvent {
    pub fn new(points: Vec<TouchPoint>) -> Self {
        Self {
            points,
            modifiers: Modifiers::empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleEvent {
    NewWindow(WindowId),
    WindowReady(WindowId),
    DeleteWindow(WindowId),
    DeleteApp(AppId),
    Modify {
        window: WindowId,
        modifications: WindowSpec,
    },
    RequestMove {
        window: WindowId,
        trigger: PointerEvent,
    },
    RequestResize {
        window: WindowId,
        trigger: PointerEvent,
        edges: ResizeEdge,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ShellEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
    Touch(TouchEvent),
    Lifecycle(LifecycleEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_held_prefers_primary() {
        let held = PointerButtons::TERTIARY | PointerButtons::PRIMARY;
        assert_eq!(held.first_held(), Some(PointerButtons::PRIMARY));
        assert_eq!(PointerButtons::empty().first_held(), None);
    }

    #[test]
    fn modifiers_from_seat_state() {
        let state = ModifiersState {
            alt: true,
            ctrl: true,
            ..ModifiersState::default()
        };
        assert_eq!(Modifiers::from(&state), Modifiers::ALT | Modifiers::CTRL);
    }
}
