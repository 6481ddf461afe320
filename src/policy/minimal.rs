use smithay::{
    input::keyboard::Keysym,
    utils::{Logical, Point, Rectangle, Size},
};

use super::WindowPolicy;
use crate::{
    input::{KeyAction, KeyEvent, Modifiers, PointerAction, PointerButtons, PointerEvent},
    toolkit::{AppInfo, DepthLayer, WindowId, WindowSpec, WindowState, WindowToolkit, WindowType},
};

pub const DEFAULT_WINDOW_SIZE: (i32, i32) = (640, 480);

/// Baseline window management: centred placement, click to focus, Alt-drag
/// to move, and the Alt+Tab / Alt+` / Alt+F4 shortcuts.
#[derive(Debug, Default)]
pub struct MinimalPolicy;

impl MinimalPolicy {
    pub fn new() -> Self {
        Self
    }

    fn centre_in(area: Rectangle<i32, Logical>, size: Size<i32, Logical>) -> Point<i32, Logical> {
        Point::from((
            area.loc.x + (area.size.w - size.w) / 2,
            area.loc.y + (area.size.h - size.h) / 2,
        ))
    }
}

impl WindowPolicy for MinimalPolicy {
    fn place_new_window<T: WindowToolkit>(
        &mut self,
        toolkit: &T,
        _app: &AppInfo,
        requested: &WindowSpec,
    ) -> WindowSpec {
        let zone = toolkit.active_application_zone();
        let mut spec = requested.clone();

        let requested_size = requested.size.unwrap_or_else(|| DEFAULT_WINDOW_SIZE.into());
        let size = Size::from((
            requested_size.w.clamp(1, zone.size.w.max(1)),
            requested_size.h.clamp(1, zone.size.h.max(1)),
        ));
        spec.size = Some(size);

        if spec.top_left.is_none() {
            let parent = requested.parent.and_then(|parent| toolkit.info_for(parent));
            let area = match parent {
                Some(parent) => parent.geometry(),
                None => zone,
            };
            spec.top_left = Some(Self::centre_in(area, size));
        }

        spec.state.get_or_insert(WindowState::Restored);
        spec.depth_layer.get_or_insert(DepthLayer::Application);
        spec.window_type.get_or_insert(WindowType::Normal);
        spec
    }

    fn handle_window_ready<T: WindowToolkit>(&mut self, toolkit: &mut T, window: WindowId) {
        if toolkit
            .info_for(window)
            .is_some_and(|info| info.can_be_active())
        {
            toolkit.select_active_window(window);
        }
    }

    fn handle_modify_window<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        window: WindowId,
        modifications: &WindowSpec,
    ) {
        let Some(info) = toolkit.info_for(window) else {
            return;
        };

        let mut modifications = modifications.clone();
        if modifications.state.is_some() {
            toolkit.place_and_size_for_state(&mut modifications, &info);
        }

        if !modifications.is_empty() {
            toolkit.modify_window(window, &modifications);
        }
    }

    fn handle_keyboard_event<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        event: &KeyEvent,
    ) -> bool {
        if event.action != KeyAction::Down || event.modifiers != Modifiers::ALT {
            return false;
        }

        match event.keysym {
            Keysym::F4 => {
                if let Some(window) = toolkit.active_window() {
                    toolkit.ask_client_to_close(window);
                }
                true
            }
            Keysym::Tab => {
                toolkit.focus_next_application();
                true
            }
            Keysym::grave => {
                toolkit.focus_next_within_application();
                true
            }
            _ => false,
        }
    }

    fn handle_pointer_event<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        event: &PointerEvent,
    ) -> bool {
        match event.action {
            PointerAction::ButtonDown => {
                if let Some(window) = toolkit.window_at(event.position) {
                    toolkit.select_active_window(window);
                }
                false
            }
            PointerAction::Motion
                if event.modifiers == Modifiers::ALT
                    && event.buttons.contains(PointerButtons::PRIMARY) =>
            {
                let Some(target) = toolkit.window_at(event.position - event.motion) else {
                    return false;
                };
                if toolkit.select_active_window(target) == Some(target) {
                    toolkit.drag_active_window(event.motion);
                    return true;
                }
                false
            }
            _ => false,
        }
    }
}
