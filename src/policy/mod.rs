pub mod minimal;
pub mod workspace;

pub use minimal::MinimalPolicy;
pub use workspace::WorkspacePolicy;

use crate::{
    grabs::ResizeEdge,
    input::{KeyEvent, LifecycleEvent, PointerEvent, TouchEvent},
    toolkit::{AppId, AppInfo, WindowId, WindowSpec, WindowToolkit, WorkspaceHandle},
};

/// Decisions a window manager makes on behalf of the compositor.
///
/// Event handlers return whether they consumed the event. Everything else is
/// advisory and cannot fail: a window that has vanished is simply skipped.
pub trait WindowPolicy {
    fn place_new_window<T: WindowToolkit>(
        &mut self,
        toolkit: &T,
        app: &AppInfo,
        requested: &WindowSpec,
    ) -> WindowSpec;

    fn advise_new_window<T: WindowToolkit>(&mut self, _toolkit: &mut T, _window: WindowId) {}

    fn handle_window_ready<T: WindowToolkit>(&mut self, _toolkit: &mut T, _window: WindowId) {}

    fn advise_delete_window<T: WindowToolkit>(&mut self, _toolkit: &mut T, _window: WindowId) {}

    fn advise_delete_app(&mut self, _app: AppId) {}

    fn handle_modify_window<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        window: WindowId,
        modifications: &WindowSpec,
    );

    fn advise_adding_to_workspace<T: WindowToolkit>(
        &mut self,
        _toolkit: &mut T,
        _workspace: WorkspaceHandle,
        _windows: &[WindowId],
    ) {
    }

    fn handle_keyboard_event<T: WindowToolkit>(
        &mut self,
        _toolkit: &mut T,
        _event: &KeyEvent,
    ) -> bool {
        false
    }

    fn handle_pointer_event<T: WindowToolkit>(
        &mut self,
        _toolkit: &mut T,
        _event: &PointerEvent,
    ) -> bool {
        false
    }

    fn handle_touch_event<T: WindowToolkit>(
        &mut self,
        _toolkit: &mut T,
        _event: &TouchEvent,
    ) -> bool {
        false
    }

    fn handle_request_move<T: WindowToolkit>(
        &mut self,
        _toolkit: &mut T,
        _window: WindowId,
        _trigger: &PointerEvent,
    ) {
    }

    fn handle_request_resize<T: WindowToolkit>(
        &mut self,
        _toolkit: &mut T,
        _window: WindowId,
        _trigger: &PointerEvent,
        _edges: ResizeEdge,
    ) {
    }

    fn handle_lifecycle_event<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        event: &LifecycleEvent,
    ) {
        match event {
            LifecycleEvent::NewWindow(window) => self.advise_new_window(toolkit, *window),
            LifecycleEvent::WindowReady(window) => self.handle_window_ready(toolkit, *window),
            LifecycleEvent::DeleteWindow(window) => self.advise_delete_window(toolkit, *window),
            LifecycleEvent::DeleteApp(app) => self.advise_delete_app(*app),
            LifecycleEvent::Modify {
                window,
                modifications,
            } => self.handle_modify_window(toolkit, *window, modifications),
            LifecycleEvent::RequestMove { window, trigger } => {
                self.handle_request_move(toolkit, *window, trigger)
            }
            LifecycleEvent::RequestResize {
                window,
                trigger,
                edges,
            } => self.handle_request_resize(toolkit, *window, trigger, *edges),
        }
    }
}
