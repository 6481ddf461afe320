use smithay::{input::keyboard::Keysym, utils::Point};

use super::{MinimalPolicy, WindowPolicy};
use crate::{
    commands::ShellCommands,
    geometry::constrain_resize,
    grabs::{PointerGesture, ResizeEdge, TouchGesture},
    input::{KeyAction, KeyEvent, Modifiers, PointerEvent, TouchEvent},
    toolkit::{
        AppId, AppInfo, DepthLayer, WindowId, WindowSpec, WindowState, WindowToolkit, WindowType,
        WorkspaceHandle,
    },
    workspace::WorkspaceRegistry,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DockEdge {
    Left,
    Right,
}

/// Window management with a ring of workspaces on top of [`MinimalPolicy`].
#[derive(Debug)]
pub struct WorkspacePolicy {
    baseline: MinimalPolicy,
    commands: ShellCommands,
    workspaces: WorkspaceRegistry,
    pointer: PointerGesture,
    touch: TouchGesture,
    background_app: Option<String>,
}

impl WorkspacePolicy {
    pub fn new<T: WindowToolkit>(
        toolkit: &mut T,
        workspace_count: usize,
        commands: ShellCommands,
    ) -> Self {
        Self {
            baseline: MinimalPolicy::new(),
            commands,
            workspaces: WorkspaceRegistry::create(toolkit, workspace_count),
            pointer: PointerGesture::default(),
            touch: TouchGesture::default(),
            background_app: None,
        }
    }

    /// Windows of the application called `name` are placed on the background
    /// layer.
    pub fn with_background_app(mut self, name: impl Into<String>) -> Self {
        self.background_app = Some(name.into());
        self
    }

    pub fn commands(&self) -> &ShellCommands {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut ShellCommands {
        &mut self.commands
    }

    pub fn workspaces(&self) -> &WorkspaceRegistry {
        &self.workspaces
    }

    pub fn pointer_gesture(&self) -> &PointerGesture {
        &self.pointer
    }

    pub fn dock_active_window_left<T: WindowToolkit>(&mut self, toolkit: &mut T) {
        toolkit.invoke_under_lock(&mut |toolkit| dock_window_at_edge(toolkit, DockEdge::Left));
    }

    pub fn dock_active_window_right<T: WindowToolkit>(&mut self, toolkit: &mut T) {
        toolkit.invoke_under_lock(&mut |toolkit| dock_window_at_edge(toolkit, DockEdge::Right));
    }

    pub fn toggle_maximized_restored<T: WindowToolkit>(&mut self, toolkit: &mut T) {
        toolkit.invoke_under_lock(&mut |toolkit| toggle_window_maximized(toolkit));
    }

    pub fn workspace_up<T: WindowToolkit>(&mut self, toolkit: &mut T, take_active: bool) {
        let workspaces = &mut self.workspaces;
        toolkit.invoke_under_lock(&mut |toolkit| workspaces.cycle_up(toolkit, take_active));
    }

    pub fn workspace_down<T: WindowToolkit>(&mut self, toolkit: &mut T, take_active: bool) {
        let workspaces = &mut self.workspaces;
        toolkit.invoke_under_lock(&mut |toolkit| workspaces.cycle_down(toolkit, take_active));
    }

    fn is_background_app(&self, app: &AppInfo) -> bool {
        self.background_app
            .as_deref()
            .is_some_and(|name| name == app.name)
    }
}

fn dock_window_at_edge<T: WindowToolkit>(toolkit: &mut T, edge: DockEdge) {
    let Some(info) = toolkit
        .active_window()
        .and_then(|window| toolkit.info_for(window))
    else {
        return;
    };

    let area = toolkit.active_application_zone();
    let mut modifications = WindowSpec {
        state: Some(WindowState::VertMaximized),
        ..WindowSpec::default()
    };
    toolkit.place_and_size_for_state(&mut modifications, &info);

    let docked = info.state == WindowState::VertMaximized;
    let at_edge = match edge {
        DockEdge::Left => info.top_left.x == area.loc.x,
        DockEdge::Right => info.top_left.x != area.loc.x,
    };

    let width = if docked && at_edge {
        next_dock_width(info.size.w, area.size.w)
    } else {
        area.size.w / 2
    };

    let height = modifications.size.map_or(area.size.h, |size| size.h);
    let size = constrain_resize(&info.limits(), (width, height).into());
    let x = match edge {
        DockEdge::Left => area.loc.x,
        DockEdge::Right => area.loc.x + area.size.w - size.w,
    };
    let y = modifications.top_left.map_or(area.loc.y, |top_left| top_left.y);

    modifications.top_left = Some(Point::from((x, y)));
    modifications.size = Some(size);

    tracing::debug!(window = %info.id, ?edge, width = size.w, "docking window");
    toolkit.modify_window(info.id, &modifications);
}

fn toggle_window_maximized<T: WindowToolkit>(toolkit: &mut T) {
    let Some(info) = toolkit
        .active_window()
        .and_then(|window| toolkit.info_for(window))
    else {
        return;
    };

    let mut modifications = if info.state == WindowState::Restored {
        WindowSpec {
            state: Some(WindowState::Maximized),
            restore_rect: Some(info.geometry()),
            ..WindowSpec::default()
        }
    } else {
        WindowSpec {
            state: Some(WindowState::Restored),
            ..WindowSpec::default()
        }
    };

    toolkit.place_and_size_for_state(&mut modifications, &info);
    toolkit.modify_window(info.id, &modifications);
}

/// Half, then a third, then two thirds of the work area, then back to half.
fn next_dock_width(current: i32, area_width: i32) -> i32 {
    if current == area_width / 2 {
        area_width / 3
    } else if current == area_width / 3 {
        area_width * 2 / 3
    } else {
        area_width / 2
    }
}

impl WindowPolicy for WorkspacePolicy {
    fn place_new_window<T: WindowToolkit>(
        &mut self,
        toolkit: &T,
        app: &AppInfo,
        requested: &WindowSpec,
    ) -> WindowSpec {
        let mut spec = self.baseline.place_new_window(toolkit, app, requested);

        if self.is_background_app(app) {
            spec.depth_layer = Some(DepthLayer::Background);
        }

        if !spec.depth_layer.unwrap_or_default().is_application() {
            spec.window_type = Some(WindowType::Decoration);
        }

        spec
    }

    fn advise_new_window<T: WindowToolkit>(&mut self, toolkit: &mut T, window: WindowId) {
        let Some(info) = toolkit.info_for(window) else {
            return;
        };

        self.workspaces.track(window);
        if info.depth_layer.is_application() {
            self.commands.advise_new_window_for(info.app);
        }

        match info.parent {
            Some(parent) => {
                if self.workspaces.is_hidden(parent) {
                    self.workspaces.apply_hidden(toolkit, window);
                }
            }
            None => {
                let workspace = self.workspaces.active_workspace();
                let added = toolkit.add_tree_to_workspace(window, workspace);
                self.advise_adding_to_workspace(toolkit, workspace, &added);
            }
        }
    }

    fn handle_window_ready<T: WindowToolkit>(&mut self, toolkit: &mut T, window: WindowId) {
        if self.workspaces.is_hidden(window) {
            return;
        }
        self.baseline.handle_window_ready(toolkit, window);
    }

    fn advise_delete_window<T: WindowToolkit>(&mut self, toolkit: &mut T, window: WindowId) {
        if let Some(info) = toolkit.info_for(window)
            && info.depth_layer.is_application()
        {
            self.commands.advise_delete_window_for(info.app);
        }
        self.workspaces.forget(window);
    }

    fn advise_delete_app(&mut self, app: AppId) {
        self.commands.del_shell_app(app);
    }

    fn handle_modify_window<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        window: WindowId,
        modifications: &WindowSpec,
    ) {
        if self.workspaces.is_hidden(window) {
            let mut modifications = modifications.clone();
            modifications.state = None;
            modifications.size = None;
            self.baseline
                .handle_modify_window(toolkit, window, &modifications);
            return;
        }

        self.baseline
            .handle_modify_window(toolkit, window, modifications);
    }

    fn advise_adding_to_workspace<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        workspace: WorkspaceHandle,
        windows: &[WindowId],
    ) {
        self.workspaces.advise_adding(toolkit, workspace, windows);
    }

    fn handle_keyboard_event<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        event: &KeyEvent,
    ) -> bool {
        if self.commands.shell_keyboard_enabled()
            && event.action == KeyAction::Down
            && event.modifiers.contains(Modifiers::ALT | Modifiers::CTRL)
        {
            match event.keysym {
                Keysym::Left => {
                    self.dock_active_window_left(toolkit);
                    return true;
                }
                Keysym::Right => {
                    self.dock_active_window_right(toolkit);
                    return true;
                }
                Keysym::space => {
                    self.toggle_maximized_restored(toolkit);
                    return true;
                }
                _ => {}
            }
        }

        self.baseline.handle_keyboard_event(toolkit, event)
    }

    fn handle_pointer_event<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        event: &PointerEvent,
    ) -> bool {
        if self.pointer.handle_event(toolkit, event) {
            return true;
        }
        self.baseline.handle_pointer_event(toolkit, event)
    }

    fn handle_touch_event<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        event: &TouchEvent,
    ) -> bool {
        self.touch.handle_event(toolkit, event)
    }

    fn handle_request_move<T: WindowToolkit>(
        &mut self,
        _toolkit: &mut T,
        window: WindowId,
        trigger: &PointerEvent,
    ) {
        self.pointer.begin_move(window, trigger);
    }

    fn handle_request_resize<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        window: WindowId,
        trigger: &PointerEvent,
        edges: ResizeEdge,
    ) {
        self.pointer.begin_resize(toolkit, window, trigger, edges);
    }
}
