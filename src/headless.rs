//! In-memory implementation of [`WindowToolkit`].

use std::collections::BTreeMap;

use calloop::LoopSignal;
use smithay::utils::{Logical, Point, Rectangle, Size};

use crate::{
    policy::minimal::DEFAULT_WINDOW_SIZE,
    toolkit::{
        AppId, AppInfo, WindowId, WindowInfo, WindowSpec, WindowState, WindowToolkit,
        WorkspaceHandle,
    },
};

pub struct HeadlessToolkit {
    output: Rectangle<i32, Logical>,
    panel_height: i32,
    apps: BTreeMap<AppId, AppInfo>,
    windows: BTreeMap<WindowId, WindowInfo>,
    /// Bottom to top.
    stacking: Vec<WindowId>,
    /// Least to most recently focused.
    focus_history: Vec<WindowId>,
    active: Option<WindowId>,
    workspaces: BTreeMap<WorkspaceHandle, Vec<WindowId>>,
    next_app: u32,
    next_window: u32,
    next_workspace: u32,
    lock_depth: usize,
    unlocked_modifications: usize,
    close_requests: Vec<WindowId>,
    stop_requested: bool,
    loop_signal: Option<LoopSignal>,
}

impl HeadlessToolkit {
    pub fn new(output: Rectangle<i32, Logical>) -> Self {
        Self {
            output,
            panel_height: 0,
            apps: BTreeMap::new(),
            windows: BTreeMap::new(),
            stacking: Vec::new(),
            focus_history: Vec::new(),
            active: None,
            workspaces: BTreeMap::new(),
            next_app: 1,
            next_window: 1,
            next_workspace: 1,
            lock_depth: 0,
            unlocked_modifications: 0,
            close_requests: Vec::new(),
            stop_requested: false,
            loop_signal: None,
        }
    }

    pub fn with_panel_height(mut self, height: i32) -> Self {
        self.panel_height = height.clamp(0, self.output.size.h);
        self
    }

    pub fn set_loop_signal(&mut self, signal: LoopSignal) {
        self.loop_signal = Some(signal);
    }

    pub fn register_app(&mut self, name: &str) -> AppInfo {
        let info = AppInfo {
            id: AppId(self.next_app),
            name: name.to_owned(),
        };
        self.next_app += 1;
        self.apps.insert(info.id, info.clone());
        info
    }

    pub fn app(&self, app: AppId) -> Option<&AppInfo> {
        self.apps.get(&app)
    }

    pub fn app_by_name(&self, name: &str) -> Option<&AppInfo> {
        self.apps.values().find(|app| app.name == name)
    }

    pub fn unregister_app(&mut self, app: AppId) {
        self.apps.remove(&app);
    }

    /// Creates a window exactly as specified. Children join every workspace
    /// their parent is in. The new window is not focused.
    pub fn create_window(&mut self, app: &AppInfo, spec: &WindowSpec) -> WindowId {
        let id = WindowId(self.next_window);
        self.next_window += 1;

        let top_left = spec.top_left.unwrap_or_default();
        let size = spec.size.unwrap_or_else(|| DEFAULT_WINDOW_SIZE.into());
        let parent = spec
            .parent
            .filter(|parent| self.windows.contains_key(parent));

        let info = WindowInfo {
            id,
            app: app.id,
            name: spec.name.clone().unwrap_or_else(|| app.name.clone()),
            top_left,
            size,
            state: spec.state.unwrap_or_default(),
            depth_layer: spec.depth_layer.unwrap_or_default(),
            window_type: spec.window_type.unwrap_or_default(),
            parent,
            children: Vec::new(),
            min_size: spec.min_size.unwrap_or_default(),
            max_size: spec
                .max_size
                .unwrap_or_else(|| Size::from((i32::MAX, i32::MAX))),
            restore_rect: spec
                .restore_rect
                .unwrap_or_else(|| Rectangle::new(top_left, size)),
        };

        self.windows.insert(id, info);
        self.stacking.push(id);

        if let Some(parent) = parent {
            if let Some(parent_info) = self.windows.get_mut(&parent) {
                parent_info.children.push(id);
            }
            for members in self.workspaces.values_mut() {
                if members.contains(&parent) {
                    members.push(id);
                }
            }
        }

        tracing::trace!(%id, app = %app.name, "window created");
        id
    }

    pub fn destroy_window(&mut self, window: WindowId) {
        let Some(info) = self.windows.remove(&window) else {
            return;
        };

        for child in info.children {
            self.destroy_window(child);
        }

        if let Some(parent) = info.parent.and_then(|parent| self.windows.get_mut(&parent)) {
            parent.children.retain(|child| *child != window);
        }

        self.stacking.retain(|id| *id != window);
        self.focus_history.retain(|id| *id != window);
        self.close_requests.retain(|id| *id != window);
        for members in self.workspaces.values_mut() {
            members.retain(|id| *id != window);
        }

        if self.active == Some(window) {
            self.refocus();
        }
        tracing::trace!(id = %window, "window destroyed");
    }

    pub fn windows(&self) -> impl Iterator<Item = &WindowInfo> {
        self.windows.values()
    }

    pub fn windows_of_app(&self, app: AppId) -> Vec<WindowId> {
        self.windows
            .values()
            .filter(|info| info.app == app)
            .map(|info| info.id)
            .collect()
    }

    pub fn take_close_requests(&mut self) -> Vec<WindowId> {
        std::mem::take(&mut self.close_requests)
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    pub fn lock_depth(&self) -> usize {
        self.lock_depth
    }

    /// Window modifications applied while no locked scope was open.
    pub fn unlocked_modifications(&self) -> usize {
        self.unlocked_modifications
    }

    fn focusable(&self, window: WindowId) -> bool {
        self.windows
            .get(&window)
            .is_some_and(WindowInfo::can_be_active)
    }

    fn refocus(&mut self) {
        self.active = self
            .focus_history
            .iter()
            .rev()
            .copied()
            .find(|window| self.focusable(*window));
    }

    fn raise(&mut self, window: WindowId) {
        self.stacking.retain(|id| *id != window);
        self.stacking.push(window);
    }

    fn tree(&self, window: WindowId) -> Vec<WindowId> {
        let mut tree = Vec::new();
        let mut pending = vec![window];
        while let Some(next) = pending.pop() {
            if let Some(info) = self.windows.get(&next) {
                tree.push(next);
                pending.extend(info.children.iter().rev());
            }
        }
        tree
    }

    fn focus_candidates(&self) -> Vec<&WindowInfo> {
        self.windows
            .values()
            .filter(|info| info.can_be_active())
            .collect()
    }

    fn select_next(&mut self, same_app: bool) {
        let candidates = self.focus_candidates();
        let Some(current) = self.active.and_then(|window| self.windows.get(&window)) else {
            if let Some(first) = candidates.first().map(|info| info.id) {
                self.select_active_window(first);
            }
            return;
        };

        let start = candidates
            .iter()
            .position(|info| info.id == current.id)
            .unwrap_or(0);
        let next = candidates
            .iter()
            .cycle()
            .skip(start + 1)
            .take(candidates.len())
            .find(|info| info.id != current.id && (info.app == current.app) == same_app)
            .map(|info| info.id);

        if let Some(next) = next {
            self.select_active_window(next);
        }
    }
}

impl WindowToolkit for HeadlessToolkit {
    fn info_for(&self, window: WindowId) -> Option<WindowInfo> {
        self.windows.get(&window).cloned()
    }

    fn modify_window(&mut self, window: WindowId, modifications: &WindowSpec) {
        if self.lock_depth == 0 {
            self.unlocked_modifications += 1;
            tracing::trace!(%window, "window modified outside locked scope");
        }

        let Some(info) = self.windows.get_mut(&window) else {
            return;
        };

        if let Some(state) = modifications.state
            && state != info.state
            && info.state == WindowState::Restored
            && modifications.restore_rect.is_none()
        {
            info.restore_rect = info.geometry();
        }

        if let Some(name) = &modifications.name {
            info.name = name.clone();
        }
        if let Some(top_left) = modifications.top_left {
            info.top_left = top_left;
        }
        if let Some(size) = modifications.size {
            info.size = size;
        }
        if let Some(state) = modifications.state {
            info.state = state;
        }
        if let Some(depth_layer) = modifications.depth_layer {
            info.depth_layer = depth_layer;
        }
        if let Some(window_type) = modifications.window_type {
            info.window_type = window_type;
        }
        if let Some(min_size) = modifications.min_size {
            info.min_size = min_size;
        }
        if let Some(max_size) = modifications.max_size {
            info.max_size = max_size;
        }
        if let Some(restore_rect) = modifications.restore_rect {
            info.restore_rect = restore_rect;
        }

        let lost_focus = !info.can_be_active();
        if lost_focus && self.active == Some(window) {
            self.refocus();
        }
    }

    fn place_and_size_for_state(&self, modifications: &mut WindowSpec, info: &WindowInfo) {
        let Some(state) = modifications.state else {
            return;
        };
        let zone = self.active_application_zone();
        let top_left = modifications.top_left.unwrap_or(info.top_left);
        let size = modifications.size.unwrap_or(info.size);

        match state {
            WindowState::Restored => {
                if info.state != WindowState::Restored {
                    let rect = modifications.restore_rect.unwrap_or(info.restore_rect);
                    modifications.top_left.get_or_insert(rect.loc);
                    modifications.size.get_or_insert(rect.size);
                }
            }
            WindowState::Maximized => {
                modifications.top_left = Some(zone.loc);
                modifications.size = Some(zone.size);
            }
            WindowState::VertMaximized => {
                modifications.top_left = Some(Point::from((top_left.x, zone.loc.y)));
                modifications.size = Some(Size::from((size.w, zone.size.h)));
            }
            WindowState::HorizMaximized => {
                modifications.top_left = Some(Point::from((zone.loc.x, top_left.y)));
                modifications.size = Some(Size::from((zone.size.w, size.h)));
            }
            WindowState::Fullscreen => {
                modifications.top_left = Some(self.output.loc);
                modifications.size = Some(self.output.size);
            }
            WindowState::Hidden | WindowState::Minimized => {}
        }
    }

    fn select_active_window(&mut self, window: WindowId) -> Option<WindowId> {
        if self.focusable(window) {
            self.active = Some(window);
            self.focus_history.retain(|id| *id != window);
            self.focus_history.push(window);
            self.raise(window);
        }
        self.active
    }

    fn active_window(&self) -> Option<WindowId> {
        self.active
    }

    fn window_at(&self, point: Point<i32, Logical>) -> Option<WindowId> {
        self.stacking.iter().rev().copied().find(|window| {
            self.windows
                .get(window)
                .is_some_and(|info| info.state.is_visible() && info.geometry().contains(point))
        })
    }

    fn active_output(&self) -> Rectangle<i32, Logical> {
        self.output
    }

    fn active_application_zone(&self) -> Rectangle<i32, Logical> {
        Rectangle::new(
            Point::from((self.output.loc.x, self.output.loc.y + self.panel_height)),
            Size::from((self.output.size.w, self.output.size.h - self.panel_height)),
        )
    }

    fn ask_client_to_close(&mut self, window: WindowId) {
        if self.windows.contains_key(&window) && !self.close_requests.contains(&window) {
            self.close_requests.push(window);
        }
    }

    fn focus_next_application(&mut self) {
        self.select_next(false);
    }

    fn focus_next_within_application(&mut self) {
        self.select_next(true);
    }

    fn drag_active_window(&mut self, movement: Point<i32, Logical>) {
        let Some(active) = self.active else {
            return;
        };
        for window in self.tree(active) {
            if let Some(info) = self.windows.get_mut(&window) {
                info.top_left += movement;
            }
        }
    }

    fn create_workspace(&mut self) -> WorkspaceHandle {
        let handle = WorkspaceHandle(self.next_workspace);
        self.next_workspace += 1;
        self.workspaces.insert(handle, Vec::new());
        handle
    }

    fn add_tree_to_workspace(
        &mut self,
        window: WindowId,
        workspace: WorkspaceHandle,
    ) -> Vec<WindowId> {
        let tree = self.tree(window);
        let Some(members) = self.workspaces.get_mut(&workspace) else {
            return Vec::new();
        };

        let mut added = Vec::new();
        for id in tree {
            if !members.contains(&id) {
                members.push(id);
                added.push(id);
            }
        }
        added
    }

    fn remove_tree_from_workspace(
        &mut self,
        window: WindowId,
        workspace: WorkspaceHandle,
    ) -> Vec<WindowId> {
        let tree = self.tree(window);
        let Some(members) = self.workspaces.get_mut(&workspace) else {
            return Vec::new();
        };

        let removed: Vec<WindowId> = tree
            .into_iter()
            .filter(|id| members.contains(id))
            .collect();
        members.retain(|id| !removed.contains(id));
        removed
    }

    fn windows_in_workspace(&self, workspace: WorkspaceHandle) -> Vec<WindowId> {
        self.workspaces.get(&workspace).cloned().unwrap_or_default()
    }

    fn workspaces_containing(&self, window: WindowId) -> Vec<WorkspaceHandle> {
        self.workspaces
            .iter()
            .filter(|(_, members)| members.contains(&window))
            .map(|(handle, _)| *handle)
            .collect()
    }

    fn invoke_under_lock(&mut self, work: &mut dyn FnMut(&mut Self)) {
        self.lock_depth += 1;
        tracing::trace!(depth = self.lock_depth, "entering locked scope");
        work(self);
        self.lock_depth -= 1;
    }

    fn stop(&mut self) {
        self.stop_requested = true;
        if let Some(signal) = &self.loop_signal {
            signal.stop();
            signal.wakeup();
        }
    }
}
