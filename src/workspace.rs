use std::collections::HashMap;

use crate::toolkit::{WindowId, WindowSpec, WindowState, WindowToolkit, WorkspaceHandle};

pub const MAX_WORKSPACES: usize = 32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkspaceInfo {
    pub in_hidden_workspace: bool,
    /// State to restore when the window becomes visible again. Only
    /// meaningful while `in_hidden_workspace` is set.
    pub old_state: WindowState,
}

#[derive(Debug)]
pub struct WorkspaceRegistry {
    ring: Vec<WorkspaceHandle>,
    active: usize,
    resume: Vec<Option<WindowId>>,
    info: HashMap<WindowId, WorkspaceInfo>,
}

impl WorkspaceRegistry {
    /// Creates `count` workspaces, clamped to `1..=32`, with the first active.
    pub fn create<T: WindowToolkit>(toolkit: &mut T, count: usize) -> Self {
        let count = count.clamp(1, MAX_WORKSPACES);
        let ring = (0..count).map(|_| toolkit.create_workspace()).collect();
        tracing::debug!(count, "workspaces created");

        Self {
            ring,
            active: 0,
            resume: vec![None; count],
            info: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn active_slot(&self) -> usize {
        self.active
    }

    pub fn active_workspace(&self) -> WorkspaceHandle {
        self.ring[self.active]
    }

    pub fn handles(&self) -> &[WorkspaceHandle] {
        &self.ring
    }

    pub fn slot_of(&self, workspace: WorkspaceHandle) -> Option<usize> {
        self.ring.iter().position(|handle| *handle == workspace)
    }

    pub fn workspace_of<T: WindowToolkit>(&self, toolkit: &T, window: WindowId) -> Option<usize> {
        toolkit
            .workspaces_containing(window)
            .into_iter()
            .find_map(|workspace| self.slot_of(workspace))
    }

    pub fn resume_window(&self, slot: usize) -> Option<WindowId> {
        self.resume.get(slot).copied().flatten()
    }

    pub fn info(&self, window: WindowId) -> Option<WorkspaceInfo> {
        self.info.get(&window).copied()
    }

    pub fn is_hidden(&self, window: WindowId) -> bool {
        self.info
            .get(&window)
            .is_some_and(|info| info.in_hidden_workspace)
    }

    pub fn track(&mut self, window: WindowId) {
        self.info.entry(window).or_default();
    }

    pub fn forget(&mut self, window: WindowId) {
        self.info.remove(&window);
        for slot in self.resume.iter_mut() {
            if *slot == Some(window) {
                *slot = None;
            }
        }
    }

    pub fn cycle_up<T: WindowToolkit>(&mut self, toolkit: &mut T, take_active: bool) {
        let old = self.active;
        let new = (old + 1) % self.ring.len();
        let moved = take_active.then(|| toolkit.active_window()).flatten();
        self.change_active(toolkit, new, old, moved);
    }

    pub fn cycle_down<T: WindowToolkit>(&mut self, toolkit: &mut T, take_active: bool) {
        let old = self.active;
        let new = (old + self.ring.len() - 1) % self.ring.len();
        let moved = take_active.then(|| toolkit.active_window()).flatten();
        self.change_active(toolkit, new, old, moved);
    }

    pub fn change_active<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        new: usize,
        old: usize,
        moved: Option<WindowId>,
    ) {
        if new == old || new >= self.ring.len() || old >= self.ring.len() {
            return;
        }

        self.active = new;
        let new_workspace = self.ring[new];
        let old_workspace = self.ring[old];
        tracing::debug!(from = old, to = new, ?moved, "changing active workspace");

        let old_active = toolkit.active_window();
        let focused_application = old_active
            .and_then(|window| toolkit.info_for(window))
            .is_some_and(|info| info.depth_layer.is_application());

        // Resume focus only when no application window holds it.
        if !focused_application
            && let Some(resume) = self.resume[new]
            && toolkit.workspaces_containing(resume).contains(&new_workspace)
        {
            self.apply_visible(toolkit, resume);
            toolkit.select_active_window(resume);
        }

        if let Some(window) = moved {
            toolkit.remove_tree_from_workspace(window, old_workspace);
            let added = toolkit.add_tree_to_workspace(window, new_workspace);
            self.advise_adding(toolkit, new_workspace, &added);
        }

        for window in toolkit.windows_in_workspace(new_workspace) {
            if is_application(toolkit, window) {
                self.apply_visible(toolkit, window);
            }
        }

        let mut hide_old_active = false;
        for window in toolkit.windows_in_workspace(old_workspace) {
            if !is_application(toolkit, window) {
                continue;
            }
            if Some(window) == old_active {
                hide_old_active = true;
                continue;
            }
            self.apply_hidden(toolkit, window);
        }

        if let Some(window) = old_active.filter(|_| hide_old_active) {
            self.apply_hidden(toolkit, window);
            self.resume[old] = Some(window);
        }
    }

    pub fn advise_adding<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        workspace: WorkspaceHandle,
        windows: &[WindowId],
    ) {
        let visible = workspace == self.active_workspace();
        for &window in windows {
            if visible {
                self.apply_visible(toolkit, window);
            } else {
                self.apply_hidden(toolkit, window);
            }
        }
    }

    pub fn apply_hidden<T: WindowToolkit>(&mut self, toolkit: &mut T, window: WindowId) {
        let Some(window_info) = toolkit.info_for(window) else {
            return;
        };
        let info = self.info.entry(window).or_default();
        if info.in_hidden_workspace {
            return;
        }

        info.in_hidden_workspace = true;
        info.old_state = window_info.state;

        let mut modifications = WindowSpec {
            state: Some(WindowState::Hidden),
            ..WindowSpec::default()
        };
        toolkit.place_and_size_for_state(&mut modifications, &window_info);
        toolkit.modify_window(window, &modifications);
    }

    pub fn apply_visible<T: WindowToolkit>(&mut self, toolkit: &mut T, window: WindowId) {
        let Some(window_info) = toolkit.info_for(window) else {
            return;
        };
        let Some(info) = self.info.get_mut(&window) else {
            return;
        };
        if !info.in_hidden_workspace {
            return;
        }

        info.in_hidden_workspace = false;

        let mut modifications = WindowSpec {
            state: Some(info.old_state),
            ..WindowSpec::default()
        };
        toolkit.place_and_size_for_state(&mut modifications, &window_info);
        toolkit.modify_window(window, &modifications);
    }
}

fn is_application<T: WindowToolkit>(toolkit: &T, window: WindowId) -> bool {
    toolkit
        .info_for(window)
        .is_some_and(|info| info.depth_layer.is_application())
}
