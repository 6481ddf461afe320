use smithay::utils::{Logical, Point, Rectangle, Size};

use crate::geometry::SizeLimits;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkspaceHandle(pub u32);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppInfo {
    pub id: AppId,
    pub name: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DepthLayer {
    Background,
    Below,
    #[default]
    Application,
    AlwaysOnTop,
    Above,
    Overlay,
}

impl DepthLayer {
    pub fn is_application(self) -> bool {
        matches!(self, DepthLayer::Application | DepthLayer::AlwaysOnTop)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WindowType {
    #[default]
    Normal,
    Utility,
    Dialog,
    Menu,
    Tip,
    Decoration,
    Satellite,
    Freestyle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WindowState {
    #[default]
    Restored,
    Minimized,
    Maximized,
    VertMaximized,
    HorizMaximized,
    Fullscreen,
    Hidden,
}

impl WindowState {
    pub fn is_visible(self) -> bool {
        !matches!(self, WindowState::Hidden | WindowState::Minimized)
    }
}

/// A partial window description. Unset fields are left unchanged when used as
/// a modification, and filled with defaults when used for placement.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WindowSpec {
    pub name: Option<String>,
    pub top_left: Option<Point<i32, Logical>>,
    pub size: Option<Size<i32, Logical>>,
    pub state: Option<WindowState>,
    pub depth_layer: Option<DepthLayer>,
    pub window_type: Option<WindowType>,
    pub parent: Option<WindowId>,
    pub min_size: Option<Size<i32, Logical>>,
    pub max_size: Option<Size<i32, Logical>>,
    pub restore_rect: Option<Rectangle<i32, Logical>>,
}

impl WindowSpec {
    pub fn is_empty(&self) -> bool {
        *self == WindowSpec::default()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WindowInfo {
    pub id: WindowId,
    pub app: AppId,
    pub name: String,
    pub top_left: Point<i32, Logical>,
    pub size: Size<i32, Logical>,
    pub state: WindowState,
    pub depth_layer: DepthLayer,
    pub window_type: WindowType,
    pub parent: Option<WindowId>,
    pub children: Vec<WindowId>,
    pub min_size: Size<i32, Logical>,
    pub max_size: Size<i32, Logical>,
    pub restore_rect: Rectangle<i32, Logical>,
}

impl WindowInfo {
    pub fn geometry(&self) -> Rectangle<i32, Logical> {
        Rectangle::new(self.top_left, self.size)
    }

    pub fn limits(&self) -> SizeLimits {
        SizeLimits::new(self.min_size, self.max_size)
    }

    pub fn can_be_active(&self) -> bool {
        self.window_type != WindowType::Decoration && self.state.is_visible()
    }
}

pub trait WindowToolkit {
    fn info_for(&self, window: WindowId) -> Option<WindowInfo>;

    fn modify_window(&mut self, window: WindowId, modifications: &WindowSpec);

    fn place_and_size_for_state(&self, modifications: &mut WindowSpec, info: &WindowInfo);

    /// Returns the window that is active after the request.
    fn select_active_window(&mut self, window: WindowId) -> Option<WindowId>;

    fn active_window(&self) -> Option<WindowId>;

    fn window_at(&self, point: Point<i32, Logical>) -> Option<WindowId>;

    fn active_output(&self) -> Rectangle<i32, Logical>;

    fn active_application_zone(&self) -> Rectangle<i32, Logical>;

    fn ask_client_to_close(&mut self, window: WindowId);

    fn focus_next_application(&mut self);

    fn focus_next_within_application(&mut self);

    fn drag_active_window(&mut self, movement: Point<i32, Logical>);

    fn create_workspace(&mut self) -> WorkspaceHandle;

    /// Adds the window and its descendants, returning those not already in
    /// the workspace.
    fn add_tree_to_workspace(&mut self, window: WindowId, workspace: WorkspaceHandle)
    -> Vec<WindowId>;

    fn remove_tree_from_workspace(
        &mut self,
        window: WindowId,
        workspace: WorkspaceHandle,
    ) -> Vec<WindowId>;

    fn windows_in_workspace(&self, workspace: WorkspaceHandle) -> Vec<WindowId>;

    fn workspaces_containing(&self, window: WindowId) -> Vec<WorkspaceHandle>;

    /// Runs `work` while input delivery is blocked. Reentrant.
    fn invoke_under_lock(&mut self, work: &mut dyn FnMut(&mut Self));

    fn stop(&mut self);
}
