use crate::{
    commands::{Dispatch, ShellCommands},
    config::RuntimeConfig,
    headless::HeadlessToolkit,
    input::{LifecycleEvent, ShellEvent},
    launcher::Launcher,
    policy::{WindowPolicy, WorkspacePolicy},
    toolkit::{AppId, AppInfo, DepthLayer, WindowId, WindowSpec, WindowToolkit},
};

/// One running shell: the toolkit it manages, the window policy and the
/// launcher used by shell chords.
pub struct Shell<T: WindowToolkit, L: Launcher> {
    pub toolkit: T,
    pub policy: WorkspacePolicy,
    pub launcher: L,
    pub config: RuntimeConfig,
}

impl<T: WindowToolkit, L: Launcher> Shell<T, L> {
    pub fn new(mut toolkit: T, launcher: L, config: RuntimeConfig) -> Self {
        let commands = ShellCommands::new(config.shell_commands);
        let policy = WorkspacePolicy::new(&mut toolkit, config.workspaces, commands)
            .with_background_app(config.wallpaper_app.clone());

        tracing::info!(
            workspaces = policy.workspaces().len(),
            shell_commands = config.shell_commands,
            "shell started"
        );

        Self {
            toolkit,
            policy,
            launcher,
            config,
        }
    }

    pub fn handle_event(&mut self, event: &ShellEvent) -> bool {
        match event {
            ShellEvent::Key(key) => {
                self.route_shell_command(event)
                    || self.policy.handle_keyboard_event(&mut self.toolkit, key)
            }
            ShellEvent::Touch(touch) => {
                self.route_shell_command(event)
                    || self.policy.handle_touch_event(&mut self.toolkit, touch)
            }
            ShellEvent::Pointer(pointer) => {
                self.policy.handle_pointer_event(&mut self.toolkit, pointer)
            }
            ShellEvent::Lifecycle(lifecycle) => {
                self.policy.handle_lifecycle_event(&mut self.toolkit, lifecycle);
                true
            }
        }
    }

    /// Runs policy work that did not come from an input callback inside the
    /// toolkit's lock.
    pub fn with_lock(&mut self, mut work: impl FnMut(&mut T, &mut WorkspacePolicy)) {
        let policy = &mut self.policy;
        self.toolkit
            .invoke_under_lock(&mut |toolkit| work(toolkit, policy));
    }

    fn route_shell_command(&mut self, event: &ShellEvent) -> bool {
        match self.policy.commands_mut().dispatch(event) {
            Dispatch::Unhandled => false,
            Dispatch::Consumed => true,
            Dispatch::Run(action) => {
                action.execute(self);
                true
            }
        }
    }
}

impl<L: Launcher> Shell<HeadlessToolkit, L> {
    pub fn open_window(&mut self, app: &AppInfo, requested: &WindowSpec) -> WindowId {
        let spec = self.policy.place_new_window(&self.toolkit, app, requested);
        let window = self.toolkit.create_window(app, &spec);
        self.with_lock(|toolkit, policy| {
            policy.handle_lifecycle_event(toolkit, &LifecycleEvent::NewWindow(window));
            policy.handle_lifecycle_event(toolkit, &LifecycleEvent::WindowReady(window));
        });
        window
    }

    pub fn close_window(&mut self, window: WindowId) {
        let Some(info) = self.toolkit.info_for(window) else {
            return;
        };
        for child in info.children {
            self.close_window(child);
        }

        self.with_lock(|toolkit, policy| {
            policy.handle_lifecycle_event(toolkit, &LifecycleEvent::DeleteWindow(window));
        });
        self.toolkit.destroy_window(window);
    }

    pub fn close_app(&mut self, app: AppId) {
        for window in self.toolkit.windows_of_app(app) {
            self.close_window(window);
        }
        self.with_lock(|toolkit, policy| {
            policy.handle_lifecycle_event(toolkit, &LifecycleEvent::DeleteApp(app));
        });
        self.toolkit.unregister_app(app);
    }

    /// Headless clients honour every close request straight away.
    pub fn flush_close_requests(&mut self) {
        for window in self.toolkit.take_close_requests() {
            self.close_window(window);
        }
    }

    pub fn spawn_wallpaper(&mut self) -> WindowId {
        let app = match self.toolkit.app_by_name(&self.config.wallpaper_app) {
            Some(app) => app.clone(),
            None => {
                let name = self.config.wallpaper_app.clone();
                self.toolkit.register_app(&name)
            }
        };

        let output = self.toolkit.active_output();
        let window = self.open_window(
            &app,
            &WindowSpec {
                top_left: Some(output.loc),
                size: Some(output.size),
                depth_layer: Some(DepthLayer::Background),
                ..WindowSpec::default()
            },
        );
        tracing::debug!(%window, "wallpaper window opened");
        window
    }
}
