#![allow(dead_code)]

use magpie::{
    Shell,
    config::RuntimeConfig,
    headless::HeadlessToolkit,
    input::{KeyAction, KeyEvent, Modifiers, ShellEvent},
    launcher::{LaunchMode, Launcher},
    toolkit::{AppId, AppInfo, WindowId, WindowSpec, WindowState, WindowToolkit},
};
use smithay::{input::keyboard::Keysym, utils::Rectangle};

#[derive(Debug, Default)]
pub struct RecordingLauncher {
    pub app: Option<AppId>,
    pub shown: usize,
    pub launched: Vec<(String, LaunchMode)>,
}

impl Launcher for RecordingLauncher {
    fn app(&self) -> Option<AppId> {
        self.app
    }

    fn show(&mut self) {
        self.shown += 1;
    }

    fn run_app(&mut self, command: &str, mode: LaunchMode) {
        self.launched.push((command.to_owned(), mode));
    }
}

pub type TestShell = Shell<HeadlessToolkit, RecordingLauncher>;

/// A 1200x800 session with `workspaces` workspaces and a registered
/// launcher application.
pub fn shell(workspaces: usize) -> TestShell {
    let mut toolkit = HeadlessToolkit::new(Rectangle::new((0, 0).into(), (1200, 800).into()));
    let launcher_app = toolkit.register_app("launcher");
    let launcher = RecordingLauncher {
        app: Some(launcher_app.id),
        ..RecordingLauncher::default()
    };

    let config = RuntimeConfig {
        workspaces,
        output_width: 1200,
        output_height: 800,
        ..RuntimeConfig::default()
    };
    Shell::new(toolkit, launcher, config)
}

pub fn open(shell: &mut TestShell, name: &str) -> (AppInfo, WindowId) {
    let app = match shell.toolkit.app_by_name(name) {
        Some(app) => app.clone(),
        None => shell.toolkit.register_app(name),
    };
    let window = shell.open_window(&app, &WindowSpec::default());
    (app, window)
}

pub fn chord(keysym: Keysym) -> ShellEvent {
    ShellEvent::Key(KeyEvent::new(
        keysym,
        KeyAction::Down,
        Modifiers::ALT | Modifiers::CTRL,
    ))
}

pub fn shifted_chord(keysym: Keysym) -> ShellEvent {
    ShellEvent::Key(KeyEvent::new(
        keysym,
        KeyAction::Down,
        Modifiers::ALT | Modifiers::CTRL | Modifiers::SHIFT,
    ))
}

pub fn state_of(shell: &TestShell, window: WindowId) -> WindowState {
    shell
        .toolkit
        .info_for(window)
        .map(|info| info.state)
        .unwrap_or_default()
}
