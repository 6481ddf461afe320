use std::{ffi::OsString, process::Command};

use crate::toolkit::AppId;

/// Display protocol a spawned program should connect with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchMode {
    Wayland,
    X11,
}

pub trait Launcher {
    /// Application owning the launcher's own windows, once it has connected.
    fn app(&self) -> Option<AppId>;

    fn show(&mut self);

    fn run_app(&mut self, command: &str, mode: LaunchMode);
}

/// Launches programs through `sh -c` with the session environment set up for
/// the requested display protocol.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    launcher_command: String,
    app: Option<AppId>,
    wayland_display: Option<OsString>,
    x11_display: Option<OsString>,
}

impl CommandLauncher {
    pub fn new(launcher_command: impl Into<String>) -> Self {
        Self {
            launcher_command: launcher_command.into(),
            app: None,
            wayland_display: std::env::var_os("WAYLAND_DISPLAY"),
            x11_display: std::env::var_os("DISPLAY"),
        }
    }

    pub fn with_app(mut self, app: AppId) -> Self {
        self.app = Some(app);
        self
    }

    pub fn set_wayland_display(&mut self, display: impl Into<OsString>) {
        self.wayland_display = Some(display.into());
    }

    fn command_for(&self, command: &str, mode: LaunchMode) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);

        match mode {
            LaunchMode::Wayland => {
                if let Some(display) = &self.wayland_display {
                    cmd.env("WAYLAND_DISPLAY", display);
                }
                cmd.env("XDG_SESSION_TYPE", "wayland");
                cmd.env("GDK_BACKEND", "wayland");
                cmd.env("QT_QPA_PLATFORM", "wayland");
                cmd.env("SDL_VIDEODRIVER", "wayland");
                cmd.env("NO_AT_BRIDGE", "1");
                cmd.env_remove("DISPLAY");
            }
            LaunchMode::X11 => {
                if let Some(display) = &self.x11_display {
                    cmd.env("DISPLAY", display);
                }
                cmd.env("XDG_SESSION_TYPE", "x11");
                cmd.env("GDK_BACKEND", "x11");
                cmd.env("QT_QPA_PLATFORM", "xcb");
                cmd.env("SDL_VIDEODRIVER", "x11");
                cmd.env_remove("WAYLAND_DISPLAY");
            }
        }

        cmd.env("XDG_CURRENT_DESKTOP", "magpie");
        cmd
    }
}

impl Launcher for CommandLauncher {
    fn app(&self) -> Option<AppId> {
        self.app
    }

    fn show(&mut self) {
        let command = self.launcher_command.clone();
        self.run_app(&command, LaunchMode::Wayland);
    }

    fn run_app(&mut self, command: &str, mode: LaunchMode) {
        if command.trim().is_empty() {
            return;
        }

        tracing::debug!(command, ?mode, "launching");
        if let Err(err) = self.command_for(command, mode).spawn() {
            tracing::warn!(command = %command, "failed to spawn command: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;

    fn env_of<'a>(cmd: &'a Command, key: &str) -> Option<Option<&'a OsStr>> {
        cmd.get_envs()
            .find(|(name, _)| *name == OsStr::new(key))
            .map(|(_, value)| value)
    }

    #[test]
    fn wayland_mode_hides_x11_display() {
        let mut launcher = CommandLauncher::new("launcher");
        launcher.set_wayland_display("magpie-0");
        let cmd = launcher.command_for("foot", LaunchMode::Wayland);

        assert_eq!(cmd.get_program(), "sh");
        assert_eq!(env_of(&cmd, "WAYLAND_DISPLAY"), Some(Some(OsStr::new("magpie-0"))));
        assert_eq!(env_of(&cmd, "GDK_BACKEND"), Some(Some(OsStr::new("wayland"))));
        assert_eq!(env_of(&cmd, "DISPLAY"), Some(None));
    }

    #[test]
    fn x11_mode_hides_wayland_display() {
        let launcher = CommandLauncher::new("launcher");
        let cmd = launcher.command_for("xterm", LaunchMode::X11);
        assert_eq!(env_of(&cmd, "QT_QPA_PLATFORM"), Some(Some(OsStr::new("xcb"))));
        assert_eq!(env_of(&cmd, "WAYLAND_DISPLAY"), Some(None));
    }

    #[test]
    fn blank_command_is_ignored() {
        let mut launcher = CommandLauncher::new("   ");
        launcher.show();
        assert_eq!(launcher.app(), None);
    }
}
