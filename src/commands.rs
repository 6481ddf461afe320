use std::collections::HashSet;

use smithay::input::keyboard::Keysym;

use crate::{
    action::Action,
    input::{KeyAction, KeyEvent, Modifiers, ShellEvent, TouchAction, TouchEvent},
    launcher::LaunchMode,
    toolkit::AppId,
};

/// A touch-down closer than this to the left edge opens the launcher.
pub const EDGE_SWIPE_WIDTH: i32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Unhandled,
    Consumed,
    Run(Action),
}

#[derive(Debug)]
pub struct ShellCommands {
    shell_commands_active: bool,
    shell_apps: HashSet<AppId>,
    app_windows: usize,
    in_touch_gesture: bool,
}

impl Default for ShellCommands {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ShellCommands {
    pub fn new(shell_commands_active: bool) -> Self {
        Self {
            shell_commands_active,
            shell_apps: HashSet::new(),
            app_windows: 0,
            in_touch_gesture: false,
        }
    }

    pub fn shell_keyboard_enabled(&self) -> bool {
        self.shell_commands_active
    }

    pub fn app_windows(&self) -> usize {
        self.app_windows
    }

    pub fn is_shell_app(&self, app: AppId) -> bool {
        self.shell_apps.contains(&app)
    }

    pub fn add_shell_app(&mut self, app: AppId) {
        self.shell_apps.insert(app);
    }

    pub fn del_shell_app(&mut self, app: AppId) {
        self.shell_apps.remove(&app);
    }

    pub fn advise_new_window_for(&mut self, app: AppId) {
        if !self.is_shell_app(app) {
            self.app_windows += 1;
        }
    }

    pub fn advise_delete_window_for(&mut self, app: AppId) {
        if !self.is_shell_app(app) {
            self.app_windows = self.app_windows.saturating_sub(1);
        }
    }

    pub fn dispatch(&mut self, event: &ShellEvent) -> Dispatch {
        match event {
            ShellEvent::Key(key) => self.keyboard_shortcuts(key),
            ShellEvent::Touch(touch) => self.touch_shortcuts(touch),
            _ => Dispatch::Unhandled,
        }
    }

    pub fn keyboard_shortcuts(&mut self, event: &KeyEvent) -> Dispatch {
        if event.action == KeyAction::Up {
            return Dispatch::Unhandled;
        }
        if !event.modifiers.contains(Modifiers::ALT | Modifiers::CTRL) {
            return Dispatch::Unhandled;
        }

        let is_down = event.action == KeyAction::Down;

        if event.keysym == Keysym::Delete && is_down {
            self.shell_commands_active = !self.shell_commands_active;
            tracing::debug!(active = self.shell_commands_active, "shell commands toggled");
            return Dispatch::Consumed;
        }

        if !self.shell_commands_active {
            return Dispatch::Unhandled;
        }

        let take_active = event.modifiers.contains(Modifiers::SHIFT);

        match event.keysym {
            Keysym::a | Keysym::A if is_down => Dispatch::Run(Action::ShowLauncher),
            Keysym::t | Keysym::T if is_down => {
                Dispatch::Run(Action::RunTerminal(LaunchMode::Wayland))
            }
            Keysym::x | Keysym::X if is_down => Dispatch::Run(Action::RunTerminal(LaunchMode::X11)),
            Keysym::BackSpace if is_down => {
                if self.app_windows > 0 {
                    tracing::debug!(windows = self.app_windows, "quit vetoed by open windows");
                    Dispatch::Unhandled
                } else {
                    Dispatch::Run(Action::Quit)
                }
            }
            Keysym::Up => Dispatch::Run(Action::WorkspaceUp { take_active }),
            Keysym::Down => Dispatch::Run(Action::WorkspaceDown { take_active }),
            _ => Dispatch::Unhandled,
        }
    }

    pub fn touch_shortcuts(&mut self, event: &TouchEvent) -> Dispatch {
        let Some(first) = event.points.first() else {
            return Dispatch::Unhandled;
        };

        if self.in_touch_gesture {
            if first.action == TouchAction::Up {
                self.in_touch_gesture = false;
            }
            return Dispatch::Consumed;
        }

        if event.points.len() != 1
            || first.action != TouchAction::Down
            || first.position.x >= EDGE_SWIPE_WIDTH
        {
            return Dispatch::Unhandled;
        }

        self.in_touch_gesture = true;
        Dispatch::Run(Action::ShowLauncher)
    }
}
