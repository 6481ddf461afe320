use crate::{
    launcher::{LaunchMode, Launcher},
    state::Shell,
    toolkit::WindowToolkit,
};

/// Work a shell chord asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ShowLauncher,
    RunTerminal(LaunchMode),
    WorkspaceUp { take_active: bool },
    WorkspaceDown { take_active: bool },
    Quit,
}

impl Action {
    pub fn execute<T: WindowToolkit, L: Launcher>(self, shell: &mut Shell<T, L>) {
        tracing::debug!(action = ?self, "running shell action");
        match self {
            Action::ShowLauncher => {
                if let Some(app) = shell.launcher.app() {
                    shell.policy.commands_mut().add_shell_app(app);
                }
                shell.launcher.show();
            }
            Action::RunTerminal(mode) => {
                shell.launcher.run_app(&shell.config.terminal, mode);
            }
            Action::WorkspaceUp { take_active } => {
                shell.policy.workspace_up(&mut shell.toolkit, take_active);
            }
            Action::WorkspaceDown { take_active } => {
                shell.policy.workspace_down(&mut shell.toolkit, take_active);
            }
            Action::Quit => {
                tracing::info!("quit requested");
                shell.toolkit.stop();
            }
        }
    }
}
