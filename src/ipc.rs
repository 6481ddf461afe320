use std::{
    fmt::Write as _,
    io::{Read, Write},
    os::unix::net::{UnixListener, UnixStream},
    path::{Path, PathBuf},
};

use calloop::{
    LoopHandle, PostAction,
    generic::{Generic, Interest, Mode},
};
use smithay::input::keyboard::Keysym;

use crate::{
    Result, ShellError,
    headless::HeadlessToolkit,
    input::{KeyAction, KeyEvent, Modifiers, ShellEvent},
    launcher::Launcher,
    state::Shell,
    toolkit::{WindowId, WindowSpec, WindowToolkit},
};

pub const SUPPORTED_COMMANDS: &str =
    "clients, workspaces, open, close, key, dock, maximize, workspace";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IpcCommand {
    Clients,
    Workspaces,
    Open { app: String, size: Option<(i32, i32)> },
    Close(WindowId),
    Key(KeyEvent),
    DockLeft,
    DockRight,
    Maximize,
    Workspace { up: bool, take_active: bool },
}

impl IpcCommand {
    pub fn parse(request: &str) -> Result<Self, String> {
        let words: Vec<&str> = request.split_whitespace().collect();
        match words.as_slice() {
            [] => Err(format!("empty command (supported: {SUPPORTED_COMMANDS})")),
            ["clients"] => Ok(IpcCommand::Clients),
            ["workspaces"] => Ok(IpcCommand::Workspaces),
            ["open", app] => Ok(IpcCommand::Open {
                app: (*app).to_owned(),
                size: None,
            }),
            ["open", app, width, height] => Ok(IpcCommand::Open {
                app: (*app).to_owned(),
                size: Some((parse_extent(width)?, parse_extent(height)?)),
            }),
            ["close", id] => id
                .parse::<u32>()
                .map(|id| IpcCommand::Close(WindowId(id)))
                .map_err(|err| format!("invalid window id `{id}` ({err})")),
            ["key", combo] => parse_key(combo, KeyAction::Down).map(IpcCommand::Key),
            ["key", combo, action] => {
                parse_key(combo, parse_key_action(action)?).map(IpcCommand::Key)
            }
            ["dock", "left"] => Ok(IpcCommand::DockLeft),
            ["dock", "right"] => Ok(IpcCommand::DockRight),
            ["maximize"] => Ok(IpcCommand::Maximize),
            ["workspace", direction] => parse_workspace(direction, false),
            ["workspace", direction, "take"] => parse_workspace(direction, true),
            _ => Err(format!(
                "unsupported command `{}` (supported: {SUPPORTED_COMMANDS})",
                request.trim()
            )),
        }
    }
}

fn parse_extent(raw: &str) -> Result<i32, String> {
    match raw.parse::<i32>() {
        Ok(value) if value > 0 => Ok(value),
        Ok(value) => Err(format!("size must be positive, got {value}")),
        Err(err) => Err(format!("invalid size `{raw}` ({err})")),
    }
}

fn parse_workspace(direction: &str, take_active: bool) -> Result<IpcCommand, String> {
    match direction {
        "up" => Ok(IpcCommand::Workspace {
            up: true,
            take_active,
        }),
        "down" => Ok(IpcCommand::Workspace {
            up: false,
            take_active,
        }),
        other => Err(format!("invalid workspace direction `{other}` (expected up or down)")),
    }
}

fn parse_key_action(raw: &str) -> Result<KeyAction, String> {
    match raw {
        "down" => Ok(KeyAction::Down),
        "up" => Ok(KeyAction::Up),
        "repeat" => Ok(KeyAction::Repeat),
        other => Err(format!("invalid key action `{other}` (expected down, up or repeat)")),
    }
}

/// Parses combos such as `alt+ctrl+left` or `Alt+F4`.
fn parse_key(combo: &str, action: KeyAction) -> Result<KeyEvent, String> {
    let mut modifiers = Modifiers::empty();
    let mut keysym = None;

    for token in combo.split('+').map(str::trim) {
        match token.to_ascii_lowercase().as_str() {
            "alt" => modifiers |= Modifiers::ALT,
            "ctrl" | "control" => modifiers |= Modifiers::CTRL,
            "shift" => modifiers |= Modifiers::SHIFT,
            "super" | "logo" => modifiers |= Modifiers::LOGO,
            _ if keysym.is_some() => return Err(format!("more than one key in `{combo}`")),
            _ => keysym = Some(keysym_from_token(token)?),
        }
    }

    let keysym = keysym.ok_or_else(|| format!("no key in `{combo}`"))?;
    Ok(KeyEvent::new(keysym, action, modifiers))
}

fn keysym_from_token(token: &str) -> Result<Keysym, String> {
    let mut chars = token.chars();
    if let (Some(ch), None) = (chars.next(), chars.next())
        && ch.is_ascii_alphanumeric()
    {
        return Ok(Keysym::new(u32::from(ch)));
    }

    let keysym = match token.to_ascii_uppercase().as_str() {
        "LEFT" => Keysym::Left,
        "RIGHT" => Keysym::Right,
        "UP" => Keysym::Up,
        "DOWN" => Keysym::Down,
        "SPACE" => Keysym::space,
        "TAB" => Keysym::Tab,
        "GRAVE" | "`" => Keysym::grave,
        "DELETE" | "DEL" => Keysym::Delete,
        "BACKSPACE" => Keysym::BackSpace,
        "RETURN" | "ENTER" => Keysym::Return,
        "ESCAPE" | "ESC" => Keysym::Escape,
        "F1" => Keysym::F1,
        "F2" => Keysym::F2,
        "F3" => Keysym::F3,
        "F4" => Keysym::F4,
        "F5" => Keysym::F5,
        "F6" => Keysym::F6,
        "F7" => Keysym::F7,
        "F8" => Keysym::F8,
        "F9" => Keysym::F9,
        "F10" => Keysym::F10,
        "F11" => Keysym::F11,
        "F12" => Keysym::F12,
        _ => return Err(format!("unknown key `{token}`")),
    };
    Ok(keysym)
}

impl<L: Launcher> Shell<HeadlessToolkit, L> {
    fn write_ipc_response(stream: &mut UnixStream, message: &str) {
        if let Err(err) = stream.write_all(message.as_bytes()) {
            tracing::warn!("failed to write ipc response: {err}");
        }
    }

    pub fn handle_ipc_stream(&mut self, mut stream: UnixStream) {
        let mut request = String::new();
        if let Err(err) = stream.read_to_string(&mut request) {
            Self::write_ipc_response(
                &mut stream,
                &format!("error: failed to read request: {err}\n"),
            );
            return;
        }

        let response = self.handle_ipc_request(&request);
        Self::write_ipc_response(&mut stream, &response);
    }

    pub fn handle_ipc_request(&mut self, request: &str) -> String {
        let command = match IpcCommand::parse(request) {
            Ok(command) => command,
            Err(err) => return format!("error: {err}\n"),
        };
        tracing::debug!(?command, "ipc request");

        match command {
            IpcCommand::Clients => self.render_clients_report(),
            IpcCommand::Workspaces => self.render_workspaces_report(),
            IpcCommand::Open { app, size } => {
                let app = match self.toolkit.app_by_name(&app) {
                    Some(info) => info.clone(),
                    None => self.toolkit.register_app(&app),
                };
                let requested = WindowSpec {
                    size: size.map(Into::into),
                    ..WindowSpec::default()
                };
                let window = self.open_window(&app, &requested);
                format!("ok {window}\n")
            }
            IpcCommand::Close(window) => {
                if self.toolkit.info_for(window).is_none() {
                    return format!("error: no window with id {window}\n");
                }
                self.close_window(window);
                "ok\n".to_owned()
            }
            IpcCommand::Key(event) => {
                let consumed = self.handle_event(&ShellEvent::Key(event));
                self.flush_close_requests();
                if consumed {
                    "consumed\n".to_owned()
                } else {
                    "ignored\n".to_owned()
                }
            }
            IpcCommand::DockLeft => {
                self.policy.dock_active_window_left(&mut self.toolkit);
                "ok\n".to_owned()
            }
            IpcCommand::DockRight => {
                self.policy.dock_active_window_right(&mut self.toolkit);
                "ok\n".to_owned()
            }
            IpcCommand::Maximize => {
                self.policy.toggle_maximized_restored(&mut self.toolkit);
                "ok\n".to_owned()
            }
            IpcCommand::Workspace { up, take_active } => {
                if up {
                    self.policy.workspace_up(&mut self.toolkit, take_active);
                } else {
                    self.policy.workspace_down(&mut self.toolkit, take_active);
                }
                format!("ok {}\n", self.policy.workspaces().active_slot() + 1)
            }
        }
    }

    fn render_clients_report(&self) -> String {
        let active = self.toolkit.active_window();
        let mut out = String::new();

        for info in self.toolkit.windows() {
            let workspace = self
                .policy
                .workspaces()
                .workspace_of(&self.toolkit, info.id)
                .map_or_else(|| "-".to_owned(), |slot| (slot + 1).to_string());
            let hidden = self.policy.workspaces().is_hidden(info.id);
            let geometry = info.geometry();

            let _ = writeln!(out, "Client {}:", info.id);
            let app = self
                .toolkit
                .app(info.app)
                .map_or("-", |app| app.name.as_str());

            let _ = writeln!(out, "  app: {app}");
            let _ = writeln!(out, "  name: {}", info.name);
            let _ = writeln!(out, "  workspace: {workspace}");
            let _ = writeln!(out, "  state: {:?}", info.state);
            let _ = writeln!(out, "  layer: {:?}", info.depth_layer);
            let _ = writeln!(out, "  type: {:?}", info.window_type);
            let _ = writeln!(
                out,
                "  geometry: {},{} {}x{}",
                geometry.loc.x, geometry.loc.y, geometry.size.w, geometry.size.h
            );
            let _ = writeln!(out, "  hidden: {hidden}");
            let _ = writeln!(out, "  focused: {}", active == Some(info.id));
            out.push('\n');
        }

        if out.is_empty() {
            return "No clients.\n".to_owned();
        }
        out
    }

    fn render_workspaces_report(&self) -> String {
        let registry = self.policy.workspaces();
        let mut out = String::new();

        for (slot, handle) in registry.handles().iter().enumerate() {
            let marker = if slot == registry.active_slot() { " (active)" } else { "" };
            let windows: Vec<String> = self
                .toolkit
                .windows_in_workspace(*handle)
                .iter()
                .map(ToString::to_string)
                .collect();
            let resume = registry
                .resume_window(slot)
                .map_or_else(|| "-".to_owned(), |window| window.to_string());

            let _ = writeln!(out, "Workspace {}{marker}:", slot + 1);
            let _ = writeln!(out, "  windows: {}", windows.join(" "));
            let _ = writeln!(out, "  resume: {resume}");
        }
        out
    }
}

/// `$XDG_RUNTIME_DIR/magpie-<pid>.sock` for this process.
pub fn socket_path() -> Result<PathBuf> {
    let runtime_dir = std::env::var_os("XDG_RUNTIME_DIR").ok_or_else(|| {
        ShellError::Ipc("XDG_RUNTIME_DIR is not set; cannot create ipc socket".to_owned())
    })?;
    Ok(PathBuf::from(runtime_dir).join(format!("magpie-{}.sock", std::process::id())))
}

pub fn init_ipc_listener<L: Launcher + 'static>(
    loop_handle: &LoopHandle<'static, Shell<HeadlessToolkit, L>>,
    path: &Path,
) -> Result<()> {
    if path.exists()
        && let Err(err) = std::fs::remove_file(path)
    {
        return Err(ShellError::Ipc(format!(
            "failed to remove stale ipc socket {}: {err}",
            path.display()
        )));
    }

    let listener = UnixListener::bind(path).map_err(|err| {
        ShellError::Ipc(format!("failed to bind ipc socket {}: {err}", path.display()))
    })?;
    listener.set_nonblocking(true).map_err(|err| {
        ShellError::Ipc(format!(
            "failed to set ipc socket nonblocking {}: {err}",
            path.display()
        ))
    })?;

    loop_handle
        .insert_source(
            Generic::new(listener, Interest::READ, Mode::Level),
            move |_, listener, shell| {
                loop {
                    match listener.accept() {
                        Ok((stream, _)) => shell.handle_ipc_stream(stream),
                        Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => break,
                        Err(err) => {
                            tracing::warn!("ipc accept failed: {err}");
                            break;
                        }
                    }
                }
                Ok(PostAction::Continue)
            },
        )
        .map_err(|err| ShellError::EventLoop(format!("failed to init ipc listener: {err}")))?;

    tracing::info!(path = %path.display(), "ipc listening");
    Ok(())
}

/// Finds the socket of a running session: `$MAGPIE_SOCKET` if set, else the
/// only `magpie-*.sock` in the runtime directory.
pub fn find_socket() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os("MAGPIE_SOCKET")
        && !path.is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    let runtime_dir = std::env::var_os("XDG_RUNTIME_DIR")
        .ok_or_else(|| ShellError::Ipc("XDG_RUNTIME_DIR is not set".to_owned()))?;
    let runtime_dir = PathBuf::from(runtime_dir);

    let entries = std::fs::read_dir(&runtime_dir).map_err(|err| {
        ShellError::Ipc(format!(
            "failed to scan runtime dir {}: {err}",
            runtime_dir.display()
        ))
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("magpie-") && name.ends_with(".sock"))
        })
        .collect();

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(ShellError::Ipc(
            "magpie ipc socket not found (is magpie running?)".to_owned(),
        )),
        _ => Err(ShellError::Ipc(
            "multiple magpie sessions detected; set MAGPIE_SOCKET to select one".to_owned(),
        )),
    }
}

pub fn send_command(path: &Path, command: &str) -> Result<String> {
    let mut stream = UnixStream::connect(path).map_err(|err| {
        ShellError::Ipc(format!(
            "failed to connect to magpie ipc socket {}: {err}",
            path.display()
        ))
    })?;

    stream
        .write_all(command.as_bytes())
        .map_err(|err| ShellError::Ipc(format!("failed to send ipc command: {err}")))?;
    stream.shutdown(std::net::Shutdown::Write)?;

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .map_err(|err| ShellError::Ipc(format!("failed to read ipc response: {err}")))?;

    if response.is_empty() {
        return Err(ShellError::Ipc("empty response from magpie ipc".to_owned()));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_combos() {
        let command = IpcCommand::parse("key alt+ctrl+Left").unwrap();
        assert_eq!(
            command,
            IpcCommand::Key(KeyEvent::new(
                Keysym::Left,
                KeyAction::Down,
                Modifiers::ALT | Modifiers::CTRL
            ))
        );

        let command = IpcCommand::parse("key Alt+Ctrl+BackSpace repeat").unwrap();
        assert_eq!(
            command,
            IpcCommand::Key(KeyEvent::new(
                Keysym::BackSpace,
                KeyAction::Repeat,
                Modifiers::ALT | Modifiers::CTRL
            ))
        );
    }

    #[test]
    fn rejects_bad_keys() {
        assert!(IpcCommand::parse("key alt+ctrl").is_err());
        assert!(IpcCommand::parse("key alt+left+right").is_err());
        assert!(IpcCommand::parse("key alt+left sideways").is_err());
    }

    #[test]
    fn parses_window_commands() {
        assert_eq!(
            IpcCommand::parse("open editor 300 200").unwrap(),
            IpcCommand::Open {
                app: "editor".to_owned(),
                size: Some((300, 200)),
            }
        );
        assert_eq!(
            IpcCommand::parse(" close 12 \n").unwrap(),
            IpcCommand::Close(WindowId(12))
        );
        assert_eq!(
            IpcCommand::parse("workspace down take").unwrap(),
            IpcCommand::Workspace {
                up: false,
                take_active: true
            }
        );
        assert!(IpcCommand::parse("open editor 0 10").is_err());
        assert!(IpcCommand::parse("workspace sideways").is_err());
    }

    #[test]
    fn unknown_and_empty_commands_are_errors() {
        assert!(IpcCommand::parse("").unwrap_err().starts_with("empty command"));
        assert!(IpcCommand::parse("reload").unwrap_err().starts_with("unsupported command"));
    }

    #[test]
    fn sending_to_a_missing_socket_is_an_ipc_error() {
        let path = std::env::temp_dir().join("magpie-missing-test.sock");
        let _ = std::fs::remove_file(&path);

        let err = send_command(&path, "clients").unwrap_err();
        assert!(matches!(err, ShellError::Ipc(_)));
        assert!(err.to_string().contains("failed to connect"));
    }
}
